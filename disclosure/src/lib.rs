//! Accessible disclosure widgets: accordions and content tabs.
//!
//! Controllers bind to a [`pagedom::Document`], discover their triggers and
//! panels from markup attributes, and keep visibility, ARIA state and roving
//! focus consistent as the user clicks and types.

mod a11y;
pub mod config;
pub mod controller;
pub mod error;
pub mod hash;
pub mod item;
pub mod page;
pub mod registry;
pub mod roving;
pub mod schema;

pub use config::{DisclosureConfig, DEFAULT_HASH_PATTERN};
pub use controller::{ActivateOptions, ChangeDetail, Controller, ControllerId, Effect};
pub use error::{InitError, MarkupError, RegisterError};
pub use item::{Item, ItemState, Trigger, TriggerKind};
pub use page::Page;
pub use registry::{ControllerRegistry, OutsideClickListener};

pub mod prelude {
    pub use crate::config::DisclosureConfig;
    pub use crate::controller::{ActivateOptions, ChangeDetail, Controller, ControllerId};
    pub use crate::item::ItemState;
    pub use crate::page::Page;
    pub use crate::schema::MarkupSchema;

    pub use pagedom::{Document, Element, Event, Key, Modifiers, NodeId};
}
