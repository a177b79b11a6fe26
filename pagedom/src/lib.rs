pub mod document;
pub mod element;
pub mod event;
pub mod focus;
pub mod transitions;

pub use document::{Document, Node, NodeId};
pub use element::{generate_id, Element};
pub use event::{CustomEvent, Event, Key, Modifiers};
pub use focus::{collect_focusable, is_focusable, FocusState};
pub use transitions::{TransitionId, TransitionTracker};
