//! Error types.
//!
//! Nothing here is fatal to a page: [`MarkupError`]s skip a single item and
//! [`InitError`]s skip a single widget instance. Both are logged by the
//! caller and initialization carries on.

use thiserror::Error;

/// A per-item markup defect found during discovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// An item root has no trigger element.
    #[error("Item '{item}' has no trigger [{attr}]")]
    MissingTrigger { item: String, attr: String },

    /// An item root has no panel element.
    #[error("Item '{item}' has no panel [{attr}]")]
    MissingPanel { item: String, attr: String },

    /// A keyed trigger names a panel id that does not exist.
    #[error("Trigger '{element}' names unknown panel '{id}'")]
    OrphanTrigger { element: String, id: String },

    /// A keyed element carries an empty key.
    #[error("Element '{element}' has an empty [{attr}] value")]
    EmptyKey { element: String, attr: String },

    /// Two panels resolve to the same item id.
    #[error("Duplicate panel id '{id}'")]
    DuplicatePanel { id: String },
}

/// Errors that prevent a controller from being created.
#[derive(Debug, Error)]
pub enum InitError {
    /// The configured deep-link pattern is not a valid regex.
    #[error("Invalid deep-link pattern '{pattern}': {source}")]
    InvalidHashPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// No usable item was found under the instance root.
    #[error("No disclosure items under '{root}'")]
    NoItems { root: String },
}

/// Errors raised when registering a controller with a page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// Another controller already uses this id.
    #[error("Controller '{0}' is already registered")]
    DuplicateController(String),
}
