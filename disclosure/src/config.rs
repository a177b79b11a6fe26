//! Controller configuration.

use std::time::Duration;

use serde::Deserialize;

/// Deep-link pattern recognized by default: `#ct=<panel id>`.
pub const DEFAULT_HASH_PATTERN: &str = r"^#ct=(.+)$";

/// Per-controller configuration.
///
/// Built with the builder methods below, or deserialized from host-provided
/// JSON (camelCase keys, every field optional).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisclosureConfig {
    /// Attribute marking group boundaries in nested (accordion) markup;
    /// overrides the schema's choice. Keyed markup always forms a single
    /// group per instance root.
    pub group_boundary: Option<String>,

    /// Opening an item closes its open siblings in the same group.
    /// Controllers that bind tabs behave as if this were set.
    pub single_open: bool,

    /// Clicks outside an open item close it.
    pub close_on_outside_click: bool,

    /// Open the panel named by the location fragment at initialization.
    pub sync_hash: bool,

    /// Item to open at initialization instead of the markup default.
    pub initial_id: Option<String>,

    /// Regex matched against the location fragment; capture group 1 is the
    /// percent-encoded panel id.
    pub hash_pattern: String,

    /// Arrow keys also activate the newly focused trigger.
    /// `None` means: on for tab rings, off for toggle rings.
    pub activate_on_arrow: Option<bool>,

    /// Finalize a close after this many milliseconds when the panel's
    /// transition signal never arrives. `None` leaves such panels closing.
    pub close_fallback_ms: Option<u64>,
}

impl Default for DisclosureConfig {
    fn default() -> Self {
        Self {
            group_boundary: None,
            single_open: false,
            close_on_outside_click: false,
            sync_hash: false,
            initial_id: None,
            hash_pattern: DEFAULT_HASH_PATTERN.to_string(),
            activate_on_arrow: None,
            close_fallback_ms: None,
        }
    }
}

impl DisclosureConfig {
    /// Accordion defaults: independent items, nothing synced.
    pub fn accordion() -> Self {
        Self::default()
    }

    /// Content-tabs defaults: single open panel, deep links honored.
    pub fn content_tabs() -> Self {
        Self {
            single_open: true,
            sync_hash: true,
            ..Default::default()
        }
    }

    /// Set the single-open policy.
    pub fn single_open(mut self, single_open: bool) -> Self {
        self.single_open = single_open;
        self
    }

    /// Close open items when the user clicks outside them.
    pub fn close_on_outside_click(mut self, enabled: bool) -> Self {
        self.close_on_outside_click = enabled;
        self
    }

    /// Honor `#ct=<id>` style deep links at initialization.
    pub fn sync_hash(mut self, enabled: bool) -> Self {
        self.sync_hash = enabled;
        self
    }

    pub fn initial_id(mut self, id: impl Into<String>) -> Self {
        self.initial_id = Some(id.into());
        self
    }

    pub fn group_boundary(mut self, attr: impl Into<String>) -> Self {
        self.group_boundary = Some(attr.into());
        self
    }

    pub fn hash_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.hash_pattern = pattern.into();
        self
    }

    pub fn activate_on_arrow(mut self, enabled: bool) -> Self {
        self.activate_on_arrow = Some(enabled);
        self
    }

    pub fn close_fallback(mut self, after: Duration) -> Self {
        self.close_fallback_ms = Some(u64::try_from(after.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// The close fallback as a duration.
    pub fn close_fallback_duration(&self) -> Option<Duration> {
        self.close_fallback_ms.map(Duration::from_millis)
    }
}
