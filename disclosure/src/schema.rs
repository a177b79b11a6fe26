//! Markup contract: which attributes identify groups, items, triggers and panels.

/// How triggers and panels are associated with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Each item root element contains its trigger and its panel.
    /// The item id is the panel's element id.
    Nested {
        item: String,
        trigger: String,
        panel: String,
    },
    /// Triggers and panels live anywhere under the instance root and are
    /// matched by attribute value. The item id is that value.
    Keyed {
        tab: String,
        toggle: String,
        panel: String,
    },
}

/// Attribute names a controller reads from the host markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSchema {
    /// Widget name used in logs.
    pub name: &'static str,
    /// Attribute marking an instance root. Each match gets its own
    /// controller, named by the attribute value. `None` means the mount
    /// scope itself is the single instance root.
    pub instance: Option<String>,
    /// Attribute marking an optional group boundary.
    pub group: Option<String>,
    pub binding: Binding,
    /// Attribute marking an item as open in the initial markup.
    pub initially_open: String,
    /// Prefix for generated element and controller ids.
    pub id_prefix: String,
    /// Name of the custom event emitted when the active panel changes.
    pub change_event: String,
}

impl MarkupSchema {
    /// `[data-accordion-group]` / `[data-accordion]` / `[data-accordion-btn]` /
    /// `[data-accordion-content]`, default-open via `[data-open]`.
    pub fn accordion() -> Self {
        Self {
            name: "accordion",
            instance: None,
            group: Some("data-accordion-group".to_string()),
            binding: Binding::Nested {
                item: "data-accordion".to_string(),
                trigger: "data-accordion-btn".to_string(),
                panel: "data-accordion-content".to_string(),
            },
            initially_open: "data-open".to_string(),
            id_prefix: "acc".to_string(),
            change_event: "accordion:change".to_string(),
        }
    }

    /// `[data-ct]` roots with `[data-ct-tab]`, `[data-ct-toggle]` and
    /// `[data-ct-panel]` matched by value.
    pub fn content_tabs() -> Self {
        Self {
            name: "content-tabs",
            instance: Some("data-ct".to_string()),
            group: None,
            binding: Binding::Keyed {
                tab: "data-ct-tab".to_string(),
                toggle: "data-ct-toggle".to_string(),
                panel: "data-ct-panel".to_string(),
            },
            initially_open: "data-open".to_string(),
            id_prefix: "ct".to_string(),
            change_event: "ct:change".to_string(),
        }
    }

    pub fn is_keyed(&self) -> bool {
        matches!(self.binding, Binding::Keyed { .. })
    }

    /// Override the change event name.
    pub fn change_event(mut self, name: impl Into<String>) -> Self {
        self.change_event = name.into();
        self
    }

    /// Override the generated-id prefix.
    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }
}
