//! Accessibility attribute wiring and synchronization.

use pagedom::{generate_id, Document, NodeId};

use crate::item::{Item, ItemState, TriggerKind};

/// Return the element id of `node`, assigning `{prefix}-N` once if absent.
pub(crate) fn ensure_id(doc: &mut Document, node: NodeId, prefix: &str) -> String {
    if let Some(id) = doc.id(node) {
        return id.to_string();
    }
    let id = generate_id(prefix);
    doc.set_attr(node, "id", id.as_str());
    id
}

/// Human-readable name of `node` for log messages.
pub(crate) fn describe(doc: &Document, node: NodeId) -> String {
    match doc.id(node) {
        Some(id) => format!("#{id}"),
        None => format!("<{}> node {}", doc.tag(node), node.index()),
    }
}

/// One-time relationship wiring: ids, roles, `aria-controls`,
/// `aria-labelledby`, and the collapsed defaults.
pub(crate) fn wire(doc: &mut Document, item: &Item, prefix: &str) {
    let panel_id = ensure_id(doc, item.panel, &format!("{prefix}-panel"));

    for trigger in item.triggers() {
        let suffix = match trigger.kind {
            TriggerKind::Tab => "tab",
            TriggerKind::Toggle => "btn",
        };
        ensure_id(doc, trigger.node, &format!("{prefix}-{suffix}"));
        doc.set_attr(trigger.node, "aria-controls", panel_id.as_str());

        if doc.tag(trigger.node) == "button" && !doc.has_attr(trigger.node, "type") {
            doc.set_attr(trigger.node, "type", "button");
        }

        match trigger.kind {
            TriggerKind::Tab => {
                if !doc.has_attr(trigger.node, "role") {
                    doc.set_attr(trigger.node, "role", "tab");
                }
                doc.set_attr(trigger.node, "aria-selected", "false");
            }
            TriggerKind::Toggle => doc.set_attr(trigger.node, "aria-expanded", "false"),
        }
    }

    if !doc.has_attr(item.panel, "role") {
        let role = if item.tab.is_some() { "tabpanel" } else { "region" };
        doc.set_attr(item.panel, "role", role);
    }
    if let Some(label) = item.primary_trigger().and_then(|t| doc.id(t).map(str::to_string)) {
        doc.set_attr(item.panel, "aria-labelledby", label);
    }
    doc.set_attr(item.panel, "aria-hidden", "true");
}

/// Make the panel visible and interactive.
pub(crate) fn reveal(doc: &mut Document, panel: NodeId) {
    doc.set_hidden(panel, false);
    doc.set_inert(panel, false);
    doc.set_attr(panel, "aria-hidden", "false");
}

/// Hide the panel and remove it from focus and assistive-technology traversal.
pub(crate) fn conceal(doc: &mut Document, panel: NodeId) {
    doc.set_hidden(panel, true);
    doc.set_inert(panel, true);
    doc.set_attr(panel, "aria-hidden", "true");
}

/// Mirror the expanded flag into every trigger of `item`.
pub(crate) fn sync_triggers(doc: &mut Document, item: &Item, expanded: bool) {
    let value = if expanded { "true" } else { "false" };
    for trigger in item.triggers() {
        let attr = match trigger.kind {
            TriggerKind::Tab => "aria-selected",
            TriggerKind::Toggle => "aria-expanded",
        };
        doc.set_attr(trigger.node, attr, value);
    }
}

/// Mirror the state into the presentational `data-state` attribute.
pub(crate) fn sync_state(doc: &mut Document, item: &Item, state: ItemState) {
    doc.set_attr(item.state_node, "data-state", state.as_str());
}
