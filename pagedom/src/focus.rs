use crate::document::{Document, NodeId};
use crate::event::{Event, Key};

/// Tracks which element is currently focused.
#[derive(Debug, Default)]
pub struct FocusState {
    focused: Option<NodeId>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the currently focused element.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Programmatically focus an element.
    /// Returns true if focus changed.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if self.focused == Some(id) {
            return false;
        }
        self.focused = Some(id);
        true
    }

    /// Clear focus.
    /// Returns true if there was something focused.
    pub fn blur(&mut self) -> bool {
        self.focused.take().is_some()
    }

    /// Focus the next element in sequential (Tab) order.
    /// Returns the newly focused element if focus changed.
    pub fn focus_next(&mut self, doc: &Document) -> Option<NodeId> {
        let focusable = collect_focusable(doc, doc.root());
        if focusable.is_empty() {
            return None;
        }

        let new_focus = match self.focused {
            None => focusable[0],
            Some(current) => match focusable.iter().position(|&id| id == current) {
                Some(i) => focusable[(i + 1) % focusable.len()],
                None => first_after(doc, &focusable, current).unwrap_or(focusable[0]),
            },
        };

        self.move_to(new_focus)
    }

    /// Focus the previous element in sequential (Shift+Tab) order.
    /// Returns the newly focused element if focus changed.
    pub fn focus_prev(&mut self, doc: &Document) -> Option<NodeId> {
        let focusable = collect_focusable(doc, doc.root());
        if focusable.is_empty() {
            return None;
        }
        let last = focusable[focusable.len() - 1];

        let new_focus = match self.focused {
            None => last,
            Some(current) => match focusable.iter().position(|&id| id == current) {
                Some(0) => last,
                Some(i) => focusable[i - 1],
                None => last_before(doc, &focusable, current).unwrap_or(last),
            },
        };

        self.move_to(new_focus)
    }

    /// Handle Tab/BackTab, producing the blur/focus pair when focus moves.
    /// Returns `None` when the key is not a sequential navigation key.
    pub fn process_tab(&mut self, key: Key, doc: &Document) -> Option<Vec<Event>> {
        let old = self.focused;
        let new = match key {
            Key::Tab => self.focus_next(doc),
            Key::BackTab => self.focus_prev(doc),
            _ => return None,
        };

        let mut events = Vec::new();
        if let Some(new) = new {
            if let Some(old) = old {
                events.push(Event::Blur {
                    target: old,
                    new_target: Some(new),
                });
            }
            events.push(Event::Focus { target: new });
        }
        Some(events)
    }

    fn move_to(&mut self, new_focus: NodeId) -> Option<NodeId> {
        if self.focused != Some(new_focus) {
            log::debug!("[focus] {:?} -> {:?}", self.focused, new_focus);
            self.focused = Some(new_focus);
            Some(new_focus)
        } else {
            None
        }
    }
}

/// Whether `node` takes part in sequential focus navigation by itself.
pub fn is_focusable(doc: &Document, node: NodeId) -> bool {
    if doc.has_attr(node, "disabled") {
        return false;
    }
    match doc.tab_index(node) {
        Some(index) => index >= 0,
        None => matches!(doc.tag(node), "button" | "a" | "input" | "select" | "textarea"),
    }
}

/// Collect all sequentially focusable elements under `scope` in document
/// order, skipping anything inside a hidden or inert subtree.
pub fn collect_focusable(doc: &Document, scope: NodeId) -> Vec<NodeId> {
    doc.descendants(scope)
        .into_iter()
        .filter(|&id| is_focusable(doc, id) && !doc.in_inactive_subtree(id))
        .collect()
}

fn first_after(doc: &Document, focusable: &[NodeId], current: NodeId) -> Option<NodeId> {
    let order = doc.descendants(doc.root());
    let pos = order.iter().position(|&id| id == current)?;
    order[pos + 1..]
        .iter()
        .copied()
        .find(|id| focusable.contains(id))
}

fn last_before(doc: &Document, focusable: &[NodeId], current: NodeId) -> Option<NodeId> {
    let order = doc.descendants(doc.root());
    let pos = order.iter().position(|&id| id == current)?;
    order[..pos]
        .iter()
        .rev()
        .copied()
        .find(|id| focusable.contains(id))
}
