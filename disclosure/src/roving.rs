//! Groups and roving-tabindex focus rings.

use pagedom::{Document, Key, Modifiers, NodeId};

/// Keyboard intent on a focused trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Next,
    Prev,
    First,
    Last,
    /// Space or Enter: same as clicking the trigger.
    Activate,
}

impl NavAction {
    /// Map a key press to a navigation action. Ctrl/Alt chords are left to
    /// the host.
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        if modifiers.ctrl || modifiers.alt {
            return None;
        }
        match key {
            Key::Down | Key::Right => Some(NavAction::Next),
            Key::Up | Key::Left => Some(NavAction::Prev),
            Key::Home => Some(NavAction::First),
            Key::End => Some(NavAction::Last),
            Key::Enter | Key::Char(' ') => Some(NavAction::Activate),
            _ => None,
        }
    }
}

/// A set of mutually related items sharing one focus ring.
#[derive(Debug, Clone)]
pub struct Group {
    /// Boundary element, or `None` when the group is the controller's
    /// implicit document-level group.
    pub boundary: Option<NodeId>,
    /// Item indices in document order.
    pub items: Vec<usize>,
    pub single_open: bool,
    /// Triggers taking part in roving focus, in document order.
    ring: Vec<NodeId>,
    /// Index into `ring` of the trigger holding `tabindex=0`.
    anchor: usize,
}

impl Group {
    pub(crate) fn new(boundary: Option<NodeId>, single_open: bool) -> Self {
        Self {
            boundary,
            items: Vec::new(),
            single_open,
            ring: Vec::new(),
            anchor: 0,
        }
    }

    pub(crate) fn set_ring(&mut self, ring: Vec<NodeId>) {
        self.ring = ring;
        self.anchor = 0;
    }

    pub fn ring(&self) -> &[NodeId] {
        &self.ring
    }

    /// The trigger currently reachable with Tab.
    pub fn anchor(&self) -> Option<NodeId> {
        self.ring.get(self.anchor).copied()
    }

    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.ring.iter().position(|&n| n == node)
    }

    /// Ring index reached from `from` by `action` (wrapping).
    pub fn step(&self, from: usize, action: NavAction) -> usize {
        let len = self.ring.len();
        if len == 0 {
            return 0;
        }
        match action {
            NavAction::Next => (from + 1) % len,
            NavAction::Prev => (from + len - 1) % len,
            NavAction::First => 0,
            NavAction::Last => len - 1,
            NavAction::Activate => from.min(len - 1),
        }
    }

    /// Move the roving anchor to `index`, rewriting every ring `tabindex`.
    pub(crate) fn set_anchor(&mut self, doc: &mut Document, index: usize) {
        if self.ring.is_empty() {
            return;
        }
        self.anchor = index.min(self.ring.len() - 1);
        for (i, &node) in self.ring.iter().enumerate() {
            doc.set_tab_index(node, if i == self.anchor { 0 } else { -1 });
        }
        log::trace!("[roving] anchor -> {:?}", self.ring[self.anchor]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagedom::Element;

    fn group_with(doc: &mut Document, n: usize) -> Group {
        let root = doc.root();
        let ring = (0..n)
            .map(|i| doc.append(root, Element::button().id(format!("b{i}"))))
            .collect();
        let mut group = Group::new(None, false);
        group.set_ring(ring);
        group
    }

    #[test]
    fn test_from_key() {
        let none = Modifiers::new();
        assert_eq!(NavAction::from_key(Key::Down, none), Some(NavAction::Next));
        assert_eq!(NavAction::from_key(Key::Right, none), Some(NavAction::Next));
        assert_eq!(NavAction::from_key(Key::Up, none), Some(NavAction::Prev));
        assert_eq!(NavAction::from_key(Key::Left, none), Some(NavAction::Prev));
        assert_eq!(NavAction::from_key(Key::Home, none), Some(NavAction::First));
        assert_eq!(NavAction::from_key(Key::End, none), Some(NavAction::Last));
        assert_eq!(NavAction::from_key(Key::Enter, none), Some(NavAction::Activate));
        assert_eq!(NavAction::from_key(Key::Char(' '), none), Some(NavAction::Activate));
        assert_eq!(NavAction::from_key(Key::Char('a'), none), None);
        assert_eq!(NavAction::from_key(Key::Down, Modifiers::ctrl()), None);
    }

    #[test]
    fn test_step_wraps() {
        let mut doc = Document::new();
        let group = group_with(&mut doc, 3);

        assert_eq!(group.step(2, NavAction::Next), 0);
        assert_eq!(group.step(0, NavAction::Prev), 2);
        assert_eq!(group.step(1, NavAction::First), 0);
        assert_eq!(group.step(0, NavAction::Last), 2);
    }

    #[test]
    fn test_set_anchor_leaves_exactly_one_zero() {
        let mut doc = Document::new();
        let mut group = group_with(&mut doc, 4);

        group.set_anchor(&mut doc, 2);
        let zeros = group
            .ring()
            .iter()
            .filter(|&&n| doc.tab_index(n) == Some(0))
            .count();
        assert_eq!(zeros, 1);
        assert_eq!(group.anchor(), Some(group.ring()[2]));

        group.set_anchor(&mut doc, 10);
        assert_eq!(group.anchor(), Some(group.ring()[3]));
    }
}
