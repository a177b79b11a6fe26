use std::time::{Duration, Instant};

use crate::element::Element;
use crate::event::{CustomEvent, Event};
use crate::transitions::{TransitionId, TransitionTracker};

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A live node: tag, attributes, tree links.
#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    attrs: Vec<(String, String)>,
    pub text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    transition: Option<Duration>,
}

impl Node {
    fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            text: None,
            parent: None,
            children: Vec::new(),
            transition: None,
        }
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// A mutable element tree with a page location and event plumbing.
///
/// Nodes live in an arena and are addressed by [`NodeId`]; they are never
/// removed while the document exists.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    location_hash: String,
    transitions: TransitionTracker,
    dispatched: Vec<CustomEvent>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("#document")],
            location_hash: String::new(),
            transitions: TransitionTracker::new(),
            dispatched: Vec::new(),
        }
    }

    /// Create a document with `element` mounted under the root.
    pub fn from_element(element: Element) -> Self {
        let mut doc = Self::new();
        let root = doc.root();
        doc.append(root, element);
        doc
    }

    /// The document node. Every other node descends from it.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Mount `element` (and its subtree) as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let Element {
            tag,
            attrs,
            text,
            children,
            transition,
        } = element;

        let id = NodeId(self.nodes.len());
        let mut node = Node::new(tag);
        node.attrs = attrs;
        node.text = text;
        node.parent = Some(parent);
        node.transition = transition.filter(|d| !d.is_zero());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);

        for child in children {
            self.append(id, child);
        }
        id
    }

    // Tree navigation

    pub fn tag(&self, node: NodeId) -> &str {
        self.nodes.get(node.0).map(|n| n.tag.as_str()).unwrap_or("")
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).and_then(|n| n.text.as_deref())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// All descendants of `scope` in document (preorder) order, excluding `scope`.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// First descendant of `scope` carrying `attr`.
    pub fn query(&self, scope: NodeId, attr: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&id| self.has_attr(id, attr))
    }

    /// Every descendant of `scope` carrying `attr`, in document order.
    pub fn query_all(&self, scope: NodeId, attr: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.has_attr(id, attr))
            .collect()
    }

    /// First descendant of `scope` whose `attr` equals `value`.
    pub fn query_value(&self, scope: NodeId, attr: &str, value: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&id| self.attr(id, attr) == Some(value))
    }

    /// Nearest inclusive ancestor of `node` carrying `attr`.
    pub fn closest(&self, node: NodeId, attr: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.has_attr(id, attr) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// True if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .find(|&node| self.attr(node, "id") == Some(id))
    }

    // Attributes

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node.0).and_then(|n| {
            n.attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        })
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        let Some(n) = self.nodes.get_mut(node.0) else {
            return;
        };
        let value = value.into();
        match n.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => n.attrs.push((name.to_string(), value)),
        }
    }

    /// Set a boolean attribute (present with an empty value).
    pub fn set_flag(&mut self, node: NodeId, name: &str) {
        self.set_attr(node, name, "");
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.attrs.retain(|(k, _)| k != name);
        }
    }

    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id").filter(|id| !id.is_empty())
    }

    pub fn hidden(&self, node: NodeId) -> bool {
        self.has_attr(node, "hidden")
    }

    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if hidden {
            self.set_flag(node, "hidden");
        } else {
            self.remove_attr(node, "hidden");
        }
    }

    pub fn inert(&self, node: NodeId) -> bool {
        self.has_attr(node, "inert")
    }

    pub fn set_inert(&mut self, node: NodeId, inert: bool) {
        if inert {
            self.set_flag(node, "inert");
        } else {
            self.remove_attr(node, "inert");
        }
    }

    pub fn tab_index(&self, node: NodeId) -> Option<i32> {
        self.attr(node, "tabindex").and_then(|v| v.trim().parse().ok())
    }

    pub fn set_tab_index(&mut self, node: NodeId, index: i32) {
        self.set_attr(node, "tabindex", index.to_string());
    }

    /// True if `node` or an ancestor is `hidden` or `inert`.
    pub fn in_inactive_subtree(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.hidden(id) || self.inert(id) {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // Location

    /// The location fragment, including its leading `#` (empty when none).
    pub fn location_hash(&self) -> &str {
        &self.location_hash
    }

    pub fn set_location_hash(&mut self, hash: impl Into<String>) {
        let hash = hash.into();
        self.location_hash = if hash.is_empty() || hash.starts_with('#') {
            hash
        } else {
            format!("#{hash}")
        };
    }

    // Custom events

    /// Dispatch a widget signal. Signals are queued until the host drains
    /// them with [`Document::take_dispatched`]; nothing else removes them.
    pub fn dispatch_custom(&mut self, event: CustomEvent) {
        log::trace!("[document] dispatch {} on {:?}", event.name, event.target);
        self.dispatched.push(event);
    }

    /// Remove and return every queued signal, oldest first.
    pub fn take_dispatched(&mut self) -> Vec<CustomEvent> {
        std::mem::take(&mut self.dispatched)
    }

    // Transitions

    /// Declare (or clear) the transition `node` runs on state changes.
    pub fn set_transition(&mut self, node: NodeId, duration: Option<Duration>) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.transition = duration.filter(|d| !d.is_zero());
        }
    }

    pub fn transition(&self, node: NodeId) -> Option<Duration> {
        self.nodes.get(node.0).and_then(|n| n.transition)
    }

    /// Start the declared transition on `node`.
    ///
    /// Returns `None` when the node declares no transition; in that case no
    /// completion signal will ever be produced.
    pub fn begin_transition(&mut self, node: NodeId) -> Option<TransitionId> {
        self.begin_transition_at(node, Instant::now())
    }

    pub fn begin_transition_at(&mut self, node: NodeId, now: Instant) -> Option<TransitionId> {
        let duration = self.transition(node)?;
        Some(self.transitions.begin(node, duration, now))
    }

    /// Queue completion signals for transitions that have elapsed by `now`.
    pub fn advance(&mut self, now: Instant) {
        self.transitions.advance(now);
    }

    /// Queue completion signals for every running transition.
    pub fn finish_transitions(&mut self) {
        self.transitions.finish_all();
    }

    pub fn has_active_transitions(&self) -> bool {
        self.transitions.has_active()
    }

    /// Drain queued [`Event::TransitionEnd`] signals.
    pub fn take_ended(&mut self) -> Vec<Event> {
        self.transitions.take_ended()
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.transitions.set_reduced_motion(enabled);
    }
}
