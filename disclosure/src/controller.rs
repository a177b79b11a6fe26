//! The disclosure controller: one independent set of triggers and panels.

use std::collections::HashSet;
use std::time::Instant;

use pagedom::{CustomEvent, Document, Key, Modifiers, NodeId, TransitionId};
use uuid::Uuid;

use crate::a11y;
use crate::config::DisclosureConfig;
use crate::error::{InitError, MarkupError};
use crate::hash::DeepLink;
use crate::item::{Item, ItemState, PendingClose, TriggerKind};
use crate::roving::{Group, NavAction};
use crate::schema::{Binding, MarkupSchema};

/// Identifier of a controller instance.
///
/// Taken from the instance attribute (`data-ct="faq"`) or the root's element
/// id when present, generated otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControllerId(String);

impl ControllerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a random `{prefix}-xxxxxxxx` id.
    pub fn generate(prefix: &str) -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self(format!("{prefix}-{}", &uuid[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ControllerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Options for [`Controller::activate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivateOptions {
    /// Collapse the item instead when it is already open.
    pub allow_collapse: bool,
}

impl ActivateOptions {
    /// Toggle semantics: open when closed, collapse when open.
    pub fn toggle() -> Self {
        Self {
            allow_collapse: true,
        }
    }
}

/// Payload of the change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDetail {
    pub controller_id: ControllerId,
    /// Item whose visibility changed.
    pub id: String,
    /// Controller root element.
    pub root: NodeId,
    /// True when the item opened, false when a user-initiated collapse finished.
    pub open: bool,
}

/// Follow-up the host should perform after an input was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Move keyboard focus to this element.
    Focus(NodeId),
    /// Perform this element's default action, as if it were clicked.
    Click(NodeId),
}

type ChangeCallback = Box<dyn FnMut(&ChangeDetail)>;

/// Owns the open/closed state of a set of items and keeps the document's
/// accessibility attributes consistent with it.
///
/// Every state change goes through [`Controller::activate`] (or its
/// [`toggle`](Controller::toggle) form). Input handlers translate clicks and
/// keys into those calls.
pub struct Controller {
    id: ControllerId,
    root: NodeId,
    schema: MarkupSchema,
    config: DisclosureConfig,
    items: Vec<Item>,
    groups: Vec<Group>,
    /// At least one item is bound to a tab: selection is always exclusive.
    tabs_mode: bool,
    on_change: Vec<ChangeCallback>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("schema", &self.schema.name)
            .field("items", &self.items)
            .field("groups", &self.groups)
            .field("tabs_mode", &self.tabs_mode)
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Discover, wire and initialize the items under `root`.
    ///
    /// Malformed items are logged and skipped. Fails only when the deep-link
    /// pattern is invalid or nothing usable remains.
    pub fn init(
        doc: &mut Document,
        root: NodeId,
        schema: MarkupSchema,
        config: DisclosureConfig,
    ) -> Result<Self, InitError> {
        let deep_link = if config.sync_hash {
            Some(DeepLink::new(&config.hash_pattern)?)
        } else {
            None
        };

        let id = instance_id(doc, root, &schema);

        let items = match &schema.binding {
            Binding::Nested {
                item,
                trigger,
                panel,
            } => discover_nested(doc, root, item, trigger, panel, &schema),
            Binding::Keyed { tab, toggle, panel } => {
                discover_keyed(doc, root, tab, toggle, panel, &schema)
            }
        };

        if items.is_empty() {
            return Err(InitError::NoItems {
                root: a11y::describe(doc, root),
            });
        }

        let tabs_mode = items.iter().any(|item| item.tab.is_some());
        let mut controller = Self {
            id,
            root,
            schema,
            config,
            items,
            groups: Vec::new(),
            tabs_mode,
            on_change: Vec::new(),
        };

        controller.build_groups(doc);
        for item in &controller.items {
            a11y::wire(doc, item, &controller.schema.id_prefix);
        }

        let initial = controller.initial_open(doc, deep_link.as_ref());
        controller.apply_initial(doc, &initial);

        log::debug!(
            "[disclosure] {} '{}' bound {} items in {} groups, open: {:?}",
            controller.schema.name,
            controller.id,
            controller.items.len(),
            controller.groups.len(),
            controller.open_ids()
        );

        Ok(controller)
    }

    // Accessors

    pub fn id(&self) -> &ControllerId {
        &self.id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn schema(&self) -> &MarkupSchema {
        &self.schema
    }

    pub fn config(&self) -> &DisclosureConfig {
        &self.config
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn is_tabs_mode(&self) -> bool {
        self.tabs_mode
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn state(&self, id: &str) -> Option<ItemState> {
        self.item(id).map(Item::state)
    }

    /// Ids of every item currently `Open` or `Opening`.
    pub fn open_ids(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.state.is_expanded())
            .map(|item| item.id.as_str())
            .collect()
    }

    /// True if `node` is a trigger or panel of one of this controller's items.
    pub fn owns(&self, node: NodeId) -> bool {
        self.items
            .iter()
            .any(|item| item.panel == node || item.trigger_kind(node).is_some())
    }

    /// Register a callback invoked with every change notification.
    pub fn on_change(&mut self, callback: impl FnMut(&ChangeDetail) + 'static) {
        self.on_change.push(Box::new(callback));
    }

    // Operations

    /// Open the item `id`, closing its siblings when the group is single-open.
    ///
    /// With `allow_collapse`, an open item is collapsed instead. Unknown ids
    /// are ignored. Returns true if a transition started.
    pub fn activate(&mut self, doc: &mut Document, id: &str, options: ActivateOptions) -> bool {
        let Some(index) = self.index_of(id) else {
            log::debug!("[disclosure] {}: ignoring unknown id '{}'", self.id, id);
            return false;
        };
        self.activate_index(doc, index, options, Instant::now(), true)
    }

    /// [`activate`](Self::activate) with collapse allowed.
    pub fn toggle(&mut self, doc: &mut Document, id: &str) -> bool {
        self.activate(doc, id, ActivateOptions::toggle())
    }

    fn activate_index(
        &mut self,
        doc: &mut Document,
        index: usize,
        options: ActivateOptions,
        now: Instant,
        animate: bool,
    ) -> bool {
        let state = self.items[index].state;

        if options.allow_collapse && state == ItemState::Open {
            self.begin_close(doc, index, true, now);
            return true;
        }

        if state.is_expanded() {
            log::trace!(
                "[disclosure] {}: '{}' already {}",
                self.id,
                self.items[index].id,
                state
            );
            return false;
        }

        let group = self.items[index].group;
        if self.groups[group].single_open || self.tabs_mode {
            let siblings: Vec<usize> = self.groups[group]
                .items
                .iter()
                .copied()
                .filter(|&i| i != index && self.items[i].state.is_expanded())
                .collect();
            for sibling in siblings {
                self.begin_close(doc, sibling, false, now);
            }
        }

        self.open(doc, index, animate);
        self.notify(doc, index, true);
        true
    }

    /// Collapse every open item when `target` lies outside all of this
    /// controller's items. A click inside any item closes nothing.
    /// Returns the number of items that started closing.
    pub fn close_outside(&mut self, doc: &mut Document, target: NodeId) -> usize {
        if self.items.iter().any(|item| doc.contains(item.root, target)) {
            return 0;
        }

        let open: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.state == ItemState::Open)
            .map(|(i, _)| i)
            .collect();

        let now = Instant::now();
        for &index in &open {
            self.activate_index(doc, index, ActivateOptions::toggle(), now, true);
        }
        open.len()
    }

    /// Finalize a close whose transition signal arrived.
    ///
    /// Signals from abandoned transitions (the item was reopened, or closed
    /// again since) are ignored. Returns true if a close was finalized.
    pub fn handle_transition_end(
        &mut self,
        doc: &mut Document,
        target: NodeId,
        transition: TransitionId,
    ) -> bool {
        let Some(index) = self.items.iter().position(|item| item.panel == target) else {
            return false;
        };

        let item = &self.items[index];
        let awaited = item
            .pending
            .and_then(|pending| pending.transition)
            .filter(|_| item.state == ItemState::Closing);

        if awaited != Some(transition) {
            log::trace!(
                "[disclosure] {}: ignoring stale {} on '{}'",
                self.id,
                transition,
                item.id
            );
            return false;
        }

        self.finalize_close(doc, index);
        true
    }

    /// Finalize closes whose fallback deadline has passed.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) {
        let due: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.state == ItemState::Closing
                    && item
                        .pending
                        .and_then(|p| p.deadline)
                        .is_some_and(|deadline| deadline <= now)
            })
            .map(|(i, _)| i)
            .collect();

        for index in due {
            log::debug!(
                "[disclosure] {}: close fallback fired for '{}'",
                self.id,
                self.items[index].id
            );
            self.finalize_close(doc, index);
        }
    }

    // Input

    /// Handle a click landing on (or inside) one of this controller's triggers.
    pub fn handle_click(&mut self, doc: &mut Document, target: NodeId) -> Option<Effect> {
        let (index, trigger, kind) = self.trigger_containing(doc, target)?;
        let options = match kind {
            TriggerKind::Tab => ActivateOptions::default(),
            TriggerKind::Toggle => ActivateOptions::toggle(),
        };
        self.activate_index(doc, index, options, Instant::now(), true);
        Some(Effect::Focus(trigger))
    }

    /// Keep the roving anchor on the trigger the pointer pressed.
    pub fn handle_pointer_down(&mut self, doc: &mut Document, target: NodeId) -> bool {
        let Some((index, trigger, _)) = self.trigger_containing(doc, target) else {
            return false;
        };
        let group = &mut self.groups[self.items[index].group];
        match group.position(trigger) {
            Some(pos) => {
                group.set_anchor(doc, pos);
                true
            }
            None => false,
        }
    }

    /// Roving-focus keyboard handling for a key pressed on a trigger.
    pub fn handle_key(
        &mut self,
        doc: &mut Document,
        target: NodeId,
        key: Key,
        modifiers: Modifiers,
    ) -> Option<Effect> {
        let action = NavAction::from_key(key, modifiers)?;
        let (index, kind) = self
            .items
            .iter()
            .enumerate()
            .find_map(|(i, item)| item.trigger_kind(target).map(|kind| (i, kind)))?;

        if action == NavAction::Activate {
            return Some(Effect::Click(target));
        }

        let group_index = self.items[index].group;
        let group = &mut self.groups[group_index];
        let from = group.position(target)?;
        let to = group.step(from, action);
        group.set_anchor(doc, to);
        let next = group.ring()[to];

        let activate_on_arrow = self
            .config
            .activate_on_arrow
            .unwrap_or(kind == TriggerKind::Tab);
        if activate_on_arrow {
            if let Some(next_index) = self
                .items
                .iter()
                .position(|item| item.trigger_kind(next).is_some())
            {
                self.activate_index(
                    doc,
                    next_index,
                    ActivateOptions::default(),
                    Instant::now(),
                    true,
                );
            }
        }

        Some(Effect::Focus(next))
    }

    // Transitions

    fn open(&mut self, doc: &mut Document, index: usize, animate: bool) {
        let item = &mut self.items[index];
        // Drop any close in flight; its late signal no longer matches.
        item.pending = None;
        item.state = ItemState::Opening;

        a11y::reveal(doc, item.panel);
        a11y::sync_triggers(doc, item, true);
        if animate {
            doc.begin_transition(item.panel);
        }

        item.state = ItemState::Open;
        a11y::sync_state(doc, item, ItemState::Open);

        let ring_trigger = self.ring_trigger(index);
        let group = &mut self.groups[self.items[index].group];
        if let Some(pos) = ring_trigger.and_then(|t| group.position(t)) {
            group.set_anchor(doc, pos);
        }
    }

    fn begin_close(&mut self, doc: &mut Document, index: usize, notify: bool, now: Instant) {
        let fallback = self.config.close_fallback_duration();
        let item = &mut self.items[index];
        if !item.state.is_expanded() {
            return;
        }

        item.state = ItemState::Closing;
        a11y::sync_state(doc, item, ItemState::Closing);
        a11y::sync_triggers(doc, item, false);

        let transition = doc.begin_transition_at(item.panel, now);
        if transition.is_none() && fallback.is_none() {
            log::debug!(
                "[disclosure] {}: '{}' has no transition; it stays closing",
                self.id,
                item.id
            );
        }
        item.pending = Some(PendingClose {
            transition,
            deadline: fallback.map(|after| now + after),
            notify,
        });

        if transition.is_none() && fallback.is_some_and(|after| after.is_zero()) {
            self.finalize_close(doc, index);
        }
    }

    fn finalize_close(&mut self, doc: &mut Document, index: usize) {
        let item = &mut self.items[index];
        let Some(pending) = item.pending.take() else {
            return;
        };

        a11y::conceal(doc, item.panel);
        item.state = ItemState::Closed;
        a11y::sync_state(doc, item, ItemState::Closed);

        if pending.notify {
            self.notify(doc, index, false);
        }
    }

    fn notify(&mut self, doc: &mut Document, index: usize, open: bool) {
        let item = &self.items[index];
        let target = self.groups[item.group].boundary.unwrap_or(self.root);
        let detail = ChangeDetail {
            controller_id: self.id.clone(),
            id: item.id.clone(),
            root: self.root,
            open,
        };

        doc.dispatch_custom(
            CustomEvent::new(self.schema.change_event.as_str(), target)
                .with("controllerId", self.id.as_str())
                .with("id", item.id.as_str())
                .with("open", open.to_string()),
        );
        for callback in &mut self.on_change {
            callback(&detail);
        }
    }

    // Initialization

    fn build_groups(&mut self, doc: &Document) {
        let boundary_attr = self
            .config
            .group_boundary
            .clone()
            .or_else(|| self.schema.group.clone());
        let single_open = self.config.single_open;

        for index in 0..self.items.len() {
            let boundary = if self.schema.is_keyed() {
                Some(self.root)
            } else {
                boundary_attr
                    .as_deref()
                    .and_then(|attr| doc.closest(self.items[index].root, attr))
                    .filter(|&b| doc.contains(self.root, b))
            };

            let group = match self.groups.iter().position(|g| g.boundary == boundary) {
                Some(g) => g,
                None => {
                    self.groups.push(Group::new(boundary, single_open));
                    self.groups.len() - 1
                }
            };
            self.groups[group].items.push(index);
            self.items[index].group = group;
        }

        let order = doc.descendants(doc.root());
        for group_index in 0..self.groups.len() {
            let group_has_tabs = self.groups[group_index]
                .items
                .iter()
                .any(|&i| self.items[i].tab.is_some());
            let mut ring: Vec<NodeId> = self.groups[group_index]
                .items
                .iter()
                .filter_map(|&i| {
                    let item = &self.items[i];
                    if group_has_tabs { item.tab } else { item.toggle }
                })
                .collect();
            ring.sort_by_key(|node| order.iter().position(|n| n == node));
            self.groups[group_index].set_ring(ring);
        }
    }

    fn initial_open(&self, doc: &Document, deep_link: Option<&DeepLink>) -> Vec<usize> {
        if let Some(id) = deep_link.and_then(|link| link.parse(doc.location_hash())) {
            match self.index_of(&id) {
                Some(index) => {
                    log::debug!("[disclosure] {}: deep link opens '{}'", self.id, id);
                    return vec![index];
                }
                None => log::debug!("[disclosure] {}: deep link '{}' names no panel", self.id, id),
            }
        }

        if let Some(id) = &self.config.initial_id {
            match self.index_of(id) {
                Some(index) => return vec![index],
                None => log::debug!("[disclosure] {}: initial id '{}' not found", self.id, id),
            }
        }

        let mut claimed: HashSet<usize> = HashSet::new();
        let declared: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.default_open)
            .filter(|(_, item)| {
                let exclusive = self.groups[item.group].single_open || self.tabs_mode;
                !exclusive || claimed.insert(item.group)
            })
            .map(|(i, _)| i)
            .collect();
        if !declared.is_empty() {
            return declared;
        }

        if self.schema.is_keyed() {
            let visible = self.items.iter().position(|item| !doc.hidden(item.panel));
            return vec![visible.unwrap_or(0)];
        }

        Vec::new()
    }

    fn apply_initial(&mut self, doc: &mut Document, open: &[usize]) {
        for item in &mut self.items {
            item.state = ItemState::Closed;
            item.pending = None;
            a11y::conceal(doc, item.panel);
            a11y::sync_triggers(doc, item, false);
            a11y::sync_state(doc, item, ItemState::Closed);
        }

        // Initial selection goes through the regular activation path, minus the animation.
        let now = Instant::now();
        for &index in open {
            self.activate_index(doc, index, ActivateOptions::default(), now, false);
        }

        // Tab rings anchor on the selected tab, every other ring on its first trigger.
        for group_index in 0..self.groups.len() {
            let selected = if self.tabs_mode {
                self.groups[group_index]
                    .items
                    .iter()
                    .copied()
                    .find(|i| open.contains(i))
                    .and_then(|i| self.ring_trigger(i))
                    .and_then(|t| self.groups[group_index].position(t))
            } else {
                None
            };
            self.groups[group_index].set_anchor(doc, selected.unwrap_or(0));
        }
    }

    // Lookup

    fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// The trigger of `index` that takes part in its group's ring.
    fn ring_trigger(&self, index: usize) -> Option<NodeId> {
        let item = &self.items[index];
        let group = &self.groups[item.group];
        item.triggers()
            .map(|t| t.node)
            .find(|&node| group.position(node).is_some())
    }

    /// Innermost trigger containing `target`, with its item and kind.
    fn trigger_containing(
        &self,
        doc: &Document,
        target: NodeId,
    ) -> Option<(usize, NodeId, TriggerKind)> {
        let mut current = Some(target);
        while let Some(node) = current {
            for (index, item) in self.items.iter().enumerate() {
                if let Some(kind) = item.trigger_kind(node) {
                    return Some((index, node, kind));
                }
            }
            if node == self.root {
                break;
            }
            current = doc.parent(node);
        }
        None
    }
}

fn instance_id(doc: &Document, root: NodeId, schema: &MarkupSchema) -> ControllerId {
    schema
        .instance
        .as_deref()
        .and_then(|attr| doc.attr(root, attr))
        .filter(|value| !value.is_empty())
        .or_else(|| doc.id(root))
        .map(ControllerId::new)
        .unwrap_or_else(|| ControllerId::generate(&schema.id_prefix))
}

fn discover_nested(
    doc: &mut Document,
    root: NodeId,
    item_attr: &str,
    trigger_attr: &str,
    panel_attr: &str,
    schema: &MarkupSchema,
) -> Vec<Item> {
    let mut items: Vec<Item> = Vec::new();

    for node in doc.query_all(root, item_attr) {
        let trigger = doc.query(node, trigger_attr);
        let panel = doc.query(node, panel_attr);

        let (trigger, panel) = match (trigger, panel) {
            (Some(t), Some(p)) => (t, p),
            (None, _) => {
                skip(MarkupError::MissingTrigger {
                    item: a11y::describe(doc, node),
                    attr: trigger_attr.to_string(),
                });
                continue;
            }
            (_, None) => {
                skip(MarkupError::MissingPanel {
                    item: a11y::describe(doc, node),
                    attr: panel_attr.to_string(),
                });
                continue;
            }
        };

        let id = a11y::ensure_id(doc, panel, &format!("{}-panel", schema.id_prefix));
        if items.iter().any(|item| item.id == id) {
            skip(MarkupError::DuplicatePanel { id });
            continue;
        }

        let default_open = doc.has_attr(node, &schema.initially_open)
            || doc.attr(node, "data-state") == Some("open");

        items.push(Item {
            id,
            root: node,
            state_node: node,
            tab: None,
            toggle: Some(trigger),
            panel,
            default_open,
            group: 0,
            state: ItemState::Closed,
            pending: None,
        });
    }

    items
}

fn discover_keyed(
    doc: &mut Document,
    root: NodeId,
    tab_attr: &str,
    toggle_attr: &str,
    panel_attr: &str,
    schema: &MarkupSchema,
) -> Vec<Item> {
    let tabs = doc.query_all(root, tab_attr);
    let toggles = doc.query_all(root, toggle_attr);
    let mut items: Vec<Item> = Vec::new();

    for panel in doc.query_all(root, panel_attr) {
        let Some(id) = doc
            .attr(panel, panel_attr)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
        else {
            skip(MarkupError::EmptyKey {
                element: a11y::describe(doc, panel),
                attr: panel_attr.to_string(),
            });
            continue;
        };
        if items.iter().any(|item| item.id == id) {
            skip(MarkupError::DuplicatePanel { id });
            continue;
        }

        let tab = tabs
            .iter()
            .copied()
            .find(|&t| doc.attr(t, tab_attr) == Some(id.as_str()));
        let toggle = toggles
            .iter()
            .copied()
            .find(|&t| doc.attr(t, toggle_attr) == Some(id.as_str()));
        if tab.is_none() && toggle.is_none() {
            skip(MarkupError::MissingTrigger {
                item: id,
                attr: format!("{tab_attr}|{toggle_attr}"),
            });
            continue;
        }

        let default_open = doc.has_attr(panel, &schema.initially_open)
            || tab.is_some_and(|t| doc.attr(t, "aria-selected") == Some("true"))
            || toggle.is_some_and(|t| doc.attr(t, "aria-expanded") == Some("true"));

        items.push(Item {
            id,
            root,
            state_node: panel,
            tab,
            toggle,
            panel,
            default_open,
            group: 0,
            state: ItemState::Closed,
            pending: None,
        });
    }

    for (attr, nodes) in [(tab_attr, &tabs), (toggle_attr, &toggles)] {
        for &node in nodes {
            let key = doc.attr(node, attr).unwrap_or_default();
            if !items.iter().any(|item| item.id == key) {
                skip(MarkupError::OrphanTrigger {
                    element: a11y::describe(doc, node),
                    id: key.to_string(),
                });
            }
        }
    }

    items
}

fn skip(error: MarkupError) {
    log::warn!("[disclosure] skipping: {}", error);
}
