//! Disclosure items and their state.

use std::time::Instant;

use pagedom::{NodeId, TransitionId};

/// Lifecycle of one disclosure item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ItemState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl ItemState {
    /// True for `Open` and `Opening`: the panel is visible and interactive.
    pub fn is_expanded(self) -> bool {
        matches!(self, ItemState::Open | ItemState::Opening)
    }

    /// Presentational value mirrored into `data-state` for stylesheets.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemState::Closed => "closed",
            ItemState::Opening => "opening",
            ItemState::Open => "open",
            ItemState::Closing => "closing",
        }
    }
}

impl std::fmt::Display for ItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a trigger does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// Selects its panel (`aria-selected`); never collapses it.
    Tab,
    /// Expands or collapses its panel (`aria-expanded`).
    Toggle,
}

/// An interactive control bound to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub node: NodeId,
    pub kind: TriggerKind,
}

/// Bookkeeping for a close waiting on its transition signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingClose {
    /// The transition whose end finalizes this close.
    pub transition: Option<TransitionId>,
    /// Fallback deadline after which the close is finalized anyway.
    pub deadline: Option<Instant>,
    /// Emit a change notification when finalized.
    pub notify: bool,
}

/// One disclosure unit: trigger(s) plus the panel they control.
#[derive(Debug, Clone)]
pub struct Item {
    /// Stable identifier, assigned once at discovery.
    pub id: String,
    /// Boundary used for outside-click containment.
    pub root: NodeId,
    /// Element that mirrors `data-state`.
    pub state_node: NodeId,
    pub tab: Option<NodeId>,
    pub toggle: Option<NodeId>,
    pub panel: NodeId,
    /// Declared open in the initial markup.
    pub default_open: bool,
    /// Index of the owning group within the controller.
    pub group: usize,
    pub(crate) state: ItemState,
    pub(crate) pending: Option<PendingClose>,
}

impl Item {
    pub fn state(&self) -> ItemState {
        self.state
    }

    /// True while a close is waiting for its completion signal.
    pub fn is_close_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// All triggers bound to this item, tab first.
    pub fn triggers(&self) -> impl Iterator<Item = Trigger> + '_ {
        self.tab
            .map(|node| Trigger {
                node,
                kind: TriggerKind::Tab,
            })
            .into_iter()
            .chain(self.toggle.map(|node| Trigger {
                node,
                kind: TriggerKind::Toggle,
            }))
    }

    /// The trigger that labels the panel: the tab when present.
    pub fn primary_trigger(&self) -> Option<NodeId> {
        self.tab.or(self.toggle)
    }

    /// The trigger of kind `kind`, if bound.
    pub fn trigger(&self, kind: TriggerKind) -> Option<NodeId> {
        match kind {
            TriggerKind::Tab => self.tab,
            TriggerKind::Toggle => self.toggle,
        }
    }

    /// Kind of `node` if it is one of this item's triggers.
    pub fn trigger_kind(&self, node: NodeId) -> Option<TriggerKind> {
        self.triggers().find(|t| t.node == node).map(|t| t.kind)
    }
}
