use std::collections::{BTreeMap, VecDeque};
use std::time::{Duration, Instant};

use crate::document::NodeId;
use crate::event::Event;

/// Identity of one running transition.
///
/// Ids increase monotonically for the lifetime of a [`TransitionTracker`], so a
/// listener can tell a late signal from an abandoned transition apart from the
/// one it is currently waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u64);

impl TransitionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TransitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transition-{}", self.0)
    }
}

/// A single active transition.
#[derive(Debug, Clone)]
struct ActiveTransition {
    target: NodeId,
    start: Instant,
    duration: Duration,
}

/// Tracks running transitions and the completion signals they produce.
///
/// Transitions are never cancelled: starting a new one on a node leaves the
/// older one running, and both eventually report completion.
#[derive(Debug, Default)]
pub struct TransitionTracker {
    next_id: u64,
    active: BTreeMap<TransitionId, ActiveTransition>,
    ended: VecDeque<Event>,
    /// Reduced motion flag - when true, transitions complete instantly.
    reduced_motion: bool,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable reduced motion (accessibility).
    /// When enabled, every transition ends as soon as it begins.
    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.reduced_motion = enabled;
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Returns true if any transition is currently active.
    pub fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Start a transition on `target` lasting `duration`.
    pub fn begin(&mut self, target: NodeId, duration: Duration, now: Instant) -> TransitionId {
        let id = TransitionId(self.next_id);
        self.next_id += 1;

        if self.reduced_motion {
            log::trace!("[transitions] {} on {:?} ended immediately", id, target);
            self.ended.push_back(Event::TransitionEnd {
                target,
                transition: id,
            });
        } else {
            log::trace!("[transitions] {} on {:?} for {:?}", id, target, duration);
            self.active.insert(
                id,
                ActiveTransition {
                    target,
                    start: now,
                    duration,
                },
            );
        }
        id
    }

    /// Move every transition whose duration has elapsed into the ended queue.
    pub fn advance(&mut self, now: Instant) {
        let finished: Vec<TransitionId> = self
            .active
            .iter()
            .filter(|(_, t)| now.saturating_duration_since(t.start) >= t.duration)
            .map(|(id, _)| *id)
            .collect();

        for id in finished {
            self.end(id);
        }
    }

    /// End every running transition now, in start order.
    pub fn finish_all(&mut self) {
        let ids: Vec<TransitionId> = self.active.keys().copied().collect();
        for id in ids {
            self.end(id);
        }
    }

    /// Drain the completion signals produced so far.
    pub fn take_ended(&mut self) -> Vec<Event> {
        self.ended.drain(..).collect()
    }

    fn end(&mut self, id: TransitionId) {
        if let Some(t) = self.active.remove(&id) {
            self.ended.push_back(Event::TransitionEnd {
                target: t.target,
                transition: id,
            });
        }
    }
}
