use std::collections::BTreeMap;

use crate::document::NodeId;
use crate::transitions::TransitionId;

/// Input and rendering events with element targeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Key press event, targeted at the focused element
    Key {
        target: Option<NodeId>,
        key: Key,
        modifiers: Modifiers,
    },
    /// Pointer activation (press and release on the same element)
    Click { target: NodeId },
    /// Pointer pressed on an element
    PointerDown { target: NodeId },
    /// A transition started with [`Document::begin_transition`](crate::Document::begin_transition)
    /// has finished on `target`
    TransitionEnd {
        target: NodeId,
        transition: TransitionId,
    },
    /// Element gained focus
    Focus { target: NodeId },
    /// Element lost focus
    Blur {
        target: NodeId,
        new_target: Option<NodeId>,
    },
}

impl Event {
    /// The element this event is aimed at, if any.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Event::Key { target, .. } => *target,
            Event::Click { target }
            | Event::PointerDown { target }
            | Event::TransitionEnd { target, .. }
            | Event::Focus { target }
            | Event::Blur { target, .. } => Some(*target),
        }
    }
}

/// A named signal emitted by a widget on one of its elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomEvent {
    pub name: String,
    pub target: NodeId,
    pub detail: BTreeMap<String, String>,
}

impl CustomEvent {
    pub fn new(name: impl Into<String>, target: NodeId) -> Self {
        Self {
            name: name.into(),
            target,
            detail: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.detail.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.detail.get(key).map(String::as_str)
    }
}

/// Simplified key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
}

/// Key modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Default::default()
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Default::default()
        }
    }

    pub fn none(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt
    }
}

// Conversion from crossterm types
impl From<crossterm::event::KeyCode> for Key {
    fn from(code: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode;
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Esc => Key::Escape,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Insert => Key::Insert,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Char('\0'), // Placeholder for unsupported keys
        }
    }
}

impl From<crossterm::event::KeyModifiers> for Modifiers {
    fn from(mods: crossterm::event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers;
        Self {
            shift: mods.contains(KeyModifiers::SHIFT),
            ctrl: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
        }
    }
}
