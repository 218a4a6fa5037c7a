//! Page events and dispatch results

use crate::dom::NodeId;
use serde::{Deserialize, Serialize};

/// Event types the page glue listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    KeyDown,
    MouseEnter,
    MouseLeave,
    Submit,
    Change,
    Resize,
}

impl EventKind {
    /// Whether the event propagates from its target up to the document
    pub fn bubbles(self) -> bool {
        matches!(self, Self::Click | Self::KeyDown | Self::Submit | Self::Change)
    }
}

/// Where a listener is attached or an event is aimed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTarget {
    Node(NodeId),
    Document,
    Window,
}

impl EventTarget {
    pub fn node(self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(id),
            _ => None,
        }
    }
}

/// Event in flight
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    pub kind: EventKind,
    /// Where the event originated
    pub target: EventTarget,
    /// Where the currently running listener is attached
    pub current_target: EventTarget,
    /// Key name for keyboard events (`"Escape"`, `"Enter"`, ...)
    pub key: Option<String>,
    default_prevented: bool,
}

impl DomEvent {
    pub fn new(kind: EventKind, target: EventTarget) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            key: None,
            default_prevented: false,
        }
    }

    pub fn click(node: NodeId) -> Self {
        Self::new(EventKind::Click, EventTarget::Node(node))
    }

    /// Keyboard events without a focused element go to the document
    pub fn key_down(key: impl Into<String>) -> Self {
        let mut event = Self::new(EventKind::KeyDown, EventTarget::Document);
        event.key = Some(key.into());
        event
    }

    pub fn mouse_enter(node: NodeId) -> Self {
        Self::new(EventKind::MouseEnter, EventTarget::Node(node))
    }

    pub fn mouse_leave(node: NodeId) -> Self {
        Self::new(EventKind::MouseLeave, EventTarget::Node(node))
    }

    pub fn submit(form: NodeId) -> Self {
        Self::new(EventKind::Submit, EventTarget::Node(form))
    }

    pub fn change(node: NodeId) -> Self {
        Self::new(EventKind::Change, EventTarget::Node(node))
    }

    pub fn resize() -> Self {
        Self::new(EventKind::Resize, EventTarget::Window)
    }

    pub fn key_is(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Result of dispatching one event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    /// Listeners run for this event, nested dispatches excluded
    pub invoked: usize,
    pub default_prevented: bool,
}
