//! Listener registry
//!
//! Listeners are plain values rather than closures; the page matches on
//! [`Handler`] and hands the owning component its state explicitly.

use super::events::{EventKind, EventTarget};
use crate::components::{
    dialogs::ModalHandler, quantity::QuantityHandler, tooltips::TooltipHandler,
};

/// What runs when a listener fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Modal(ModalHandler),
    Tooltip(TooltipHandler),
    ValidateForm,
    AddToCart,
    NavToggle,
    NavResize,
    Quantity(QuantityHandler),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Listener {
    target: EventTarget,
    kind: EventKind,
    handler: Handler,
}

/// All listeners on a page, in attachment order
#[derive(Debug, Default, Clone)]
pub struct ListenerRegistry {
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener. Identical attachments are kept, like the DOM does
    /// for distinct closures.
    pub fn add(&mut self, target: EventTarget, kind: EventKind, handler: Handler) {
        self.listeners.push(Listener {
            target,
            kind,
            handler,
        });
    }

    /// Snapshot of the handlers for `target` and `kind`, in attachment order
    pub fn handlers_for(&self, target: EventTarget, kind: EventKind) -> Vec<Handler> {
        self.listeners
            .iter()
            .filter(|l| l.target == target && l.kind == kind)
            .map(|l| l.handler)
            .collect()
    }

    /// Number of listeners attached to `target`
    pub fn count_for(&self, target: EventTarget) -> usize {
        self.listeners.iter().filter(|l| l.target == target).count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
