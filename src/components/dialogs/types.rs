//! Core dialog types
//!
//! Per-dialog state lives in a [`DialogRecord`] owned by the controller;
//! nothing is written onto the element itself.

use crate::dom::{Document, NodeId, Selector, DISPLAY_HIDDEN};
use crate::page::DomEvent;
use serde::{Deserialize, Serialize};

/// Class that marks an element as a dialog
pub const MODAL_CLASS: &str = "modal";

/// Class that marks a close control inside a dialog
pub const CLOSE_CLASS: &str = "close";

/// Attribute (and value) that marks a dismiss trigger inside a dialog
pub const DISMISS_ATTR: &str = "data-dismiss";
pub const DISMISS_VALUE: &str = "modal";

/// Key that dismisses a visible dialog
pub const ESCAPE_KEY: &str = "Escape";

/// Unique identifier for dialog elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogId(pub String);

impl DialogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DialogId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Selector for dialog elements
pub fn dialog_selector() -> Selector {
    Selector::class(MODAL_CLASS)
}

/// Selector for close controls and dismiss triggers
pub fn close_control_selector() -> Selector {
    Selector::class(CLOSE_CLASS).or(Selector::attr_eq(DISMISS_ATTR, DISMISS_VALUE))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Initialization {
    Uninitialized,
    Initialized,
}

/// Position of a dialog in its two-axis state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogStatus {
    pub visibility: Visibility,
    pub initialization: Initialization,
}

/// Controller-owned state for one dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRecord {
    pub node: NodeId,
    pub id: Option<DialogId>,
    pub initialized: bool,
    /// Times a dismissal trigger actually hid the dialog
    pub dismissals: u64,
}

impl DialogRecord {
    pub fn new(node: NodeId, id: Option<DialogId>) -> Self {
        Self {
            node,
            id,
            initialized: false,
            dismissals: 0,
        }
    }

    fn dismiss<D: Document + ?Sized>(&mut self, doc: &mut D) {
        doc.set_display(self.node, DISPLAY_HIDDEN);
        self.dismissals += 1;
    }
}

/// Dismissal listener bound to one dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalHandler {
    /// Click on a close control or dismiss trigger
    CloseControl { dialog: NodeId },
    /// Click anywhere that bubbles to the dialog container
    Backdrop { dialog: NodeId },
    /// Document-level keydown
    Escape { dialog: NodeId },
}

impl ModalHandler {
    pub fn dialog(&self) -> NodeId {
        match *self {
            Self::CloseControl { dialog } | Self::Backdrop { dialog } | Self::Escape { dialog } => {
                dialog
            }
        }
    }

    /// Run the handler against its dialog's record. Returns whether the
    /// dialog was hidden.
    pub fn fire<D: Document + ?Sized>(
        &self,
        doc: &mut D,
        record: &mut DialogRecord,
        event: &DomEvent,
    ) -> bool {
        let dismiss = match self {
            Self::CloseControl { .. } => true,
            // Only clicks that land on the container itself, not its content
            Self::Backdrop { .. } => event.target.node() == Some(record.node),
            // Visibility is read now, not when the handler was bound
            Self::Escape { .. } => event.key_is(ESCAPE_KEY) && doc.is_visible(record.node),
        };

        if dismiss {
            record.dismiss(doc);
        }
        dismiss
    }
}

/// Serializable view of a dialog for reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogSnapshot {
    pub id: Option<String>,
    pub initialized: bool,
    pub visible: bool,
    pub display: String,
    pub dismissals: u64,
}
