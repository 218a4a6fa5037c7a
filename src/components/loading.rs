//! Busy state for buttons while a request is in flight

use crate::dom::{Document, NodeId};

pub const LOADING_LABEL: &str = r#"<i class="fas fa-spinner fa-spin"></i> Loading..."#;

/// Swap the label for a spinner and disable the button. Returns the label to
/// hand back to [`hide_loading`].
pub fn show_loading<D: Document + ?Sized>(doc: &mut D, button: NodeId) -> String {
    let original = doc.inner_html(button);
    doc.set_inner_html(button, LOADING_LABEL);
    doc.set_attribute(button, "disabled", "");
    original
}

pub fn hide_loading<D: Document + ?Sized>(doc: &mut D, button: NodeId, original: &str) {
    doc.set_inner_html(button, original);
    doc.remove_attribute(button, "disabled");
}
