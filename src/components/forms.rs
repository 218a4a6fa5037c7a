//! Required-field validation for forms marked `data-validate`

use crate::dom::{Document, NodeId, Selector};
use crate::page::{DomEvent, EventKind, EventTarget, Handler, ListenerRegistry};
use tracing::debug;

pub const VALIDATE_ATTR: &str = "data-validate";
pub const ERROR_CLASS: &str = "input-error";
pub const REQUIRED_MESSAGE: &str = "This field is required";

const ERROR_COLOR: &str = "#e53e3e";

fn required_fields() -> Selector {
    let required = || Selector::has_attr("required");
    Selector::Either(vec![
        Selector::tag("input").and(required()),
        Selector::tag("select").and(required()),
        Selector::tag("textarea").and(required()),
    ])
}

pub fn init<D: Document + ?Sized>(doc: &D, listeners: &mut ListenerRegistry) {
    let forms = Selector::tag("form").and(Selector::has_attr(VALIDATE_ATTR));
    for form in doc.query_all(&forms) {
        listeners.add(EventTarget::Node(form), EventKind::Submit, Handler::ValidateForm);
    }
}

/// Submit listener: blocks the submission when any required field is empty
pub fn handle_submit<D: Document + ?Sized>(doc: &mut D, event: &mut DomEvent) {
    let Some(form) = event.current_target.node() else {
        return;
    };
    if !validate_form(doc, form) {
        debug!("Blocking submission of invalid form {}", form);
        event.prevent_default();
    }
}

/// Annotate every required field of `form`; true when all are filled in
pub fn validate_form<D: Document + ?Sized>(doc: &mut D, form: NodeId) -> bool {
    let mut valid = true;
    for field in doc.query_within(form, &required_fields()) {
        if doc.value(field).trim().is_empty() {
            show_input_error(doc, field, REQUIRED_MESSAGE);
            valid = false;
        } else {
            clear_input_error(doc, field);
        }
    }
    valid
}

pub fn show_input_error<D: Document + ?Sized>(doc: &mut D, field: NodeId, message: &str) {
    clear_input_error(doc, field);
    let Some(parent) = doc.parent(field) else {
        return;
    };

    let error = doc.create_element("div");
    doc.set_attribute(error, "class", ERROR_CLASS);
    doc.set_style(error, "color", ERROR_COLOR);
    doc.set_style(error, "font-size", "14px");
    doc.set_style(error, "margin-top", "5px");
    doc.set_text_content(error, message);
    doc.append_child(parent, error);

    doc.set_style(field, "border-color", ERROR_COLOR);
}

pub fn clear_input_error<D: Document + ?Sized>(doc: &mut D, field: NodeId) {
    if let Some(parent) = doc.parent(field) {
        if let Some(existing) = doc.query_first_within(parent, &Selector::class(ERROR_CLASS)) {
            doc.remove(existing);
        }
    }
    doc.set_style(field, "border-color", "");
}
