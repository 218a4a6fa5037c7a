//! Hover tooltips for elements carrying `data-tooltip`

use crate::dom::{Document, NodeId, Selector};
use crate::page::{DomEvent, EventKind, EventTarget, Handler, ListenerRegistry};
use std::collections::HashMap;

pub const TOOLTIP_ATTR: &str = "data-tooltip";

/// Gap between the tooltip and the element it describes
const OFFSET_PX: f64 = 10.0;

const TOOLTIP_STYLES: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("background", "rgba(0, 0, 0, 0.8)"),
    ("color", "white"),
    ("padding", "8px 12px"),
    ("border-radius", "4px"),
    ("font-size", "14px"),
    ("z-index", "10000"),
    ("max-width", "200px"),
    ("word-wrap", "break-word"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipHandler {
    Show,
    Hide,
}

/// Tooltip currently shown for each hovered element
#[derive(Debug, Default, Clone)]
pub struct TooltipState {
    current: HashMap<NodeId, NodeId>,
}

impl TooltipState {
    pub fn current(&self, element: NodeId) -> Option<NodeId> {
        self.current.get(&element).copied()
    }
}

pub fn init<D: Document + ?Sized>(doc: &D, listeners: &mut ListenerRegistry) {
    for element in doc.query_all(&Selector::has_attr(TOOLTIP_ATTR)) {
        let target = EventTarget::Node(element);
        listeners.add(target, EventKind::MouseEnter, Handler::Tooltip(TooltipHandler::Show));
        listeners.add(target, EventKind::MouseLeave, Handler::Tooltip(TooltipHandler::Hide));
    }
}

pub fn handle<D: Document + ?Sized>(
    doc: &mut D,
    state: &mut TooltipState,
    handler: TooltipHandler,
    event: &DomEvent,
) {
    let Some(element) = event.current_target.node() else {
        return;
    };
    match handler {
        TooltipHandler::Show => show(doc, state, element),
        TooltipHandler::Hide => hide(doc, state, element),
    }
}

fn show<D: Document + ?Sized>(doc: &mut D, state: &mut TooltipState, element: NodeId) {
    let text = doc.attribute(element, TOOLTIP_ATTR).unwrap_or_default();
    if text.is_empty() {
        return;
    }
    let Some(body) = doc.body() else {
        return;
    };

    hide(doc, state, element);

    let tooltip = doc.create_element("div");
    doc.set_attribute(tooltip, "class", "tooltip");
    doc.set_text_content(tooltip, &text);
    for (property, value) in TOOLTIP_STYLES {
        doc.set_style(tooltip, property, value);
    }
    doc.append_child(body, tooltip);

    let anchor = doc.bounding_rect(element);
    let size = doc.bounding_rect(tooltip);
    let top = anchor.top - size.height - OFFSET_PX;
    let left = anchor.left + anchor.width / 2.0 - size.width / 2.0;
    doc.set_style(tooltip, "top", &format!("{}px", top));
    doc.set_style(tooltip, "left", &format!("{}px", left));

    state.current.insert(element, tooltip);
}

fn hide<D: Document + ?Sized>(doc: &mut D, state: &mut TooltipState, element: NodeId) {
    if let Some(tooltip) = state.current.remove(&element) {
        doc.remove(tooltip);
    }
}
