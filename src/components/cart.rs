//! "Add to cart" buttons
//!
//! A click records the product and briefly swaps the button label for a
//! confirmation.

use crate::dom::{Document, NodeId, Selector};
use crate::page::{
    DomEvent, EventKind, EventTarget, Handler, ListenerRegistry, TimerQueue, TimerTask,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

pub const CART_BUTTON_CLASS: &str = "add-to-cart";
pub const PRODUCT_ID_ATTR: &str = "data-product-id";

pub const ADDED_LABEL: &str = r#"<i class="fas fa-check"></i> Added!"#;
pub const ADDED_BACKGROUND: &str = "#48bb78";

#[derive(Debug, Default, Clone)]
pub struct CartState {
    /// Product ids in click order
    outbox: Vec<String>,
    /// Label to restore for every button showing the confirmation
    flashing: HashMap<NodeId, String>,
}

impl CartState {
    pub fn outbox(&self) -> &[String] {
        &self.outbox
    }

    pub fn is_flashing(&self, button: NodeId) -> bool {
        self.flashing.contains_key(&button)
    }
}

pub fn init<D: Document + ?Sized>(doc: &D, listeners: &mut ListenerRegistry) {
    for button in doc.query_all(&Selector::class(CART_BUTTON_CLASS)) {
        listeners.add(EventTarget::Node(button), EventKind::Click, Handler::AddToCart);
    }
}

pub fn handle_click<D: Document + ?Sized>(
    doc: &mut D,
    state: &mut CartState,
    timers: &mut TimerQueue,
    feedback: Duration,
    event: &mut DomEvent,
) {
    event.prevent_default();
    let Some(button) = event.current_target.node() else {
        return;
    };

    match doc.attribute(button, PRODUCT_ID_ATTR) {
        Some(product_id) => {
            info!("Adding product to cart: {}", product_id);
            state.outbox.push(product_id);
        }
        None => info!("Add-to-cart button {} has no product id", button),
    }

    // Keep the label from before the first click of a burst
    if !state.flashing.contains_key(&button) {
        let original = doc.inner_html(button);
        state.flashing.insert(button, original);
    }
    doc.set_inner_html(button, ADDED_LABEL);
    doc.set_style(button, "background", ADDED_BACKGROUND);
    timers.schedule(feedback, TimerTask::RestoreCartLabel(button));
}

/// Timer callback: put the original label back
pub fn restore<D: Document + ?Sized>(doc: &mut D, state: &mut CartState, button: NodeId) {
    if let Some(original) = state.flashing.remove(&button) {
        doc.set_inner_html(button, &original);
        doc.set_style(button, "background", "");
    }
}
