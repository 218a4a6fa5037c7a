//! Page host
//!
//! A [`Page`] stands in for the browser around a [`Document`]: it keeps the
//! listener registry, dispatches events with bubbling, owns the virtual clock
//! and holds the state of every component.

pub mod events;
pub mod listeners;
pub mod timers;

pub use events::{DispatchOutcome, DomEvent, EventKind, EventTarget};
pub use listeners::{Handler, ListenerRegistry};
pub use timers::{TimerQueue, TimerTask};

use crate::components::{
    cart::{self, CartState},
    dialogs::{self, DialogSnapshot, ModalController},
    flash, forms,
    nav::{self, NavState},
    quantity,
    tooltips::{self, TooltipState},
};
use crate::config::{PageOptions, Viewport};
use crate::dom::{Document, NodeId};
use std::time::Duration;
use tracing::debug;

pub struct Page<D: Document> {
    document: D,
    options: PageOptions,
    viewport: Viewport,
    listeners: ListenerRegistry,
    timers: TimerQueue,
    modals: ModalController,
    tooltips: TooltipState,
    cart: CartState,
    nav: Option<NavState>,
    invocations: u64,
}

impl<D: Document> Page<D> {
    /// Wrap a document without wiring anything
    pub fn new(document: D, options: PageOptions) -> Self {
        Self {
            document,
            viewport: options.viewport,
            options,
            listeners: ListenerRegistry::new(),
            timers: TimerQueue::new(),
            modals: ModalController::new(),
            tooltips: TooltipState::default(),
            cart: CartState::default(),
            nav: None,
            invocations: 0,
        }
    }

    /// Wrap a document and wire every behaviour, as on content load
    pub fn load(document: D, options: PageOptions) -> Self {
        let mut page = Self::new(document, options);
        page.wire();
        page
    }

    fn wire(&mut self) {
        tooltips::init(&self.document, &mut self.listeners);
        forms::init(&self.document, &mut self.listeners);
        cart::init(&self.document, &mut self.listeners);
        self.nav = nav::init(
            &mut self.document,
            &mut self.listeners,
            self.viewport,
            self.options.breakpoint_px,
        );
        flash::init(&self.document, &mut self.timers, self.options.flash_delay);
        self.init_modals();
        quantity::init(&self.document, &mut self.listeners);
        debug!("Page wired with {} listener(s)", self.listeners.len());
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn modals(&self) -> &ModalController {
        &self.modals
    }

    pub fn tooltips(&self) -> &TooltipState {
        &self.tooltips
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Time elapsed on the page clock
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Total listeners run since the page was created
    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    /// Wire dialogs added since the last call
    pub fn init_modals(&mut self) {
        self.modals.initialize(&self.document, &mut self.listeners);
    }

    pub fn open_modal(&mut self, id: &str) {
        dialogs::open(&mut self.document, id);
    }

    pub fn close_modal(&mut self, id: &str) {
        dialogs::close(&mut self.document, id);
    }

    pub fn dialogs(&self) -> Vec<DialogSnapshot> {
        self.modals.snapshot(&self.document)
    }

    pub fn click(&mut self, node: NodeId) -> DispatchOutcome {
        self.dispatch(DomEvent::click(node))
    }

    pub fn key_down(&mut self, key: &str) -> DispatchOutcome {
        self.dispatch(DomEvent::key_down(key))
    }

    pub fn hover(&mut self, node: NodeId) -> DispatchOutcome {
        self.dispatch(DomEvent::mouse_enter(node))
    }

    pub fn leave(&mut self, node: NodeId) -> DispatchOutcome {
        self.dispatch(DomEvent::mouse_leave(node))
    }

    pub fn submit(&mut self, form: NodeId) -> DispatchOutcome {
        self.dispatch(DomEvent::submit(form))
    }

    pub fn resize(&mut self, width: u32, height: u32) -> DispatchOutcome {
        self.viewport = Viewport { width, height };
        self.dispatch(DomEvent::resize())
    }

    /// Run an event through its propagation path
    pub fn dispatch(&mut self, mut event: DomEvent) -> DispatchOutcome {
        let mut invoked = 0;

        for current in self.propagation_path(&event) {
            event.current_target = current;
            for handler in self.listeners.handlers_for(current, event.kind) {
                self.invoke(handler, &mut event);
                invoked += 1;
            }
        }

        self.invocations += invoked as u64;
        DispatchOutcome {
            invoked,
            default_prevented: event.default_prevented(),
        }
    }

    fn propagation_path(&self, event: &DomEvent) -> Vec<EventTarget> {
        let EventTarget::Node(origin) = event.target else {
            return vec![event.target];
        };
        if !event.kind.bubbles() {
            return vec![event.target];
        }

        let mut path = vec![event.target];
        let mut current = self.document.parent(origin);
        while let Some(node) = current {
            path.push(EventTarget::Node(node));
            current = self.document.parent(node);
        }
        if self.document.is_connected(origin) {
            path.push(EventTarget::Document);
        }
        path
    }

    fn invoke(&mut self, handler: Handler, event: &mut DomEvent) {
        match handler {
            Handler::Modal(modal) => {
                self.modals.handle(&mut self.document, &modal, event);
            }
            Handler::Tooltip(tooltip) => {
                tooltips::handle(&mut self.document, &mut self.tooltips, tooltip, event);
            }
            Handler::ValidateForm => forms::handle_submit(&mut self.document, event),
            Handler::AddToCart => cart::handle_click(
                &mut self.document,
                &mut self.cart,
                &mut self.timers,
                self.options.cart_feedback,
                event,
            ),
            Handler::NavToggle => {
                if let Some(state) = &self.nav {
                    nav::toggle(&mut self.document, state);
                }
            }
            Handler::NavResize => {
                if let Some(state) = &self.nav {
                    nav::apply_viewport(
                        &mut self.document,
                        state,
                        self.viewport,
                        self.options.breakpoint_px,
                    );
                }
            }
            Handler::Quantity(step) => {
                if let Some(input) = quantity::step(&mut self.document, step) {
                    self.dispatch(DomEvent::change(input));
                }
            }
        }
    }

    /// Move the page clock forward, running every timer that comes due
    pub fn advance(&mut self, by: Duration) {
        let until = self.timers.now() + by;
        while let Some(task) = self.timers.pop_due(until) {
            self.run_timer(task);
        }
        self.timers.advance_to(until);
    }

    fn run_timer(&mut self, task: TimerTask) {
        match task {
            TimerTask::FadeFlash(alert) => {
                flash::fade(&mut self.document, &mut self.timers, alert, self.options.flash_fade)
            }
            TimerTask::RemoveFlash(alert) => flash::remove(&mut self.document, alert),
            TimerTask::RestoreCartLabel(button) => {
                cart::restore(&mut self.document, &mut self.cart, button)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{cart::ADDED_LABEL, nav::TOGGLE_CLASS};
    use crate::dom::{MemoryDocument, Selector};

    const STORE: &str = r#"<!DOCTYPE html>
<html><body>
  <nav><ul class="nav-links"><li>Shop</li></ul><div class="nav-auth">Login</div></nav>
  <div class="alert alert-info" id="welcome">Welcome back</div>
  <div id="login-modal" class="modal" style="display: none">
    <div class="modal-content" id="login-content">
      <p id="login-text">Please sign in</p>
      <button id="login-dismiss" data-dismiss="modal">Not now</button>
    </div>
  </div>
  <div id="terms-modal" class="modal" style="display: none">
    <div class="modal-content"><span class="close" id="terms-close">x</span></div>
  </div>
  <button class="add-to-cart" data-product-id="42" id="buy">Add</button>
  <div class="quantity-control">
    <button class="quantity-minus" id="minus">-</button>
    <input class="quantity-input" id="qty" value="1">
    <button class="quantity-plus" id="plus">+</button>
  </div>
  <form id="checkout" data-validate><div><input id="address" required></div></form>
  <span id="hint" data-tooltip="Ships in 2 days">?</span>
</body></html>"#;

    fn page() -> Page<MemoryDocument> {
        Page::load(MemoryDocument::parse(STORE), PageOptions::default())
    }

    fn node(page: &Page<MemoryDocument>, id: &str) -> NodeId {
        page.document().element_by_id(id).unwrap()
    }

    fn display(page: &Page<MemoryDocument>, id: &str) -> String {
        page.document().display(node(page, id))
    }

    #[test]
    fn test_repeated_initialize_fires_one_handler_per_trigger() {
        let mut page = page();
        page.init_modals();
        page.init_modals();
        let dismiss = node(&page, "login-dismiss");

        page.open_modal("login-modal");
        let outcome = page.click(dismiss);

        // close control, then the backdrop listener as the click bubbles
        assert_eq!(outcome.invoked, 2);
        assert_eq!(page.modals().record(node(&page, "login-modal")).unwrap().dismissals, 1);
        assert_eq!(display(&page, "login-modal"), "none");
    }

    #[test]
    fn test_click_inside_content_keeps_dialog_open() {
        let mut page = page();
        page.open_modal("login-modal");

        page.click(node(&page, "login-text"));
        assert_eq!(display(&page, "login-modal"), "block");

        page.click(node(&page, "login-modal"));
        assert_eq!(display(&page, "login-modal"), "none");
    }

    #[test]
    fn test_escape_only_hides_visible_dialogs() {
        let mut page = page();
        let before = page.document().to_html();

        let outcome = page.key_down("Escape");
        assert_eq!(outcome.invoked, 2);
        assert_eq!(page.document().to_html(), before);

        page.open_modal("terms-modal");
        page.key_down("Escape");
        assert_eq!(display(&page, "terms-modal"), "none");
        assert_eq!(display(&page, "login-modal"), "none");
    }

    #[test]
    fn test_escape_hides_every_visible_dialog() {
        let mut page = page();
        page.open_modal("terms-modal");
        page.open_modal("login-modal");

        page.key_down("Escape");

        assert!(page.dialogs().iter().all(|d| !d.visible));
    }

    #[test]
    fn test_unknown_ids_leave_page_untouched() {
        let mut page = page();
        let before = page.document().to_html();

        page.open_modal("nonexistent-id");
        page.close_modal("nonexistent-id");

        assert_eq!(page.document().to_html(), before);
        assert_eq!(page.invocations(), 0);
    }

    #[test]
    fn test_open_close_round_trip() {
        let mut page = page();
        let initial = display(&page, "login-modal");

        page.open_modal("login-modal");
        assert_eq!(display(&page, "login-modal"), "block");
        page.close_modal("login-modal");

        assert_eq!(display(&page, "login-modal"), initial);
        assert_eq!(initial, "none");
    }

    #[test]
    fn test_login_modal_dismiss_scenario() {
        let mut page = page();
        page.open_modal("login-modal");

        page.click(node(&page, "login-dismiss"));

        assert_eq!(display(&page, "login-modal"), "none");
    }

    #[test]
    fn test_dialog_without_close_controls_still_dismissable() {
        let mut page = Page::load(
            MemoryDocument::parse(r#"<body><div id="bare" class="modal">content</div></body>"#),
            PageOptions::default(),
        );

        page.open_modal("bare");
        page.key_down("Escape");
        assert_eq!(display(&page, "bare"), "none");

        page.open_modal("bare");
        page.click(node(&page, "bare"));
        assert_eq!(display(&page, "bare"), "none");
    }

    #[test]
    fn test_opening_before_initialize_has_no_dismissal() {
        let mut page = Page::new(MemoryDocument::parse(STORE), PageOptions::default());
        page.open_modal("login-modal");

        page.key_down("Escape");
        assert_eq!(display(&page, "login-modal"), "block");

        page.init_modals();
        page.key_down("Escape");
        assert_eq!(display(&page, "login-modal"), "none");
    }

    #[test]
    fn test_cart_click_flashes_for_feedback_window() {
        let mut page = page();
        let buy = node(&page, "buy");

        let outcome = page.click(buy);
        assert!(outcome.default_prevented);
        assert_eq!(page.cart().outbox(), ["42".to_string()]);
        assert_eq!(page.document().inner_html(buy), ADDED_LABEL);

        page.advance(Duration::from_millis(1999));
        assert_eq!(page.document().inner_html(buy), ADDED_LABEL);
        page.advance(Duration::from_millis(1));
        assert_eq!(page.document().inner_html(buy), "Add");
    }

    #[test]
    fn test_flash_message_removed_after_fade() {
        let mut page = page();

        page.advance(Duration::from_secs(5));
        let alert = node(&page, "welcome");
        assert_eq!(page.document().style(alert, "opacity").as_deref(), Some("0"));

        page.advance(Duration::from_millis(500));
        assert!(page.document().element_by_id("welcome").is_none());
    }

    #[test]
    fn test_single_advance_runs_chained_timers() {
        let mut page = page();
        page.advance(Duration::from_secs(6));
        assert!(page.document().element_by_id("welcome").is_none());
        assert_eq!(page.now(), Duration::from_secs(6));
    }

    #[test]
    fn test_quantity_step_announces_change() {
        let mut page = page();
        let plus = node(&page, "plus");
        let minus = node(&page, "minus");
        let qty = node(&page, "qty");

        page.click(plus);
        assert_eq!(page.document().value(qty), "2");
        let after_plus = page.invocations();

        page.click(minus);
        page.click(minus);
        assert_eq!(page.document().value(qty), "1");
        // the second minus changes nothing, so no change event is dispatched
        assert_eq!(page.invocations(), after_plus + 2);
    }

    #[test]
    fn test_invalid_form_submission_is_blocked() {
        let mut page = page();
        let checkout = node(&page, "checkout");

        assert!(page.submit(checkout).default_prevented);

        let address = node(&page, "address");
        page.document_mut().set_value(address, "1 Main St");
        assert!(!page.submit(checkout).default_prevented);
    }

    #[test]
    fn test_nav_follows_resize() {
        let mut page = page();
        let toggle = page.document().query_first(&Selector::class(TOGGLE_CLASS)).unwrap();
        assert_eq!(page.document().display(toggle), "none");

        page.resize(600, 800);
        assert_eq!(page.document().display(toggle), "block");

        page.click(toggle);
        let links = page.document().query_first(&Selector::class("nav-links")).unwrap();
        assert_eq!(page.document().display(links), "flex");

        page.resize(1024, 800);
        assert_eq!(page.document().display(toggle), "none");
    }

    #[test]
    fn test_tooltip_hover_cycle() {
        let mut page = page();
        let hint = node(&page, "hint");

        page.hover(hint);
        assert!(page.tooltips().current(hint).is_some());
        page.leave(hint);

        assert!(page.tooltips().current(hint).is_none());
        assert!(page.document().query_all(&Selector::class("tooltip")).is_empty());
    }
}
