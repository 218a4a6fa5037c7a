//! Modal controller
//!
//! The controller is responsible for:
//! - Discovering dialog elements that have not been wired yet
//! - Binding close-control, backdrop and Escape dismissal exactly once per dialog
//! - Routing fired dismissal listeners to the right dialog record

use super::types::*;
use crate::dom::{Document, NodeId, DISPLAY_HIDDEN, DISPLAY_VISIBLE};
use crate::page::{DomEvent, EventKind, EventTarget, Handler, ListenerRegistry};
use std::collections::HashMap;
use tracing::debug;

/// Show the element with `id`. Unknown ids are ignored.
pub fn open<D: Document + ?Sized>(doc: &mut D, id: &str) {
    match doc.element_by_id(id) {
        Some(node) => doc.set_display(node, DISPLAY_VISIBLE),
        None => debug!("open: no element with id '{}'", id),
    }
}

/// Hide the element with `id`. Unknown ids are ignored.
pub fn close<D: Document + ?Sized>(doc: &mut D, id: &str) {
    match doc.element_by_id(id) {
        Some(node) => doc.set_display(node, DISPLAY_HIDDEN),
        None => debug!("close: no element with id '{}'", id),
    }
}

/// Owns the per-dialog records
#[derive(Debug, Default, Clone)]
pub struct ModalController {
    records: HashMap<NodeId, DialogRecord>,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire every dialog in `doc` that has not been wired yet.
    ///
    /// Safe to call any number of times; dialogs seen before are skipped.
    pub fn initialize<D: Document + ?Sized>(&mut self, doc: &D, listeners: &mut ListenerRegistry) {
        let fresh: Vec<NodeId> = doc
            .query_all(&dialog_selector())
            .into_iter()
            .filter(|node| !self.is_initialized(*node))
            .collect();

        debug!("Initializing {} new dialog(s)", fresh.len());

        for dialog in fresh {
            // Record first so nothing below can wire the same dialog twice
            let id = doc.attribute(dialog, "id").map(DialogId::new);
            let record = self
                .records
                .entry(dialog)
                .or_insert_with(|| DialogRecord::new(dialog, id));
            record.initialized = true;

            for control in doc.query_within(dialog, &close_control_selector()) {
                listeners.add(
                    EventTarget::Node(control),
                    EventKind::Click,
                    Handler::Modal(ModalHandler::CloseControl { dialog }),
                );
            }

            listeners.add(
                EventTarget::Node(dialog),
                EventKind::Click,
                Handler::Modal(ModalHandler::Backdrop { dialog }),
            );

            listeners.add(
                EventTarget::Document,
                EventKind::KeyDown,
                Handler::Modal(ModalHandler::Escape { dialog }),
            );
        }
    }

    /// Run a fired dismissal listener. Returns whether its dialog was hidden.
    pub fn handle<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        handler: &ModalHandler,
        event: &DomEvent,
    ) -> bool {
        let Some(record) = self.records.get_mut(&handler.dialog()) else {
            return false;
        };

        let hidden = handler.fire(doc, record, event);
        if hidden {
            debug!(
                "Dialog {} dismissed via {:?}",
                record.id.as_ref().map(DialogId::as_str).unwrap_or("<anonymous>"),
                handler
            );
        }
        hidden
    }

    pub fn is_initialized(&self, node: NodeId) -> bool {
        self.records.get(&node).map(|r| r.initialized).unwrap_or(false)
    }

    pub fn record(&self, node: NodeId) -> Option<&DialogRecord> {
        self.records.get(&node)
    }

    pub fn initialized_count(&self) -> usize {
        self.records.values().filter(|r| r.initialized).count()
    }

    pub fn status<D: Document + ?Sized>(&self, doc: &D, node: NodeId) -> DialogStatus {
        DialogStatus {
            visibility: if doc.is_visible(node) {
                Visibility::Visible
            } else {
                Visibility::Hidden
            },
            initialization: if self.is_initialized(node) {
                Initialization::Initialized
            } else {
                Initialization::Uninitialized
            },
        }
    }

    /// Every dialog currently in the document, in document order
    pub fn snapshot<D: Document + ?Sized>(&self, doc: &D) -> Vec<DialogSnapshot> {
        doc.query_all(&dialog_selector())
            .into_iter()
            .map(|node| {
                let record = self.records.get(&node);
                DialogSnapshot {
                    id: doc.attribute(node, "id"),
                    initialized: record.map(|r| r.initialized).unwrap_or(false),
                    visible: doc.is_visible(node),
                    display: doc.display(node),
                    dismissals: record.map(|r| r.dismissals).unwrap_or(0),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, Selector};

    const PAGE: &str = r#"<html><body>
        <div id="login-modal" class="modal" style="display: none">
          <div class="modal-content">
            <button id="dismiss" data-dismiss="modal">Cancel</button>
            <p id="body-text">Sign in</p>
          </div>
        </div>
        <div id="promo" class="modal"><div class="modal-content">Sale</div></div>
        <div id="plain">not a dialog</div>
    </body></html>"#;

    fn node(doc: &MemoryDocument, id: &str) -> NodeId {
        doc.element_by_id(id).unwrap()
    }

    #[test]
    fn test_open_and_close_by_id() {
        let mut doc = MemoryDocument::parse(PAGE);
        let modal = node(&doc, "login-modal");

        open(&mut doc, "login-modal");
        assert!(doc.is_visible(modal));

        close(&mut doc, "login-modal");
        assert_eq!(doc.display(modal), "none");
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut doc = MemoryDocument::parse(PAGE);
        let before = doc.to_html();

        open(&mut doc, "nonexistent-id");
        close(&mut doc, "nonexistent-id");

        assert_eq!(doc.to_html(), before);
    }

    #[test]
    fn test_initialize_binds_each_dialog_once() {
        let doc = MemoryDocument::parse(PAGE);
        let mut controller = ModalController::new();
        let mut listeners = ListenerRegistry::new();

        controller.initialize(&doc, &mut listeners);
        let after_first = listeners.len();
        controller.initialize(&doc, &mut listeners);

        // login-modal: dismiss + backdrop + escape; promo: backdrop + escape
        assert_eq!(after_first, 5);
        assert_eq!(listeners.len(), after_first);
        assert_eq!(controller.initialized_count(), 2);
        assert!(!controller.is_initialized(node(&doc, "plain")));
    }

    #[test]
    fn test_initialize_picks_up_new_dialogs() {
        let mut doc = MemoryDocument::parse(PAGE);
        let mut controller = ModalController::new();
        let mut listeners = ListenerRegistry::new();
        controller.initialize(&doc, &mut listeners);

        let body = doc.body().unwrap();
        let late = doc.create_element("div");
        doc.set_attribute(late, "class", "modal");
        doc.set_attribute(late, "id", "late");
        doc.append_child(body, late);
        controller.initialize(&doc, &mut listeners);

        assert!(controller.is_initialized(late));
        assert_eq!(listeners.count_for(EventTarget::Node(late)), 1);
        assert_eq!(listeners.len(), 7);
    }

    #[test]
    fn test_state_machine_axes_are_independent() {
        let mut doc = MemoryDocument::parse(PAGE);
        let mut controller = ModalController::new();
        let mut listeners = ListenerRegistry::new();
        let modal = node(&doc, "login-modal");

        assert_eq!(
            controller.status(&doc, modal),
            DialogStatus {
                visibility: Visibility::Hidden,
                initialization: Initialization::Uninitialized
            }
        );

        open(&mut doc, "login-modal");
        assert_eq!(controller.status(&doc, modal).initialization, Initialization::Uninitialized);

        controller.initialize(&doc, &mut listeners);
        assert_eq!(
            controller.status(&doc, modal),
            DialogStatus {
                visibility: Visibility::Visible,
                initialization: Initialization::Initialized
            }
        );
    }

    #[test]
    fn test_backdrop_only_dismisses_on_container_target() {
        let mut doc = MemoryDocument::parse(PAGE);
        let mut controller = ModalController::new();
        let mut listeners = ListenerRegistry::new();
        controller.initialize(&doc, &mut listeners);
        let modal = node(&doc, "login-modal");
        let text = node(&doc, "body-text");
        let backdrop = ModalHandler::Backdrop { dialog: modal };
        open(&mut doc, "login-modal");

        assert!(!controller.handle(&mut doc, &backdrop, &DomEvent::click(text)));
        assert!(doc.is_visible(modal));

        assert!(controller.handle(&mut doc, &backdrop, &DomEvent::click(modal)));
        assert!(!doc.is_visible(modal));
        assert_eq!(controller.record(modal).unwrap().dismissals, 1);
    }

    #[test]
    fn test_escape_checks_visibility_when_fired() {
        let mut doc = MemoryDocument::parse(PAGE);
        let mut controller = ModalController::new();
        let mut listeners = ListenerRegistry::new();
        controller.initialize(&doc, &mut listeners);
        let modal = node(&doc, "login-modal");
        let escape = ModalHandler::Escape { dialog: modal };

        assert!(!controller.handle(&mut doc, &escape, &DomEvent::key_down("Escape")));
        assert_eq!(doc.display(modal), "none");

        open(&mut doc, "login-modal");
        assert!(!controller.handle(&mut doc, &escape, &DomEvent::key_down("Enter")));
        assert!(controller.handle(&mut doc, &escape, &DomEvent::key_down("Escape")));
        assert_eq!(doc.display(modal), "none");
    }

    #[test]
    fn test_handlers_for_unknown_dialogs_do_nothing() {
        let mut doc = MemoryDocument::parse(PAGE);
        let mut controller = ModalController::new();
        let modal = node(&doc, "login-modal");
        open(&mut doc, "login-modal");

        let handler = ModalHandler::CloseControl { dialog: modal };
        assert!(!controller.handle(&mut doc, &handler, &DomEvent::click(modal)));
        assert!(doc.is_visible(modal));
    }

    #[test]
    fn test_snapshot_lists_dialogs_in_order() {
        let mut doc = MemoryDocument::parse(PAGE);
        let mut controller = ModalController::new();
        let mut listeners = ListenerRegistry::new();
        controller.initialize(&doc, &mut listeners);
        open(&mut doc, "promo");

        let snapshot = controller.snapshot(&doc);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id.as_deref(), Some("login-modal"));
        assert!(!snapshot[0].visible);
        assert_eq!(snapshot[1].display, "block");
        assert!(snapshot.iter().all(|s| s.initialized));
        assert_eq!(doc.query_all(&Selector::class("modal")).len(), 2);
    }
}
