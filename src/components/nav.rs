//! Responsive navigation collapse

use crate::config::Viewport;
use crate::dom::{Document, NodeId, Selector};
use crate::page::{EventKind, EventTarget, Handler, ListenerRegistry};
use tracing::debug;

pub const TOGGLE_CLASS: &str = "mobile-menu-button";
pub const LINKS_CLASS: &str = "nav-links";
pub const AUTH_CLASS: &str = "nav-auth";

const TOGGLE_ICON: &str = r#"<i class="fas fa-bars"></i>"#;
const TOGGLE_STYLES: &[(&str, &str)] = &[
    ("display", "none"),
    ("background", "none"),
    ("border", "none"),
    ("font-size", "1.5rem"),
    ("cursor", "pointer"),
    ("color", "#4a5568"),
];

const SHOWN: &str = "flex";
const HIDDEN: &str = "none";

/// Nodes managed by the navigation glue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavState {
    pub toggle: NodeId,
    pub links: Option<NodeId>,
    pub auth: Option<NodeId>,
}

impl NavState {
    fn sections(&self) -> impl Iterator<Item = NodeId> {
        self.links.into_iter().chain(self.auth)
    }
}

/// Insert the menu toggle and apply the initial layout. Pages without a
/// `<nav>` get nothing.
pub fn init<D: Document + ?Sized>(
    doc: &mut D,
    listeners: &mut ListenerRegistry,
    viewport: Viewport,
    breakpoint_px: u32,
) -> Option<NavState> {
    let nav = doc.query_first(&Selector::tag("nav"))?;

    let toggle = doc.create_element("button");
    doc.set_inner_html(toggle, TOGGLE_ICON);
    doc.set_attribute(toggle, "class", TOGGLE_CLASS);
    for (property, value) in TOGGLE_STYLES {
        doc.set_style(toggle, property, value);
    }
    doc.append_child(nav, toggle);

    let state = NavState {
        toggle,
        links: doc.query_first(&Selector::class(LINKS_CLASS)),
        auth: doc.query_first(&Selector::class(AUTH_CLASS)),
    };

    listeners.add(EventTarget::Node(toggle), EventKind::Click, Handler::NavToggle);
    listeners.add(EventTarget::Window, EventKind::Resize, Handler::NavResize);

    apply_viewport(doc, &state, viewport, breakpoint_px);
    Some(state)
}

/// Flip the navigation sections between shown and hidden
pub fn toggle<D: Document + ?Sized>(doc: &mut D, state: &NavState) {
    let Some(reference) = state.sections().next() else {
        return;
    };
    let next = if doc.display(reference) == SHOWN { HIDDEN } else { SHOWN };
    for section in state.sections() {
        doc.set_display(section, next);
    }
}

/// Collapse navigation behind the toggle on narrow viewports
pub fn apply_viewport<D: Document + ?Sized>(
    doc: &mut D,
    state: &NavState,
    viewport: Viewport,
    breakpoint_px: u32,
) {
    let narrow = viewport.width <= breakpoint_px;
    debug!("Viewport {}px, navigation collapsed: {}", viewport.width, narrow);

    doc.set_display(state.toggle, if narrow { "block" } else { HIDDEN });
    for section in state.sections() {
        doc.set_display(section, if narrow { HIDDEN } else { SHOWN });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    const PAGE: &str = r#"<body><nav>
        <a class="logo" href="/">Shop</a>
        <ul class="nav-links"><li>Home</li></ul>
        <div class="nav-auth"><a href="/login">Login</a></div>
    </nav></body>"#;

    fn viewport(width: u32) -> Viewport {
        Viewport { width, height: 800 }
    }

    fn sections(doc: &MemoryDocument) -> (String, String) {
        let links = doc.query_first(&Selector::class(LINKS_CLASS)).unwrap();
        let auth = doc.query_first(&Selector::class(AUTH_CLASS)).unwrap();
        (doc.display(links), doc.display(auth))
    }

    #[test]
    fn test_wide_viewport_shows_sections() {
        let mut doc = MemoryDocument::parse(PAGE);
        let mut listeners = ListenerRegistry::new();

        let state = init(&mut doc, &mut listeners, viewport(1280), 768).unwrap();

        assert_eq!(doc.display(state.toggle), "none");
        assert_eq!(sections(&doc), ("flex".to_string(), "flex".to_string()));
        assert_eq!(doc.inner_html(state.toggle), TOGGLE_ICON);
        assert_eq!(listeners.len(), 2);
    }

    #[test]
    fn test_breakpoint_is_inclusive() {
        let mut doc = MemoryDocument::parse(PAGE);
        let mut listeners = ListenerRegistry::new();

        let state = init(&mut doc, &mut listeners, viewport(768), 768).unwrap();

        assert_eq!(doc.display(state.toggle), "block");
        assert_eq!(sections(&doc), ("none".to_string(), "none".to_string()));
    }

    #[test]
    fn test_toggle_flips_sections() {
        let mut doc = MemoryDocument::parse(PAGE);
        let mut listeners = ListenerRegistry::new();
        let state = init(&mut doc, &mut listeners, viewport(500), 768).unwrap();

        toggle(&mut doc, &state);
        assert_eq!(sections(&doc), ("flex".to_string(), "flex".to_string()));

        toggle(&mut doc, &state);
        assert_eq!(sections(&doc), ("none".to_string(), "none".to_string()));
    }

    #[test]
    fn test_page_without_nav_is_untouched() {
        let mut doc = MemoryDocument::parse("<body><p>plain</p></body>");
        let mut listeners = ListenerRegistry::new();

        assert!(init(&mut doc, &mut listeners, viewport(500), 768).is_none());
        assert!(listeners.is_empty());
    }
}
