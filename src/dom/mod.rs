//! Document access layer
//!
//! Everything that touches the page goes through the [`Document`] trait so the
//! components can run against any backing store. [`MemoryDocument`] is the
//! arena implementation used by the CLI and the tests.

pub mod html;
pub mod memory;
pub mod selector;

pub use memory::MemoryDocument;
pub use selector::Selector;

use serde::{Deserialize, Serialize};

/// Opaque handle to a node inside a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Layout box of an element, in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }
}

/// Display value that marks a dialog as shown
pub const DISPLAY_VISIBLE: &str = "block";

/// Display value that marks a dialog as hidden
pub const DISPLAY_HIDDEN: &str = "none";

/// Capability set the components need from a page.
///
/// Lookups return `None` or an empty list for anything that does not exist,
/// and mutations on detached or unknown nodes are ignored.
pub trait Document {
    /// The `<body>` element, if the document has one
    fn body(&self) -> Option<NodeId>;

    /// Find a connected element by its `id` attribute
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// All connected elements matching `selector`, in document order
    fn query_all(&self, selector: &Selector) -> Vec<NodeId>;

    /// Descendants of `scope` (excluding `scope`) matching `selector`
    fn query_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Element children of `node`
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn tag_name(&self, node: NodeId) -> Option<String>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, node: NodeId, name: &str);

    /// Inline style property, `None` when unset
    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Set an inline style property; an empty value clears it
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn inner_html(&self, node: NodeId) -> String;

    fn set_inner_html(&mut self, node: NodeId, html: &str);

    fn text_content(&self, node: NodeId) -> String;

    fn set_text_content(&mut self, node: NodeId, text: &str);

    /// Current form value of an input-like element
    fn value(&self, node: NodeId) -> String;

    fn set_value(&mut self, node: NodeId, value: &str);

    /// Create a detached element
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Append `child` to `parent`, detaching it from any previous parent
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Detach `node` (and its subtree) from the document
    fn remove(&mut self, node: NodeId);

    /// Whether `node` is still reachable from the document root
    fn is_connected(&self, node: NodeId) -> bool;

    fn bounding_rect(&self, node: NodeId) -> Rect;

    fn query_first(&self, selector: &Selector) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_first_within(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_within(scope, selector).into_iter().next()
    }

    /// Inline `display` value, empty when unset
    fn display(&self, node: NodeId) -> String {
        self.style(node, "display").unwrap_or_default()
    }

    fn set_display(&mut self, node: NodeId, value: &str) {
        self.set_style(node, "display", value);
    }

    /// A node is visible only while its display is exactly `block`
    fn is_visible(&self, node: NodeId) -> bool {
        self.display(node) == DISPLAY_VISIBLE
    }

    /// Whether `node` is `ancestor` or lies inside it
    fn is_inclusive_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}
