//! HTML import via `scraper`

use super::{memory::MemoryDocument, Document, NodeId};
use scraper::{node::Node as HtmlNode, ElementRef, Html};
use tracing::debug;

/// Parse a full page into a fresh document
pub fn parse_document(markup: &str) -> MemoryDocument {
    let parsed = Html::parse_document(markup);
    if !parsed.errors.is_empty() {
        debug!("HTML parsed with {} recoverable errors", parsed.errors.len());
    }

    let mut doc = MemoryDocument::new();
    let root = doc.root();
    import_element(&mut doc, root, parsed.root_element());
    doc
}

/// Parse `markup` as a fragment and append its nodes to `parent`
pub fn parse_fragment_into(doc: &mut MemoryDocument, parent: NodeId, markup: &str) {
    let parsed = Html::parse_fragment(markup);
    import_children(doc, parent, parsed.root_element());
}

fn import_element(doc: &mut MemoryDocument, parent: NodeId, element: ElementRef<'_>) {
    let data = element.value();
    let node = doc.create_element(data.name());
    for (name, value) in data.attrs() {
        doc.set_attribute(node, name, value);
    }
    doc.append_child(parent, node);
    import_children(doc, node, element);
}

fn import_children(doc: &mut MemoryDocument, parent: NodeId, element: ElementRef<'_>) {
    for child in element.children() {
        match child.value() {
            HtmlNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    import_element(doc, parent, child_element);
                }
            }
            HtmlNode::Text(text) => doc.append_text(parent, text),
            _ => {}
        }
    }
}
