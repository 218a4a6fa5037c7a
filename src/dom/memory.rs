//! Arena-backed in-memory document

use super::{
    html,
    selector::{ElementView, Selector},
    Document, NodeId, Rect,
};
use crate::error::UiResult;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone)]
enum NodeData {
    Root,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    /// Attributes in insertion order, `style` excluded
    attrs: Vec<(String, String)>,
    /// Inline style declarations in insertion order
    style: Vec<(String, String)>,
    /// Live form value once it diverges from the markup
    value: Option<String>,
    rect: Rect,
}

impl ElementView for ElementData {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Document held entirely in memory.
///
/// Nodes are never freed; removal detaches them from their parent so they
/// stop matching queries while handles stay valid.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Empty document with only a root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Build a document from HTML markup
    pub fn parse(markup: &str) -> Self {
        html::parse_document(markup)
    }

    /// Read and parse an HTML file
    pub async fn load(path: &std::path::Path) -> UiResult<Self> {
        let markup = tokio::fs::read_to_string(path).await?;
        Ok(Self::parse(&markup))
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Serialize the connected tree back to markup
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for &child in &self.nodes[0].children {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Place an element for `bounding_rect`
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(element) = self.element_mut(node) {
            element.rect = rect;
        }
    }

    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        let id = self.push(NodeData::Text(text.to_string()));
        self.append_child(parent, id);
    }

    /// Detach every child of `node`
    pub(crate) fn clear_children(&mut self, node: NodeId) {
        let Some(entry) = self.nodes.get_mut(node.0) else {
            return;
        };
        let children = std::mem::take(&mut entry.children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(node.0).map(|n| &mut n.data) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Pre-order walk of element descendants of `scope`
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(scope.0) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if matches!(node.data, NodeData::Element(_)) {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    fn matching_descendants(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.element(id).map(|e| selector.matches(e)).unwrap_or(false))
            .collect()
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].data {
            NodeData::Root => {}
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
                }
                if !element.style.is_empty() {
                    let style = escape_attr(&format_style(&element.style));
                    out.push_str(&format!(" style=\"{}\"", style));
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    return;
                }
                for &child in &self.nodes[node.0].children {
                    self.write_node(child, out);
                }
                out.push_str(&format!("</{}>", element.tag));
            }
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].data {
            NodeData::Text(text) => out.push_str(text),
            _ => {
                for &child in &self.nodes[node.0].children {
                    self.collect_text(child, out);
                }
            }
        }
    }
}

impl Document for MemoryDocument {
    fn body(&self) -> Option<NodeId> {
        self.query_first(&Selector::tag("body"))
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_first(&Selector::id(id))
    }

    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.matching_descendants(self.root(), selector)
    }

    fn query_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.matching_descendants(scope, selector)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|&c| self.element(c).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.element(node).map(|e| e.tag.clone())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let element = self.element(node)?;
        if name == "style" {
            return (!element.style.is_empty()).then(|| format_style(&element.style));
        }
        element.attr(name).map(str::to_string)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        if name == "style" {
            element.style = parse_style(value);
            return;
        }
        match element.attrs.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => element.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        if name == "style" {
            element.style.clear();
        } else {
            element.attrs.retain(|(key, _)| key != name);
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.element(node)?
            .style
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.clone())
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        if value.is_empty() {
            element.style.retain(|(key, _)| key != property);
            return;
        }
        match element.style.iter_mut().find(|(key, _)| key == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => element.style.push((property.to_string(), value.to_string())),
        }
    }

    fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(entry) = self.nodes.get(node.0) {
            for &child in &entry.children {
                self.write_node(child, &mut out);
            }
        }
        out
    }

    fn set_inner_html(&mut self, node: NodeId, markup: &str) {
        if self.element(node).is_none() {
            return;
        }
        self.clear_children(node);
        html::parse_fragment_into(self, node, markup);
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if node.0 < self.nodes.len() {
            self.collect_text(node, &mut out);
        }
        out
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        if self.element(node).is_none() {
            return;
        }
        self.clear_children(node);
        if !text.is_empty() {
            self.append_text(node, text);
        }
    }

    fn value(&self, node: NodeId) -> String {
        let Some(element) = self.element(node) else {
            return String::new();
        };
        if let Some(value) = &element.value {
            return value.clone();
        }

        match element.tag.as_str() {
            "textarea" => self.text_content(node),
            "select" => {
                let options = self.query_within(node, &Selector::tag("option"));
                let chosen = options
                    .iter()
                    .copied()
                    .find(|&o| self.attribute(o, "selected").is_some())
                    .or_else(|| options.first().copied());
                chosen
                    .map(|o| self.attribute(o, "value").unwrap_or_else(|| self.text_content(o)))
                    .unwrap_or_default()
            }
            _ => element.attr("value").unwrap_or_default().to_string(),
        }
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.value = Some(value.to_string());
        }
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            style: Vec::new(),
            value: None,
            rect: Rect::default(),
        }))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() || child == self.root() {
            return;
        }
        // Refuse cycles
        if self.is_inclusive_descendant(parent, child) {
            return;
        }
        self.remove(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        self.nodes[parent.0].children.retain(|&c| c != node);
        self.nodes[node.0].parent = None;
    }

    fn is_connected(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len() && self.is_inclusive_descendant(node, self.root())
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.element(node).map(|e| e.rect).unwrap_or_default()
    }
}

fn parse_style(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .filter_map(|decl| {
            let (key, value) = decl.split_once(':')?;
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();
            (!key.is_empty() && !value.is_empty()).then(|| (key, value.to_string()))
        })
        .collect()
}

fn format_style(style: &[(String, String)]) -> String {
    style
        .iter()
        .map(|(key, value)| format!("{}: {};", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;").replace('"', "&quot;")
}
