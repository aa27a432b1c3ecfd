//! Arena-backed node tree
//!
//! Nodes live in a `Vec` owned by [`Document`] and are addressed by [`NodeId`].
//! Removing a node only unlinks it from its parent; the id stays valid so a
//! detached node can be inserted again, which is how range insertion works.

use crate::debug_panic;

use super::control::TextControl;

/// Handle to a node inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index (stable for the lifetime of the document)
    pub fn index(self) -> usize {
        self.0
    }
}

/// Element payload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Lowercase tag name
    pub tag: String,
    /// Attributes in insertion order, names lowercase
    pub attributes: Vec<(String, String)>,
    /// Value and selection state for `textarea` / `input` elements
    pub control: Option<TextControl>,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A page document rooted at a `<body>` element
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only `<body>`
    pub fn new() -> Self {
        let mut doc = Document {
            nodes: Vec::new(),
            body: NodeId(0),
        };
        doc.body = doc.create_element("body");
        doc
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0]
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.0]
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached element. `textarea` and `input` get a text control.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let tag = tag.to_ascii_lowercase();
        let control = matches!(tag.as_str(), "textarea" | "input").then(TextControl::default);
        self.push(NodeKind::Element(Element {
            tag,
            attributes: Vec::new(),
            control,
        }))
    }

    /// Create a detached text node
    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    /// Create an element and append it to `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let element = self.create_element(tag);
        self.append_child(parent, element);
        element
    }

    /// Create a text node and append it to `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.create_text_node(text);
        self.append_child(parent, node);
        node
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` into `parent` before `reference` (at the end when `None`).
    ///
    /// The child is first detached from its current parent.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if self.is_text(parent) {
            debug_panic!("Cannot insert node {:?} into text node {:?}", child, parent);
            return;
        }
        if self.contains(child, parent) {
            debug_panic!("Inserting {:?} into {:?} would create a cycle", child, parent);
            return;
        }
        if reference == Some(child) {
            return;
        }

        self.remove(child);

        let position = reference
            .and_then(|reference| self.child_index_in(parent, reference))
            .unwrap_or(self.data(parent).children.len());
        self.data_mut(parent).children.insert(position, child);
        self.data_mut(child).parent = Some(parent);
    }

    /// Detach `node` from its parent. No-op for detached nodes.
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.data(node).parent else {
            return;
        };
        self.data_mut(parent).children.retain(|child| *child != node);
        self.data_mut(node).parent = None;
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.data(node).children
    }

    /// Position of `node` among its parent's children
    pub fn child_index(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.child_index_in(parent, node)
    }

    fn child_index_in(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.data(parent).children.iter().position(|c| *c == child)
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.data(node).kind
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.data(node).kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.data_mut(node).kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.data(node).kind, NodeKind::Text(_))
    }

    /// Character data of a text node
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.data(node).kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let NodeKind::Text(data) = &mut self.data_mut(node).kind {
            *data = text.to_string();
        }
    }

    /// Replace characters `[start, end)` of a text node with `replacement`.
    ///
    /// Offsets are clamped to the node's length.
    pub fn replace_text(&mut self, node: NodeId, start: usize, end: usize, replacement: &str) {
        if let NodeKind::Text(data) = &mut self.data_mut(node).kind {
            let start_byte = crate::token::byte_offset(data, start);
            let end_byte = crate::token::byte_offset(data, end.max(start));
            data.replace_range(start_byte..end_byte, replacement);
        }
    }

    /// Split a text node at `offset`; the tail becomes a new sibling right after it.
    ///
    /// A detached node keeps its head and the tail is returned detached.
    pub fn split_text(&mut self, node: NodeId, offset: usize) -> NodeId {
        let tail_text = match &mut self.data_mut(node).kind {
            NodeKind::Text(data) => {
                let split_at = crate::token::byte_offset(data, offset);
                data.split_off(split_at)
            }
            NodeKind::Element(_) => {
                debug_panic!("split_text called on element {:?}", node);
                String::new()
            }
        };
        let tail = self.create_text_node(&tail_text);
        if let Some(parent) = self.parent(node) {
            let next = self
                .child_index(node)
                .and_then(|index| self.children(parent).get(index + 1).copied());
            self.insert_before(parent, tail, next);
        }
        tail
    }

    /// DOM "length": characters for text nodes, child count for elements
    pub fn node_length(&self, node: NodeId) -> usize {
        match &self.data(node).kind {
            NodeKind::Text(text) => text.chars().count(),
            NodeKind::Element(_) => self.data(node).children.len(),
        }
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.tag.as_str())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attribute(name)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        let name = name.to_ascii_lowercase();
        match element.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => element.attributes.push((name, value.to_string())),
        }
    }

    pub fn control(&self, node: NodeId) -> Option<&TextControl> {
        self.element(node)?.control.as_ref()
    }

    pub fn control_mut(&mut self, node: NodeId) -> Option<&mut TextControl> {
        self.element_mut(node)?.control.as_mut()
    }

    /// Whether `node` is editable rich text.
    ///
    /// The nearest element carrying a `contenteditable` attribute decides:
    /// `""`, `"true"` and `"plaintext-only"` enable editing, `"false"` disables it,
    /// anything else defers to the parent.
    pub fn is_content_editable(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if let Some(value) = self.attribute(id, "contenteditable") {
                match value.to_ascii_lowercase().as_str() {
                    "" | "true" | "plaintext-only" => return true,
                    "false" => return false,
                    _ => {}
                }
            }
            current = self.parent(id);
        }
        false
    }

    /// Inclusive ancestry check
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Top-most ancestor of `node` (the node itself when detached)
    pub fn tree_root(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Concatenated data of every text node under `node`, in document order
    pub fn text_content(&self, node: NodeId) -> String {
        if let Some(text) = self.text(node) {
            return text.to_string();
        }
        self.text_nodes(node)
            .filter_map(|text_node| self.text(text_node))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_body() {
        let doc = Document::new();
        assert_eq!(doc.tag_name(doc.body()), Some("body"));
        assert!(doc.children(doc.body()).is_empty());
    }

    #[test]
    fn append_and_remove_children() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.append_element(body, "DIV");
        let a = doc.append_text(div, "a");
        let b = doc.append_text(div, "b");

        assert_eq!(doc.tag_name(div), Some("div"));
        assert_eq!(doc.children(div), &[a, b]);
        assert_eq!(doc.child_index(b), Some(1));

        doc.remove(a);
        assert_eq!(doc.children(div), &[b]);
        assert_eq!(doc.parent(a), None);
    }

    #[test]
    fn insert_before_moves_existing_child() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.append_text(body, "a");
        let b = doc.append_text(body, "b");
        let c = doc.append_text(body, "c");

        doc.insert_before(body, c, Some(a));
        assert_eq!(doc.children(body), &[c, a, b]);
    }

    #[test]
    fn replace_text_uses_character_offsets() {
        let mut doc = Document::new();
        let node = doc.append_text(doc.body(), "héllo");
        doc.replace_text(node, 1, 3, "EE");
        assert_eq!(doc.text(node), Some("hEElo"));
    }

    #[test]
    fn split_text_inserts_tail_after_node() {
        let mut doc = Document::new();
        let body = doc.body();
        let head = doc.append_text(body, "hello");
        let after = doc.append_text(body, "!");

        let tail = doc.split_text(head, 2);
        assert_eq!(doc.text(head), Some("he"));
        assert_eq!(doc.text(tail), Some("llo"));
        assert_eq!(doc.children(body), &[head, tail, after]);
    }

    #[test]
    fn split_text_at_end_creates_empty_tail() {
        let mut doc = Document::new();
        let head = doc.append_text(doc.body(), "abc");
        let tail = doc.split_text(head, 3);
        assert_eq!(doc.text(tail), Some(""));
        assert_eq!(doc.node_length(tail), 0);
    }

    #[test]
    fn content_editable_is_inherited() {
        let mut doc = Document::new();
        let body = doc.body();
        let editor = doc.append_element(body, "div");
        doc.set_attribute(editor, "contenteditable", "true");
        let para = doc.append_element(editor, "p");
        let locked = doc.append_element(editor, "span");
        doc.set_attribute(locked, "contentEditable", "false");
        let text = doc.append_text(para, "x");

        assert!(doc.is_content_editable(editor));
        assert!(doc.is_content_editable(para));
        assert!(doc.is_content_editable(text));
        assert!(!doc.is_content_editable(locked));
        assert!(!doc.is_content_editable(body));
    }

    #[test]
    fn controls_exist_only_for_form_fields() {
        let mut doc = Document::new();
        let body = doc.body();
        let textarea = doc.append_element(body, "textarea");
        let input = doc.append_element(body, "input");
        let div = doc.append_element(body, "div");

        assert!(doc.control(textarea).is_some());
        assert!(doc.control(input).is_some());
        assert!(doc.control(div).is_none());
    }

    #[test]
    fn text_content_flattens_in_document_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let p = doc.append_element(body, "p");
        doc.append_text(p, "ask ");
        let b = doc.append_element(p, "b");
        doc.append_text(b, "#a");
        doc.append_text(p, "sk");

        assert_eq!(doc.text_content(body), "ask #ask");
    }

    #[test]
    fn contains_is_inclusive() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.append_element(body, "div");
        let text = doc.append_text(div, "x");

        assert!(doc.contains(div, div));
        assert!(doc.contains(body, text));
        assert!(!doc.contains(text, div));
        assert_eq!(doc.tree_root(text), body);
    }
}
