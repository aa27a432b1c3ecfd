//! Lazy depth-first traversal
//!
//! [`TextNodes`] is the canonical flattening of an editable subtree: every
//! linear offset in the crate is measured against the sequence it yields.

use super::node::{Document, NodeId};

/// Pre-order walk over the descendants of a root (the root itself excluded)
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Descendants<'a> {
    fn new(doc: &'a Document, root: NodeId) -> Self {
        let stack = doc.children(root).iter().rev().copied().collect();
        Descendants { doc, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(node).iter().rev().copied());
        Some(node)
    }
}

/// Text nodes under a root in document order
#[derive(Debug, Clone)]
pub struct TextNodes<'a> {
    inner: Descendants<'a>,
}

impl Iterator for TextNodes<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let doc = self.inner.doc;
        self.inner.by_ref().find(|node| doc.is_text(*node))
    }
}

impl Document {
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants::new(self, root)
    }

    /// Text nodes under `root`, depth-first in document order
    pub fn text_nodes(&self, root: NodeId) -> TextNodes<'_> {
        TextNodes {
            inner: Descendants::new(self, root),
        }
    }
}
