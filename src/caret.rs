//! Caret-to-DOM mapping for contenteditable subtrees
//!
//! Rich text spreads its characters over many text nodes. A linear offset
//! into the flattened text (see [`Document::text_nodes`]) is mapped back to the
//! text node holding it and the offset inside that node.

use tracing::trace;

use crate::dom::{BoundaryPoint, Document, NodeId};

/// A text node and a character offset inside it.
///
/// Only valid until the document is next mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomPosition {
    pub node: NodeId,
    pub offset: usize,
}

impl From<DomPosition> for BoundaryPoint {
    fn from(position: DomPosition) -> Self {
        BoundaryPoint::new(position.node, position.offset)
    }
}

/// Map `linear_offset` in `root`'s flattened text to a text-node position.
///
/// An offset on the boundary between two nodes resolves to the end of the
/// earlier node. Returns `None` when the offset is past the end of the text or
/// the subtree has no text nodes.
pub fn locate(doc: &Document, root: NodeId, linear_offset: usize) -> Option<DomPosition> {
    let mut remaining = linear_offset;
    for node in doc.text_nodes(root) {
        let len = doc.node_length(node);
        if remaining <= len {
            return Some(DomPosition {
                node,
                offset: remaining,
            });
        }
        remaining -= len;
    }
    trace!(linear_offset, "Offset beyond flattened text");
    None
}
