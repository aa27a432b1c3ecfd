//! In-memory document model for editable page content
//!
//! This module provides the subset of the browser DOM the expansion engine
//! needs:
//! - `node` - arena tree of elements and text nodes ([`Document`], [`NodeId`])
//! - `control` - value/selection state of `textarea` and `input` fields
//! - `walker` - lazy depth-first iterators, including the text-node flattening
//! - `range` - boundary points and ranges with `deleteContents`/`insertNode`
//! - `selection` - the page selection
//! - `selector` - tiny CSS selector matcher used by site adapters
//!
//! Host integrations mirror the live page into a [`Document`], run an
//! expansion, and read the mutated nodes back.

mod control;
mod node;
mod range;
mod selection;
mod selector;
mod walker;

use thiserror::Error;

pub use control::TextControl;
pub use node::{Document, Element, NodeId, NodeKind};
pub use range::{compare_points, BoundaryPoint, Range};
pub use selection::Selection;
pub use selector::{Selector, SelectorParseError};
pub use walker::{Descendants, TextNodes};

/// Structural errors from range mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("cannot insert next to a text node that has no parent")]
    DetachedTextNode,
    #[error("node cannot be inserted inside itself")]
    HierarchyRequest,
}
