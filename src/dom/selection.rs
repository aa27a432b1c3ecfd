//! Page selection (at most one range)

use super::node::{Document, NodeId};
use super::range::{BoundaryPoint, Range};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    range: Option<Range>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection holding a collapsed caret at `point`
    pub fn caret(point: BoundaryPoint) -> Self {
        Selection {
            range: Some(Range::collapsed_at(point)),
        }
    }

    pub fn range_count(&self) -> usize {
        usize::from(self.range.is_some())
    }

    pub fn range(&self) -> Option<&Range> {
        self.range.as_ref()
    }

    /// Where the selection starts. Selections are always forward here.
    pub fn anchor(&self) -> Option<BoundaryPoint> {
        self.range.map(|range| range.start)
    }

    pub fn anchor_node(&self) -> Option<NodeId> {
        self.anchor().map(|point| point.node)
    }

    pub fn remove_all_ranges(&mut self) {
        self.range = None;
    }

    /// Replace the current range (only one range is supported)
    pub fn add_range(&mut self, range: Range) {
        self.range = Some(range);
    }

    /// Selected text, empty without a range
    pub fn text(&self, doc: &Document) -> String {
        self.range
            .map(|range| range.text(doc))
            .unwrap_or_default()
    }
}
