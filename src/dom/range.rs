//! Boundary points and ranges
//!
//! A boundary point is `(container, offset)`: the offset counts characters in a
//! text container and children in an element container. Range mutation follows
//! the DOM Standard algorithms for `deleteContents` and `insertNode`.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::node::{Document, NodeId};
use super::DomError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryPoint {
    pub node: NodeId,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(node: NodeId, offset: usize) -> Self {
        BoundaryPoint { node, offset }
    }
}

/// Tree-order key for a boundary point: child indices from the tree root down
/// to the container, followed by the offset. Keys compare lexicographically.
fn point_key(doc: &Document, point: BoundaryPoint) -> Vec<usize> {
    let mut key = vec![point.offset];
    let mut current = point.node;
    while let Some(index) = doc.child_index(current) {
        key.push(index);
        current = match doc.parent(current) {
            Some(parent) => parent,
            None => break,
        };
    }
    key.reverse();
    key
}

/// Order two boundary points of the same tree
pub fn compare_points(doc: &Document, a: BoundaryPoint, b: BoundaryPoint) -> Ordering {
    if a.node == b.node {
        return a.offset.cmp(&b.offset);
    }
    point_key(doc, a).cmp(&point_key(doc, b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
}

impl Range {
    pub fn new(start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Range { start, end }
    }

    pub fn collapsed_at(point: BoundaryPoint) -> Self {
        Range {
            start: point,
            end: point,
        }
    }

    /// Range spanning all children of `node`
    pub fn select_node_contents(doc: &Document, node: NodeId) -> Self {
        Range {
            start: BoundaryPoint::new(node, 0),
            end: BoundaryPoint::new(node, doc.node_length(node)),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn collapse(&mut self, to_start: bool) {
        if to_start {
            self.end = self.start;
        } else {
            self.start = self.end;
        }
    }

    /// Move the start; an end before the new start is pulled along.
    pub fn set_start(&mut self, doc: &Document, point: BoundaryPoint) {
        self.start = point;
        if compare_points(doc, self.start, self.end) == Ordering::Greater {
            self.end = point;
        }
    }

    /// Move the end; a start after the new end is pulled along.
    pub fn set_end(&mut self, doc: &Document, point: BoundaryPoint) {
        self.end = point;
        if compare_points(doc, self.start, self.end) == Ordering::Greater {
            self.start = point;
        }
    }

    /// Text of every text node portion inside the range (DOM `Range.toString`)
    pub fn text(&self, doc: &Document) -> String {
        let root = doc.tree_root(self.start.node);
        let start_key = point_key(doc, self.start);
        let end_key = point_key(doc, self.end);

        let mut out = String::new();
        let candidates = std::iter::once(root).chain(doc.descendants(root));
        for node in candidates {
            let Some(data) = doc.text(node) else {
                continue;
            };
            let len = doc.node_length(node);

            let from = if node == self.start.node {
                self.start.offset
            } else if start_key <= point_key(doc, BoundaryPoint::new(node, 0)) {
                0
            } else {
                continue;
            };
            let to = if node == self.end.node {
                self.end.offset
            } else if point_key(doc, BoundaryPoint::new(node, len)) <= end_key {
                len
            } else {
                continue;
            };

            if from < to {
                out.extend(data.chars().skip(from).take(to - from));
            }
        }
        out
    }

    /// Remove the range's content and collapse it where the content was.
    pub fn delete_contents(&mut self, doc: &mut Document) {
        if self.is_collapsed() {
            return;
        }
        let BoundaryPoint {
            node: start_node,
            offset: start_offset,
        } = self.start;
        let BoundaryPoint {
            node: end_node,
            offset: end_offset,
        } = self.end;

        if start_node == end_node && doc.is_text(start_node) {
            doc.replace_text(start_node, start_offset, end_offset, "");
            self.collapse(true);
            return;
        }

        let contained = self.contained_nodes(doc);

        let collapse_point = if doc.contains(start_node, end_node) {
            self.start
        } else {
            let mut reference = start_node;
            loop {
                match doc.parent(reference) {
                    Some(parent) if doc.contains(parent, end_node) => {
                        let index = doc.child_index(reference).unwrap_or(0);
                        break BoundaryPoint::new(parent, index + 1);
                    }
                    Some(parent) => reference = parent,
                    None => break self.start,
                }
            }
        };

        if doc.is_text(start_node) {
            let len = doc.node_length(start_node);
            doc.replace_text(start_node, start_offset, len, "");
        }
        for node in contained {
            doc.remove(node);
        }
        if doc.is_text(end_node) {
            doc.replace_text(end_node, 0, end_offset, "");
        }

        self.start = collapse_point;
        self.end = collapse_point;
    }

    /// Nodes fully inside the range whose parent is not itself fully inside
    fn contained_nodes(&self, doc: &Document) -> Vec<NodeId> {
        let root = doc.tree_root(self.start.node);
        let start_key = point_key(doc, self.start);
        let end_key = point_key(doc, self.end);

        let mut inside: HashSet<NodeId> = HashSet::new();
        let mut topmost = Vec::new();
        for node in doc.descendants(root) {
            let first = point_key(doc, BoundaryPoint::new(node, 0));
            let last = point_key(doc, BoundaryPoint::new(node, doc.node_length(node)));
            if first > start_key && last < end_key {
                let parent_inside = doc
                    .parent(node)
                    .is_some_and(|parent| inside.contains(&parent));
                if !parent_inside {
                    topmost.push(node);
                }
                inside.insert(node);
            }
        }
        topmost
    }

    /// Insert `node` at the start of the range, splitting a text container.
    ///
    /// A collapsed range grows to end after the inserted node.
    pub fn insert_node(&mut self, doc: &mut Document, node: NodeId) -> Result<(), DomError> {
        let start = self.start;
        let splits_text = doc.is_text(start.node);
        let parent = if splits_text {
            doc.parent(start.node).ok_or(DomError::DetachedTextNode)?
        } else {
            start.node
        };
        if doc.contains(node, parent) {
            return Err(DomError::HierarchyRequest);
        }

        let reference = if splits_text {
            Some(doc.split_text(start.node, start.offset))
        } else {
            doc.children(parent).get(start.offset).copied()
        };
        doc.insert_before(parent, node, reference);

        if self.is_collapsed() {
            let index = doc.child_index(node).unwrap_or(0);
            self.end = BoundaryPoint::new(parent, index + 1);
        }
        Ok(())
    }
}
