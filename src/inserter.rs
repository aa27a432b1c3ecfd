//! Writes resolved templates into editable targets
//!
//! Two kinds of target are supported:
//! - plain fields (`textarea`, text-like `input`) edited through their value
//!   and selection offsets
//! - contenteditable subtrees edited through ranges over their text nodes
//!
//! The template is always resolved before any range is captured, so nothing
//! observed by the resolver can invalidate a position computed here.

use tracing::{debug, instrument};

use crate::caret;
use crate::dom::{BoundaryPoint, Document, NodeId, Range};
use crate::error::InsertError;
use crate::page::Page;
use crate::template::{self, ClipboardReader, ResolvedTemplate, TemplateContext};
use crate::token::{self, TokenMatch};

/// An editable target, classified by how it is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableHandle {
    /// Field with a value and selection offsets
    Plain(NodeId),
    /// Root of a contenteditable subtree
    Rich(NodeId),
}

impl EditableHandle {
    /// Contenteditable wins over a text control; anything else can't take a caret.
    pub fn classify(doc: &Document, node: NodeId) -> Result<Self, InsertError> {
        if doc.is_content_editable(node) {
            Ok(EditableHandle::Rich(node))
        } else if doc.control(node).is_some() {
            Ok(EditableHandle::Plain(node))
        } else {
            Err(InsertError::UnsupportedTarget)
        }
    }

    pub fn node(self) -> NodeId {
        match self {
            EditableHandle::Plain(node) | EditableHandle::Rich(node) => node,
        }
    }
}

/// Text from the start of `root` up to the start of the current selection.
///
/// `None` without a selection range.
pub fn text_before_caret(page: &Page, root: NodeId) -> Option<String> {
    let caret = page.selection()?.range()?.start;
    let mut range = Range::collapsed_at(caret);
    range.set_start(&page.document, BoundaryPoint::new(root, 0));
    Some(range.text(&page.document))
}

/// Token immediately before the caret of `handle`, without modifying anything
pub fn token_at_caret(
    page: &Page,
    handle: EditableHandle,
    allow_trailing_whitespace: bool,
) -> Option<TokenMatch> {
    match handle {
        EditableHandle::Plain(node) => {
            let control = page.document.control(node)?;
            token::find_token_before_cursor(
                control.value(),
                control.selection_start(),
                allow_trailing_whitespace,
            )
        }
        EditableHandle::Rich(root) => {
            let pre_text = text_before_caret(page, root)?;
            let cursor = pre_text.chars().count();
            token::find_token_before_cursor(&pre_text, cursor, allow_trailing_whitespace)
        }
    }
}

/// Replace `[start, end)` (character offsets) of `value` with `replacement`
fn splice(value: &str, start: usize, end: usize, replacement: &str) -> String {
    let start_byte = token::byte_offset(value, start);
    let end_byte = token::byte_offset(value, end.max(start));
    let mut next = String::with_capacity(value.len() + replacement.len());
    next.push_str(&value[..start_byte]);
    next.push_str(replacement);
    next.push_str(&value[end_byte..]);
    next
}

pub struct Inserter<'a> {
    page: &'a mut Page,
    clipboard: &'a dyn ClipboardReader,
}

impl<'a> Inserter<'a> {
    pub fn new(page: &'a mut Page, clipboard: &'a dyn ClipboardReader) -> Self {
        Inserter { page, clipboard }
    }

    /// Replace the `#token` before the caret of `target` with `template`.
    ///
    /// With `allow_trailing_whitespace`, whitespace typed after the token
    /// (the auto-expand trigger) is skipped when locating it and left in place.
    #[instrument(skip(self, template), fields(target = target.index()))]
    pub fn insert(
        &mut self,
        target: NodeId,
        template: &str,
        allow_trailing_whitespace: bool,
    ) -> Result<(), InsertError> {
        let resolved = self.resolve(target, template);
        match EditableHandle::classify(&self.page.document, target)? {
            EditableHandle::Rich(root) => {
                self.replace_token_rich(root, &resolved, allow_trailing_whitespace)?
            }
            EditableHandle::Plain(node) => {
                self.replace_token_plain(node, &resolved, allow_trailing_whitespace)?
            }
        }
        self.page.dispatch_input_event(target);
        Ok(())
    }

    /// Insert `template` at the caret of `target`, replacing any selected text.
    /// No token is required.
    #[instrument(skip(self, template), fields(target = target.index()))]
    pub fn insert_at_cursor(&mut self, target: NodeId, template: &str) -> Result<(), InsertError> {
        let resolved = self.resolve(target, template);
        match EditableHandle::classify(&self.page.document, target)? {
            EditableHandle::Rich(root) => {
                let mut range = self.caret_range_within(root)?;
                range.delete_contents(&mut self.page.document);
                self.insert_text_node(range, &resolved)?;
            }
            EditableHandle::Plain(node) => {
                let control = self
                    .page
                    .document
                    .control(node)
                    .ok_or(InsertError::UnsupportedTarget)?;
                let start = control.selection_start();
                let end = control.selection_end();
                self.write_value(node, start, end, &resolved)?;
            }
        }
        self.page.dispatch_input_event(target);
        Ok(())
    }

    fn resolve(&self, target: NodeId, template: &str) -> ResolvedTemplate {
        let context = TemplateContext::capture(self.page, Some(target), template, self.clipboard);
        template::resolve(template, &context)
    }

    fn replace_token_plain(
        &mut self,
        node: NodeId,
        resolved: &ResolvedTemplate,
        allow_trailing_whitespace: bool,
    ) -> Result<(), InsertError> {
        let token = token_at_caret(self.page, EditableHandle::Plain(node), allow_trailing_whitespace)
            .ok_or(InsertError::NoTokenFound)?;
        debug!(token = %token.token, start = token.start, end = token.end, "Replacing token in field");
        self.write_value(node, token.start, token.end, resolved)
    }

    fn write_value(
        &mut self,
        node: NodeId,
        start: usize,
        end: usize,
        resolved: &ResolvedTemplate,
    ) -> Result<(), InsertError> {
        let control = self
            .page
            .document
            .control_mut(node)
            .ok_or(InsertError::UnsupportedTarget)?;
        let next = splice(control.value(), start, end, &resolved.text);
        control.set_value(&next);
        let caret = start + resolved.cursor_offset;
        control.set_selection_range(caret, caret);
        Ok(())
    }

    fn replace_token_rich(
        &mut self,
        root: NodeId,
        resolved: &ResolvedTemplate,
        allow_trailing_whitespace: bool,
    ) -> Result<(), InsertError> {
        self.caret_range_within(root)?;
        let token = token_at_caret(self.page, EditableHandle::Rich(root), allow_trailing_whitespace)
            .ok_or(InsertError::NoTokenFound)?;

        let doc = &self.page.document;
        let start = caret::locate(doc, root, token.start);
        let end = caret::locate(doc, root, token.end);
        let (Some(start), Some(end)) = (start, end) else {
            return Err(InsertError::CaretResolutionFailed);
        };
        debug!(token = %token.token, start = token.start, end = token.end, "Replacing token in editor");

        let mut range = Range::new(start.into(), end.into());
        range.delete_contents(&mut self.page.document);
        self.insert_text_node(range, resolved)
    }

    /// The selection range, after moving the caret to the end of `root` when
    /// there is no range or it lies outside `root`
    fn caret_range_within(&mut self, root: NodeId) -> Result<Range, InsertError> {
        let selection = self.page.selection().ok_or(InsertError::NoSelection)?;
        let inside = selection
            .anchor_node()
            .is_some_and(|anchor| self.page.document.contains(root, anchor));

        if !inside {
            let mut range = Range::select_node_contents(&self.page.document, root);
            range.collapse(false);
            let selection = self.page.selection_mut().ok_or(InsertError::NoSelection)?;
            selection.remove_all_ranges();
            selection.add_range(range);
        }

        self.page
            .selection()
            .and_then(|selection| selection.range())
            .copied()
            .ok_or(InsertError::NoSelection)
    }

    /// Insert the resolved text as one new text node at `range` and put the
    /// caret inside it
    fn insert_text_node(&mut self, mut range: Range, resolved: &ResolvedTemplate) -> Result<(), InsertError> {
        let text_node = self.page.document.create_text_node(&resolved.text);
        range.insert_node(&mut self.page.document, text_node)?;

        let caret = resolved.cursor_offset.min(resolved.len());
        let selection = self.page.selection_mut().ok_or(InsertError::NoSelection)?;
        selection.remove_all_ranges();
        selection.add_range(Range::collapsed_at(BoundaryPoint::new(text_node, caret)));
        Ok(())
    }
}

#[cfg(test)]
#[path = "inserter_tests.rs"]
mod tests;
