//! Template resolution
//!
//! Templates may contain these placeholders:
//! - `{selection}` - text selected on the page
//! - `{clipboard}` - clipboard text (empty when unreadable)
//! - `{url}` - page URL
//! - `{title}` - page title
//! - `{cursor}` - where the caret lands after insertion (removed from output)
//!
//! Any other `{name}` is left as literal text.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::dom::NodeId;
use crate::error::ResultExt;
use crate::page::Page;

/// Marker for the caret position
pub const CURSOR_PLACEHOLDER: &str = "{cursor}";
/// Marker for clipboard text
pub const CLIPBOARD_PLACEHOLDER: &str = "{clipboard}";

static VALUE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(selection|clipboard|url|title)\}").expect("Invalid regex")
});

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard access denied")]
    Denied,
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Source of clipboard text for `{clipboard}`
pub trait ClipboardReader {
    fn read_text(&self) -> Result<String, ClipboardError>;
}

/// OS clipboard through `arboard`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardReader for SystemClipboard {
    fn read_text(&self) -> Result<String, ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        clipboard.get_text().map_err(|e| match e {
            arboard::Error::ClipboardOccupied => ClipboardError::Denied,
            other => ClipboardError::Unavailable(other.to_string()),
        })
    }
}

/// Clipboard with fixed contents; `None` behaves like a denied read
#[derive(Debug, Default, Clone)]
pub struct FixedClipboard(pub Option<String>);

impl ClipboardReader for FixedClipboard {
    fn read_text(&self) -> Result<String, ClipboardError> {
        self.0.clone().ok_or(ClipboardError::Denied)
    }
}

/// Values substituted into a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    pub selection_text: String,
    pub clipboard_text: String,
    pub page_url: String,
    pub page_title: String,
}

impl TemplateContext {
    /// Capture the page state a template needs.
    ///
    /// The clipboard is only read when the template mentions `{clipboard}`,
    /// and a failed read degrades to an empty string.
    #[instrument(skip_all)]
    pub fn capture(
        page: &Page,
        target: Option<NodeId>,
        template: &str,
        clipboard: &dyn ClipboardReader,
    ) -> Self {
        let clipboard_text = if template.contains(CLIPBOARD_PLACEHOLDER) {
            clipboard.read_text().warn_on_err().unwrap_or_default()
        } else {
            String::new()
        };

        TemplateContext {
            selection_text: page.selected_text(target),
            clipboard_text,
            page_url: page.location.href.clone(),
            page_title: page.title.clone(),
        }
    }
}

/// Template text ready to insert, with the caret position inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub text: String,
    /// Character offset in `text`, always within `0..=text.chars().count()`
    pub cursor_offset: usize,
}

impl ResolvedTemplate {
    /// Length of `text` in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Substitute placeholders and extract the caret position.
///
/// Value placeholders are replaced in a single pass, so text coming from the
/// page or clipboard is never scanned for further placeholders.
///
/// # Examples
///
/// ```
/// use prompt_hash::template::{resolve, TemplateContext};
///
/// let context = TemplateContext {
///     page_title: "Docs".to_string(),
///     ..Default::default()
/// };
/// let resolved = resolve("Summarise {title}: {cursor}", &context);
/// assert_eq!(resolved.text, "Summarise Docs: ");
/// assert_eq!(resolved.cursor_offset, 16);
/// ```
pub fn resolve(template: &str, context: &TemplateContext) -> ResolvedTemplate {
    let substituted = VALUE_PLACEHOLDER.replace_all(template, |caps: &Captures| {
        match &caps[1] {
            "selection" => context.selection_text.clone(),
            "clipboard" => context.clipboard_text.clone(),
            "url" => context.page_url.clone(),
            "title" => context.page_title.clone(),
            other => format!("{{{}}}", other),
        }
    });

    let resolved = apply_cursor_placeholder(&substituted);
    debug!(
        template_len = template.len(),
        resolved_len = resolved.text.len(),
        cursor_offset = resolved.cursor_offset,
        "Template resolved"
    );
    resolved
}

/// Remove every `{cursor}` marker; the first one sets the caret offset.
///
/// Without a marker the caret goes to the end.
pub fn apply_cursor_placeholder(text: &str) -> ResolvedTemplate {
    let cursor_offset = text
        .find(CURSOR_PLACEHOLDER)
        .map(|byte_index| text[..byte_index].chars().count());
    let text = text.replace(CURSOR_PLACEHOLDER, "");
    let cursor_offset = cursor_offset.unwrap_or_else(|| text.chars().count());
    ResolvedTemplate {
        cursor_offset: cursor_offset.min(text.chars().count()),
        text,
    }
}
