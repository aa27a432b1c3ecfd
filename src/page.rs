//! Page context: the document plus everything the expansion engine reads from
//! the surrounding tab (location, title, focus, selection) and the side effects
//! it produces (synthetic events, clicks).

use tracing::debug;
use url::Url;

use crate::dom::{Document, NodeId, Selection};

/// `input` types that behave like a single-line text field
const TEXT_INPUT_TYPES: &[&str] = &["text", "search", "url", "email", "tel"];

/// Page URL and the hostname used for site matching
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLocation {
    pub href: String,
    pub hostname: String,
}

impl PageLocation {
    /// Build a location from a URL, extracting the hostname
    ///
    /// ```
    /// use prompt_hash::page::PageLocation;
    ///
    /// let location = PageLocation::parse("https://user@claude.ai:443/new?x=1");
    /// assert_eq!(location.hostname, "claude.ai");
    /// ```
    pub fn parse(href: &str) -> Self {
        let hostname = Url::parse(href)
            .ok()
            .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
            .unwrap_or_default();

        PageLocation {
            href: href.to_string(),
            hostname,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Content of an editable changed
    Input,
}

/// A synthetic event dispatched at a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: NodeId,
    pub bubbles: bool,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub document: Document,
    pub location: PageLocation,
    pub title: String,
    focused: Option<NodeId>,
    /// `None` models a context with no selection object at all
    selection: Option<Selection>,
    events: Vec<DomEvent>,
    clicks: Vec<NodeId>,
}

impl Page {
    pub fn new(document: Document, href: &str, title: &str) -> Self {
        Page {
            document,
            location: PageLocation::parse(href),
            title: title.to_string(),
            focused: None,
            selection: Some(Selection::new()),
            events: Vec::new(),
            clicks: Vec::new(),
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn focus(&mut self, node: NodeId) {
        debug!(node = node.index(), "Focusing element");
        self.focused = Some(node);
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selection_mut(&mut self) -> Option<&mut Selection> {
        self.selection.as_mut()
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    /// Text the user has selected, wherever it lives.
    ///
    /// Plain fields keep their own selection; everything else reads the page
    /// selection.
    pub fn selected_text(&self, target: Option<NodeId>) -> String {
        if let Some(control) = target.and_then(|node| self.document.control(node)) {
            return control.selected_text();
        }
        self.selection
            .as_ref()
            .map(|selection| selection.text(&self.document))
            .unwrap_or_default()
    }

    /// Whether `node` accepts typed text
    pub fn is_editable_element(&self, node: NodeId) -> bool {
        let doc = &self.document;
        if doc.is_text(node) {
            return false;
        }
        if doc.is_content_editable(node) {
            return true;
        }
        match doc.tag_name(node) {
            Some("textarea") => true,
            Some("input") => {
                let input_type = doc
                    .attribute(node, "type")
                    .unwrap_or("text")
                    .to_ascii_lowercase();
                TEXT_INPUT_TYPES.contains(&input_type.as_str())
            }
            _ => false,
        }
    }

    /// Notify listeners that `target`'s content changed
    pub fn dispatch_input_event(&mut self, target: NodeId) {
        debug!(target = target.index(), "Dispatching input event");
        self.events.push(DomEvent {
            kind: EventKind::Input,
            target,
            bubbles: true,
        });
    }

    pub fn events(&self) -> &[DomEvent] {
        &self.events
    }

    /// Drain dispatched events (hosts forward them to the live page)
    pub fn take_events(&mut self) -> Vec<DomEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn click(&mut self, node: NodeId) {
        debug!(node = node.index(), "Clicking element");
        self.clicks.push(node);
    }

    pub fn clicks(&self) -> &[NodeId] {
        &self.clicks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{BoundaryPoint, Range};

    #[test]
    fn parse_location_hostname() {
        let cases = [
            ("https://chatgpt.com/c/123", "chatgpt.com"),
            ("https://Gemini.Google.com/app?hl=en", "gemini.google.com"),
            ("http://localhost:8080", "localhost"),
            ("https://www.perplexity.ai#top", "www.perplexity.ai"),
            ("about:blank", ""),
            ("http://[::1]:8080/chat", "[::1]"),
            ("https://chatgpt.com\\@evil.test/", "chatgpt.com"),
            ("file:///home/u/chatgpt.com/x.html", ""),
            ("not a url", ""),
        ];
        for (href, hostname) in cases {
            assert_eq!(PageLocation::parse(href).hostname, hostname, "{href}");
        }
    }

    #[test]
    fn editable_elements() {
        let mut doc = Document::new();
        let body = doc.body();
        let textarea = doc.append_element(body, "textarea");
        let plain_input = doc.append_element(body, "input");
        let search = doc.append_element(body, "input");
        doc.set_attribute(search, "type", "Search");
        let checkbox = doc.append_element(body, "input");
        doc.set_attribute(checkbox, "type", "checkbox");
        let editor = doc.append_element(body, "div");
        doc.set_attribute(editor, "contenteditable", "true");
        let div = doc.append_element(body, "div");

        let page = Page::new(doc, "https://example.com", "Example");
        assert!(page.is_editable_element(textarea));
        assert!(page.is_editable_element(plain_input));
        assert!(page.is_editable_element(search));
        assert!(!page.is_editable_element(checkbox));
        assert!(page.is_editable_element(editor));
        assert!(!page.is_editable_element(div));
    }

    #[test]
    fn selected_text_prefers_field_selection() {
        let mut doc = Document::new();
        let body = doc.body();
        let textarea = doc.append_element(body, "textarea");
        doc.control_mut(textarea).unwrap().set_value("pick this word");
        doc.control_mut(textarea).unwrap().set_selection_range(5, 9);
        let text = doc.append_text(body, "page text");

        let mut page = Page::new(doc, "https://example.com", "Example");
        page.selection_mut().unwrap().add_range(Range::new(
            BoundaryPoint::new(text, 0),
            BoundaryPoint::new(text, 4),
        ));

        assert_eq!(page.selected_text(Some(textarea)), "this");
        assert_eq!(page.selected_text(None), "page");
    }

    #[test]
    fn events_are_recorded_and_drained() {
        let mut doc = Document::new();
        let target = doc.append_element(doc.body(), "textarea");
        let mut page = Page::new(doc, "https://example.com", "Example");

        page.dispatch_input_event(target);
        assert_eq!(page.events().len(), 1);
        assert!(page.events()[0].bubbles);

        let drained = page.take_events();
        assert_eq!(drained[0].kind, EventKind::Input);
        assert!(page.events().is_empty());
    }
}
