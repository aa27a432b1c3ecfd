use super::*;
use crate::dom::{BoundaryPoint, Document, Selection};
use crate::error::ErrorSeverity;
use crate::shortcuts::Shortcut;
use crate::storage::StorageBackends;
use crate::template::FixedClipboard;

const NO_CLIPBOARD: FixedClipboard = FixedClipboard(None);

#[derive(Default)]
struct RecordingNotifier {
    messages: Vec<(String, ErrorSeverity)>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str, severity: ErrorSeverity) {
        self.messages.push((message.to_string(), severity));
    }
}

fn library() -> StorageBackends {
    let backends = StorageBackends::in_memory(true);
    backends
        .save_shortcuts(&[
            Shortcut::new("#ask", "resolved{cursor}!"),
            Shortcut::new("#sig", "Regards,\n{title}"),
        ])
        .unwrap();
    backends
}

fn auto_expanding() -> Settings {
    Settings {
        auto_expand_on_space: true,
        ..Settings::default()
    }
}

/// Focused textarea on an ordinary site
fn textarea_page(value: &str, caret: usize) -> (Page, NodeId) {
    let mut doc = Document::new();
    let field = doc.append_element(doc.body(), "textarea");
    let control = doc.control_mut(field).unwrap();
    control.set_value(value);
    control.set_selection_range(caret, caret);
    let mut page = Page::new(doc, "https://example.com/notes", "Notes");
    page.focus(field);
    (page, field)
}

/// claude.ai with an unfocused prompt editor and a send button
fn claude_page(text: &str) -> (Page, NodeId, NodeId) {
    let mut doc = Document::new();
    let body = doc.body();
    let editor = doc.append_element(body, "div");
    doc.set_attribute(editor, "contenteditable", "true");
    let node = doc.append_text(editor, text);
    let send = doc.append_element(body, "button");
    doc.set_attribute(send, "aria-label", "Send");
    let mut page = Page::new(doc, "https://claude.ai/new", "Claude");
    page.set_selection(Some(Selection::caret(BoundaryPoint::new(
        node,
        text.chars().count(),
    ))));
    (page, editor, send)
}

fn value_of(page: &Page, field: NodeId) -> &str {
    page.document.control(field).unwrap().value()
}

#[test]
fn expand_message_replaces_token_in_focused_field() {
    let backends = library();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD);
    let (mut page, field) = textarea_page("ask #ask", 8);

    let response = expander.handle(&mut page, &TriggerMessage::ExpandShortcode { trigger: None });

    assert_eq!(response, Response::success());
    assert_eq!(value_of(&page, field), "ask resolved!");
    assert_eq!(page.document.control(field).unwrap().selection_start(), 12);
    assert!(page.clicks().is_empty());
}

#[test]
fn ping_always_succeeds() {
    let backends = StorageBackends::in_memory(false);
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD);
    let mut page = Page::new(Document::new(), "about:blank", "");
    assert_eq!(expander.handle(&mut page, &TriggerMessage::Ping), Response::success());
}

#[test]
fn no_editable_target_is_reported() {
    let backends = library();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD);
    let mut doc = Document::new();
    let button = doc.append_element(doc.body(), "button");
    let mut page = Page::new(doc, "https://example.com", "Example");
    page.focus(button);

    let response = expander.handle(&mut page, &TriggerMessage::ExpandShortcode { trigger: None });
    assert_eq!(response, Response::failure("Click into a text field first."));
}

#[test]
fn missing_token_and_unknown_shortcut_are_distinct_failures() {
    let backends = library();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD);

    let (mut page, _) = textarea_page("nothing here", 12);
    let err = expander.expand_shortcut(&mut page, None, false).unwrap_err();
    assert_eq!(err.user_message(), "No shortcode found near cursor.");
    assert!(err.is_benign());

    let (mut page, field) = textarea_page("try #nope", 9);
    let err = expander.expand_shortcut(&mut page, None, false).unwrap_err();
    assert!(matches!(err, ExpandError::ShortcutNotFound));
    assert_eq!(value_of(&page, field), "try #nope");
    assert!(page.events().is_empty());
}

#[test]
fn insert_message_places_named_shortcut_at_caret() {
    let backends = library();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD);
    let (mut page, field) = textarea_page("Thanks. ", 8);

    let response = expander.handle(
        &mut page,
        &TriggerMessage::InsertShortcut {
            name: "#sig".to_string(),
        },
    );

    assert!(response.ok);
    assert_eq!(value_of(&page, field), "Thanks. Regards,\nNotes");
}

#[test]
fn insert_message_reports_unknown_name() {
    let backends = library();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD);
    let (mut page, _) = textarea_page("", 0);

    let response = expander.handle(
        &mut page,
        &TriggerMessage::InsertShortcut {
            name: "#nope".to_string(),
        },
    );
    assert_eq!(response, Response::failure("No shortcut found for #nope."));
}

#[test]
fn ai_site_input_is_focused_filled_and_sent() {
    let backends = library();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD).with_settings(Settings {
        auto_send: true,
        ..Settings::default()
    });
    let (mut page, editor, send) = claude_page("hi #ask");
    assert_eq!(page.focused(), None);

    expander.expand_shortcut(&mut page, None, false).unwrap();

    assert_eq!(page.focused(), Some(editor));
    assert_eq!(page.document.text_content(editor), "hi resolved!");
    assert_eq!(page.clicks(), &[send]);
}

#[test]
fn ai_site_respects_disabled_focus_and_send() {
    let backends = library();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD).with_settings(Settings {
        auto_focus_target: false,
        ..Settings::default()
    });
    let (mut page, editor, _) = claude_page("hi #ask");

    expander.expand_shortcut(&mut page, None, false).unwrap();

    assert_eq!(page.focused(), None);
    assert_eq!(page.document.text_content(editor), "hi resolved!");
    assert!(page.clicks().is_empty());
}

#[test]
fn send_without_site_adapter_does_nothing() {
    let backends = library();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD)
        .with_sites(SiteRegistry::empty())
        .with_settings(Settings {
            auto_send: true,
            ..Settings::default()
        });
    let (mut page, field) = textarea_page("#ask", 4);

    expander.expand_shortcut(&mut page, None, false).unwrap();
    assert_eq!(value_of(&page, field), "resolved!");
    assert!(page.clicks().is_empty());
}

#[test]
fn settings_are_loaded_from_storage_on_first_use() {
    let backends = library();
    backends
        .save_settings(&Settings {
            auto_send: true,
            ..Settings::default()
        })
        .unwrap();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD);
    let (mut page, _, send) = claude_page("#ask");

    expander.expand_shortcut(&mut page, None, false).unwrap();
    assert_eq!(page.clicks(), &[send]);
    assert!(expander.settings_context().is_loaded());
}

#[test]
fn key_up_expands_after_space() {
    let backends = library();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD).with_settings(auto_expanding());
    let mut notifier = RecordingNotifier::default();
    let (mut page, field) = textarea_page("hi #ask ", 8);

    assert!(expander.on_key_up(&mut page, " ", &mut notifier));
    assert_eq!(value_of(&page, field), "hi resolved! ");
    assert!(notifier.messages.is_empty());
}

#[test]
fn key_up_ignores_other_keys_and_disabled_setting() {
    let backends = library();
    let mut notifier = RecordingNotifier::default();
    let (mut page, field) = textarea_page("hi #ask ", 8);

    let mut disabled = Expander::new(&backends, &NO_CLIPBOARD).with_settings(Settings::default());
    assert!(!disabled.on_key_up(&mut page, " ", &mut notifier));

    let mut enabled = Expander::new(&backends, &NO_CLIPBOARD).with_settings(auto_expanding());
    assert!(!enabled.on_key_up(&mut page, "a", &mut notifier));
    assert!(!enabled.on_key_up(&mut page, "Tab", &mut notifier));
    assert_eq!(value_of(&page, field), "hi #ask ");
}

#[test]
fn key_up_without_token_stays_silent() {
    let backends = library();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD).with_settings(auto_expanding());
    let mut notifier = RecordingNotifier::default();
    let (mut page, _) = textarea_page("plain words ", 12);

    assert!(expander.on_key_up(&mut page, "Enter", &mut notifier));
    assert!(notifier.messages.is_empty());
}

#[test]
fn key_up_notifies_unknown_shortcut() {
    let backends = library();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD).with_settings(auto_expanding());
    let mut notifier = RecordingNotifier::default();
    let (mut page, _) = textarea_page("#nope ", 6);

    assert!(expander.on_key_up(&mut page, " ", &mut notifier));
    assert_eq!(notifier.messages.len(), 1);
    assert_eq!(notifier.messages[0].0, "No shortcut found.");
}

#[test]
fn key_up_requires_focused_target() {
    let backends = library();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD).with_settings(auto_expanding());
    let mut notifier = RecordingNotifier::default();
    let (mut page, editor, _) = claude_page("hi #ask ");

    assert!(!expander.on_key_up(&mut page, " ", &mut notifier));
    assert_eq!(page.document.text_content(editor), "hi #ask ");

    page.focus(editor);
    assert!(expander.on_key_up(&mut page, " ", &mut notifier));
    assert_eq!(page.document.text_content(editor), "hi resolved! ");
}

#[test]
fn storage_change_updates_cached_settings() {
    let backends = library();
    let mut expander = Expander::new(&backends, &NO_CLIPBOARD).with_settings(Settings::default());
    let mut notifier = RecordingNotifier::default();
    let (mut page, field) = textarea_page("#ask ", 5);

    assert!(!expander.on_key_up(&mut page, " ", &mut notifier));
    expander
        .settings_context()
        .apply_change(Some(&serde_json::json!({"autoExpandOnSpace": true})));
    assert!(expander.on_key_up(&mut page, " ", &mut notifier));
    assert_eq!(value_of(&page, field), "resolved! ");
}
