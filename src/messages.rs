//! Trigger messages and their responses.
//!
//! Hosts (the browser command handler, the popup, a test harness) ask a page
//! to expand through JSON messages:
//!
//! ```json
//! {"type": "expand-shortcode"}
//! {"type": "insert-shortcut", "name": "#summarise"}
//! {"type": "auto-expand"}
//! {"type": "ping"}
//! ```
//!
//! Every message is answered with `{"ok": true}` or
//! `{"ok": false, "error": "<user-facing message>"}`.

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ExpandError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TriggerMessage {
    /// Expand the token before the caret (keyboard command)
    ExpandShortcode {
        /// Where the request came from, for logs only
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trigger: Option<String>,
    },
    /// Insert a named shortcut at the caret, no token needed
    InsertShortcut { name: String },
    /// Expand after a typed space or enter
    AutoExpand,
    /// Liveness check
    Ping,
}

impl TriggerMessage {
    /// Trailing whitespace is only skipped for typed triggers
    pub fn allows_trailing_whitespace(&self) -> bool {
        matches!(self, TriggerMessage::AutoExpand)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn success() -> Self {
        Response {
            ok: true,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Response {
            ok: false,
            error: Some(message.into()),
        }
    }
}

impl From<Result<(), ExpandError>> for Response {
    fn from(result: Result<(), ExpandError>) -> Self {
        match result {
            Ok(()) => Response::success(),
            Err(e) => Response::failure(e.user_message()),
        }
    }
}

/// Messages from a JSONL stream, one per line.
///
/// Blank lines are ignored; malformed lines are logged and skipped. Reading
/// stops at the first I/O error.
pub fn read_messages<R: BufRead>(reader: R) -> impl Iterator<Item = TriggerMessage> {
    reader
        .lines()
        .map_while(|line| match line {
            Ok(line) => Some(line),
            Err(e) => {
                warn!(error = %e, "Error reading message stream");
                None
            }
        })
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<TriggerMessage>(&line) {
            Ok(message) => {
                debug!(?message, "Parsed message");
                Some(message)
            }
            Err(e) => {
                warn!(error = %e, line = %line, "Failed to parse message");
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InsertError;

    #[test]
    fn test_expand_shortcode_deserialization() {
        let json = r#"{"type": "expand-shortcode", "trigger": "command"}"#;
        let message: TriggerMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            message,
            TriggerMessage::ExpandShortcode {
                trigger: Some("command".to_string())
            }
        );
        assert!(!message.allows_trailing_whitespace());
    }

    #[test]
    fn test_insert_shortcut_deserialization() {
        let json = r##"{"type": "insert-shortcut", "name": "#ask"}"##;
        let message: TriggerMessage = serde_json::from_str(json).unwrap();
        match message {
            TriggerMessage::InsertShortcut { name } => assert_eq!(name, "#ask"),
            _ => panic!("Expected InsertShortcut message"),
        }
    }

    #[test]
    fn test_auto_expand_allows_trailing_whitespace() {
        let message: TriggerMessage = serde_json::from_str(r#"{"type": "auto-expand"}"#).unwrap();
        assert!(message.allows_trailing_whitespace());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(serde_json::from_str::<TriggerMessage>(r#"{"type": "explode"}"#).is_err());
        assert!(serde_json::from_str::<TriggerMessage>(r#"{"type": "insert-shortcut"}"#).is_err());
    }

    #[test]
    fn test_response_serialization() {
        assert_eq!(
            serde_json::to_string(&Response::success()).unwrap(),
            r#"{"ok":true}"#
        );
        let failure = Response::from(Err::<(), _>(ExpandError::NoEditableTarget));
        assert_eq!(
            serde_json::to_string(&failure).unwrap(),
            r#"{"ok":false,"error":"Click into a text field first."}"#
        );
        let failure = Response::from(Err::<(), _>(ExpandError::from(InsertError::NoTokenFound)));
        assert_eq!(failure.error.as_deref(), Some("No shortcode found near cursor."));
    }

    #[test]
    fn test_read_messages_skips_blank_and_bad_lines() {
        let input = "{\"type\": \"ping\"}\n\n not json\n{\"type\": \"auto-expand\"}\n";
        let messages: Vec<_> = read_messages(input.as_bytes()).collect();
        assert_eq!(
            messages,
            vec![TriggerMessage::Ping, TriggerMessage::AutoExpand]
        );
    }
}
