use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, warn};

use crate::dom::DomError;

/// Error severity for notification display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,     // benign, usually not shown
    Warning,  // recoverable
    Error,    // operation failed
    Critical, // data could not be read or written
}

/// Failures while writing resolved text into an editable target
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    #[error("No selection in editable element.")]
    NoSelection,

    #[error("No shortcode found near cursor.")]
    NoTokenFound,

    #[error("Editable element does not support cursor selection.")]
    UnsupportedTarget,

    #[error("Unable to resolve caret position.")]
    CaretResolutionFailed,

    #[error("Document update failed: {0}")]
    Dom(#[from] DomError),
}

impl InsertError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoTokenFound => ErrorSeverity::Info,
            Self::NoSelection | Self::UnsupportedTarget => ErrorSeverity::Warning,
            Self::CaretResolutionFailed | Self::Dom(_) => ErrorSeverity::Error,
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Storage backend failures
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access storage file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode storage data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stored value for '{key}' is malformed: {message}")]
    Corrupt { key: String, message: String },
}

impl StorageError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Io { .. } => ErrorSeverity::Critical,
            Self::Json(_) => ErrorSeverity::Error,
            Self::Corrupt { .. } => ErrorSeverity::Warning,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Io { path, .. } => format!("Could not access {}", path.display()),
            Self::Json(_) => "Saved data could not be encoded.".to_string(),
            Self::Corrupt { key, .. } => format!("Saved {} are unreadable.", key),
        }
    }
}

/// Failures of a shortcut expansion request
#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("Click into a text field first.")]
    NoEditableTarget,

    #[error("No shortcut found for {0}.")]
    NamedShortcutNotFound(String),

    #[error("No shortcut found.")]
    ShortcutNotFound,

    #[error(transparent)]
    Insert(#[from] InsertError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ExpandError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoEditableTarget => ErrorSeverity::Warning,
            Self::NamedShortcutNotFound(_) | Self::ShortcutNotFound => ErrorSeverity::Warning,
            Self::Insert(e) => e.severity(),
            Self::Storage(e) => e.severity(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Insert(e) => e.user_message(),
            Self::Storage(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// Auto-expansion with no token is routine typing, not a failure
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::Insert(InsertError::NoTokenFound))
    }
}

/// Rejected shortcut edits
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortcutValidationError {
    #[error("Enter a valid #name.")]
    InvalidName,

    #[error("Template cannot be empty.")]
    EmptyTemplate,
}

/// Backup import failures
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Import failed. Check the JSON file.")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported backup version {0}")]
    UnsupportedVersion(u64),

    #[error("Overwrite {conflicts} existing shortcut(s)? This cannot be undone.")]
    OverwriteRequiresConsent { conflicts: usize },
}

impl BackupError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Parse(_) | Self::UnsupportedVersion(_) => ErrorSeverity::Error,
            Self::OverwriteRequiresConsent { .. } => ErrorSeverity::Warning,
        }
    }
}

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the user doesn't need to know.
///
/// # Examples
///
/// ```
/// use prompt_hash::error::ResultExt;
///
/// let parsed: Option<u32> = "12".parse::<u32>().log_err();
/// assert_eq!(parsed, Some(12));
///
/// let missing: Option<u32> = "x".parse::<u32>().warn_on_err();
/// assert_eq!(missing, None);
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

/// Panic in debug mode, log error in release mode.
///
/// Use for "impossible" states that should crash during development
/// but degrade in production, such as a tree mutation that would
/// create a cycle.
///
/// ```should_panic
/// # #[macro_use] extern crate prompt_hash;
/// # fn main() {
/// let index = 7;
/// debug_panic!("Invalid node index {}", index);
/// # }
/// ```
#[macro_export]
macro_rules! debug_panic {
    ( $($fmt_arg:tt)* ) => {
        if cfg!(debug_assertions) {
            panic!( $($fmt_arg)* );
        } else {
            tracing::error!("IMPOSSIBLE STATE: {}", format_args!($($fmt_arg)*));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_match_notification_text() {
        assert_eq!(
            InsertError::NoTokenFound.user_message(),
            "No shortcode found near cursor."
        );
        assert_eq!(
            ExpandError::NamedShortcutNotFound("#x".to_string()).user_message(),
            "No shortcut found for #x."
        );
        assert_eq!(ExpandError::ShortcutNotFound.to_string(), "No shortcut found.");
        assert_eq!(
            ExpandError::from(InsertError::CaretResolutionFailed).user_message(),
            "Unable to resolve caret position."
        );
    }

    #[test]
    fn only_missing_token_is_benign() {
        assert!(ExpandError::from(InsertError::NoTokenFound).is_benign());
        assert_eq!(
            ExpandError::from(InsertError::NoTokenFound).severity(),
            ErrorSeverity::Info
        );
        assert!(!ExpandError::NoEditableTarget.is_benign());
        assert!(!ExpandError::from(InsertError::NoSelection).is_benign());
    }

    #[test]
    fn storage_errors_carry_severity() {
        let err = StorageError::Io {
            path: PathBuf::from("/tmp/x.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_message().contains("/tmp/x.json"));

        let expand: ExpandError = err.into();
        assert_eq!(expand.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn log_err_passes_through_ok() {
        let ok: Result<i32, String> = Ok(3);
        assert_eq!(ok.log_err(), Some(3));
        let err: Result<i32, String> = Err("nope".to_string());
        assert_eq!(err.warn_on_err(), None);
    }

    #[test]
    fn overwrite_consent_message_counts_conflicts() {
        let err = BackupError::OverwriteRequiresConsent { conflicts: 2 };
        assert_eq!(
            err.to_string(),
            "Overwrite 2 existing shortcut(s)? This cannot be undone."
        );
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }
}
