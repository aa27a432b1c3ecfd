//! Shortcut library.
//!
//! This module provides:
//! - `Shortcut` - a `#name` bound to a template
//! - The default library seeded on first run
//! - Name normalization, lookup, and search
//! - Add/edit/delete/favorite operations on a list
//! - JSON backup export and import
//!
//! # Example
//!
//! ```
//! use prompt_hash::shortcuts::{default_shortcuts, filter_shortcuts, find_by_name};
//!
//! let library = default_shortcuts();
//! assert!(find_by_name(&library, "#summarise").is_some());
//! assert_eq!(filter_shortcuts(&library, "risk")[0].name, "#premortem");
//! ```

mod backup;
mod defaults;
mod library;
mod types;

pub use backup::{
    export_backup, merge_import, parse_backup, Backup, ImportOutcome, IncomingBackup,
};
pub use defaults::default_shortcuts;
pub use library::{
    filter_shortcuts, find_by_name, normalize_name, parse_tags, preview_text, remove_shortcut,
    toggle_favorite, upsert_shortcut, ShortcutDraft,
};
pub use types::Shortcut;
