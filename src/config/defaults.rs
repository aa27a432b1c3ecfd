//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

use super::types::StorageTier;

/// Default settings
pub const DEFAULT_AUTO_EXPAND_ON_SPACE: bool = false;
pub const DEFAULT_AUTO_FOCUS_TARGET: bool = true;
pub const DEFAULT_AUTO_SEND: bool = false;
pub const DEFAULT_STORAGE_AREA: StorageTier = StorageTier::Sync;

/// Keys used in every storage tier
pub const SETTINGS_KEY: &str = "settings";
pub const SHORTCUTS_KEY: &str = "shortcuts";

/// Data directory for file-backed storage and logs
pub const DEFAULT_DATA_DIR: &str = "~/.prompt-hash";
pub const LOCAL_STORE_FILE: &str = "local.json";
pub const SYNC_STORE_FILE: &str = "sync.json";

/// How long an in-page notification stays visible
pub const DEFAULT_TOAST_DURATION_MS: u64 = 2200;

/// Shortcut list previews show at most this many characters of the first line
pub const PREVIEW_MAX_CHARS: usize = 80;

/// Backup file format
pub const BACKUP_VERSION: u64 = 1;
pub const BACKUP_FILE_NAME: &str = "prompt-hash-shortcuts.json";
