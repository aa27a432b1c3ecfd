//! Configuration module - user settings and their storage tiers
//!
//! This module provides functionality for:
//! - Default values for all settings
//! - Type definitions for settings and storage tiers
//! - Merging settings stored in several tiers
//! - An explicitly owned settings cache for the expansion engine
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - `Settings`, `SettingsPatch`, `StorageTier`
//! - `loader` - Parsing and merging stored settings layers
//! - `context` - `SettingsContext` with refresh and change notification

mod context;
mod defaults;
mod loader;
mod types;

pub use context::SettingsContext;
pub use defaults::{
    BACKUP_FILE_NAME, BACKUP_VERSION, DEFAULT_DATA_DIR, DEFAULT_TOAST_DURATION_MS,
    LOCAL_STORE_FILE, PREVIEW_MAX_CHARS, SETTINGS_KEY, SHORTCUTS_KEY, SYNC_STORE_FILE,
};
pub use loader::{merge_settings, parse_settings_layer, stored_storage_area};
pub use types::{Settings, SettingsPatch, StorageTier};

#[cfg(test)]
pub use defaults::{
    DEFAULT_AUTO_EXPAND_ON_SPACE, DEFAULT_AUTO_FOCUS_TARGET, DEFAULT_AUTO_SEND,
    DEFAULT_STORAGE_AREA,
};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
