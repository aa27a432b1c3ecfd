//! Configuration type definitions
//!
//! This module contains all the struct and enum definitions for settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::defaults::*;

// ============================================
// STORAGE TIER
// ============================================

/// Which storage area holds shortcuts and settings
///
/// Deserialization is lenient: any name other than `"local"` selects `Sync`,
/// matching how stored names are resolved to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum StorageTier {
    /// Device-only storage
    Local,
    /// Storage replicated across the user's browsers
    Sync,
}

impl StorageTier {
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("local") {
            StorageTier::Local
        } else {
            StorageTier::Sync
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StorageTier::Local => "local",
            StorageTier::Sync => "sync",
        }
    }
}

impl Default for StorageTier {
    fn default() -> Self {
        DEFAULT_STORAGE_AREA
    }
}

impl From<String> for StorageTier {
    fn from(name: String) -> Self {
        StorageTier::from_name(&name)
    }
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageTier {
    type Err = String;

    /// Strict parse for user input
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(StorageTier::Local),
            "sync" => Ok(StorageTier::Sync),
            other => Err(format!(
                "unknown storage area '{}' (expected 'local' or 'sync')",
                other
            )),
        }
    }
}

// ============================================
// SETTINGS
// ============================================

/// User settings, fully populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Expand a token when space or enter is typed after it (default: false)
    #[serde(default = "default_auto_expand_on_space")]
    pub auto_expand_on_space: bool,
    /// Focus the detected input before inserting (default: true)
    #[serde(default = "default_auto_focus_target", alias = "autoFocusAiInput")]
    pub auto_focus_target: bool,
    /// Click the site's send control after inserting (default: false)
    #[serde(default = "default_auto_send")]
    pub auto_send: bool,
    /// Tier holding the shortcut list (default: sync)
    #[serde(default)]
    pub storage_area: StorageTier,
}

fn default_auto_expand_on_space() -> bool {
    DEFAULT_AUTO_EXPAND_ON_SPACE
}
fn default_auto_focus_target() -> bool {
    DEFAULT_AUTO_FOCUS_TARGET
}
fn default_auto_send() -> bool {
    DEFAULT_AUTO_SEND
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_expand_on_space: DEFAULT_AUTO_EXPAND_ON_SPACE,
            auto_focus_target: DEFAULT_AUTO_FOCUS_TARGET,
            auto_send: DEFAULT_AUTO_SEND,
            storage_area: DEFAULT_STORAGE_AREA,
        }
    }
}

impl Settings {
    /// Overlay every field present in `patch`
    pub fn merged(mut self, patch: &SettingsPatch) -> Self {
        if let Some(value) = patch.auto_expand_on_space {
            self.auto_expand_on_space = value;
        }
        if let Some(value) = patch.auto_focus_target {
            self.auto_focus_target = value;
        }
        if let Some(value) = patch.auto_send {
            self.auto_send = value;
        }
        if let Some(value) = patch.storage_area {
            self.storage_area = value;
        }
        self
    }
}

/// A stored settings object where every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_expand_on_space: Option<bool>,
    #[serde(
        default,
        alias = "autoFocusAiInput",
        skip_serializing_if = "Option::is_none"
    )]
    pub auto_focus_target: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_send: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_area: Option<StorageTier>,
}

impl From<Settings> for SettingsPatch {
    fn from(settings: Settings) -> Self {
        SettingsPatch {
            auto_expand_on_space: Some(settings.auto_expand_on_space),
            auto_focus_target: Some(settings.auto_focus_target),
            auto_send: Some(settings.auto_send),
            storage_area: Some(settings.storage_area),
        }
    }
}
