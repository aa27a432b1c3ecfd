//! Cached settings for the expansion engine
//!
//! The cache is owned by whoever drives expansion and passed explicitly.
//! It starts at defaults and is filled on first use, on explicit refresh,
//! and from storage-change notifications.

use serde_json::Value;
use tracing::{debug, info, instrument};

use super::loader::merge_settings;
use super::types::Settings;
use crate::error::StorageError;
use crate::storage::ShortcutSource;

#[derive(Debug, Clone, Default)]
pub struct SettingsContext {
    settings: Settings,
    loaded: bool,
}

impl SettingsContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context pre-filled with known settings
    pub fn with_settings(settings: Settings) -> Self {
        SettingsContext {
            settings,
            loaded: true,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Reload from storage
    #[instrument(skip_all)]
    pub fn refresh(&mut self, source: &dyn ShortcutSource) -> Result<&Settings, StorageError> {
        self.settings = source.settings()?;
        self.loaded = true;
        info!(settings = ?self.settings, "Settings refreshed");
        Ok(&self.settings)
    }

    /// Load once; later calls return the cache
    pub fn ensure_loaded(&mut self, source: &dyn ShortcutSource) -> Result<&Settings, StorageError> {
        if !self.loaded {
            self.refresh(source)?;
        }
        Ok(&self.settings)
    }

    /// Apply a storage-change notification carrying the new stored settings.
    /// The new value replaces the cache wholesale, on top of defaults.
    pub fn apply_change(&mut self, new_value: Option<&Value>) {
        self.settings = merge_settings([new_value]);
        self.loaded = true;
        debug!(settings = ?self.settings, "Settings changed in storage");
    }
}
