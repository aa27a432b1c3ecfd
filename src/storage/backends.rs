//! The local and sync tiers and the rules for choosing between them

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, instrument};

use super::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::config::{
    merge_settings, stored_storage_area, Settings, StorageTier,
    LOCAL_STORE_FILE, SETTINGS_KEY, SHORTCUTS_KEY, SYNC_STORE_FILE,
};
use crate::error::StorageError;
use crate::shortcuts::{default_shortcuts, Shortcut};

/// Everything the management surfaces show
#[derive(Debug, Clone, PartialEq)]
pub struct StoredData {
    pub shortcuts: Vec<Shortcut>,
    pub settings: Settings,
}

/// What the expansion engine reads from storage
pub trait ShortcutSource {
    /// Shortcut list of the preferred tier, empty when nothing is stored
    fn shortcut_list(&self) -> Result<Vec<Shortcut>, StorageError>;

    /// Defaults overlaid with the sync tier's settings, then the local tier's
    fn settings(&self) -> Result<Settings, StorageError>;
}

pub struct StorageBackends {
    local: Box<dyn KeyValueStore>,
    sync: Option<Box<dyn KeyValueStore>>,
}

impl StorageBackends {
    pub fn new(local: Box<dyn KeyValueStore>, sync: Option<Box<dyn KeyValueStore>>) -> Self {
        StorageBackends { local, sync }
    }

    pub fn in_memory(with_sync: bool) -> Self {
        let sync: Option<Box<dyn KeyValueStore>> = if with_sync {
            Some(Box::new(MemoryStore::new("sync")))
        } else {
            None
        };
        Self::new(Box::new(MemoryStore::new("local")), sync)
    }

    /// File-backed tiers inside `dir` (`local.json`, and `sync.json` when enabled)
    pub fn open_dir(dir: &Path, with_sync: bool) -> Self {
        let sync: Option<Box<dyn KeyValueStore>> = if with_sync {
            Some(Box::new(JsonFileStore::new(dir.join(SYNC_STORE_FILE))))
        } else {
            None
        };
        Self::new(Box::new(JsonFileStore::new(dir.join(LOCAL_STORE_FILE))), sync)
    }

    pub fn sync_available(&self) -> bool {
        self.sync.is_some()
    }

    /// The store for `tier`; sync falls back to local when unavailable
    pub fn area(&self, tier: StorageTier) -> &dyn KeyValueStore {
        match (tier, &self.sync) {
            (StorageTier::Sync, Some(sync)) => sync.as_ref(),
            _ => self.local.as_ref(),
        }
    }

    fn stored_settings(&self) -> Result<(Option<Value>, Option<Value>), StorageError> {
        let local = self.local.get(SETTINGS_KEY)?;
        let sync = match &self.sync {
            Some(sync) => sync.get(SETTINGS_KEY)?,
            None => None,
        };
        Ok((local, sync))
    }

    /// Where shortcuts live: the local tier's choice, else the sync tier's,
    /// else sync when it exists
    pub fn preferred_tier(&self) -> Result<StorageTier, StorageError> {
        let (local, sync) = self.stored_settings()?;
        let tier = stored_storage_area(local.as_ref())
            .or_else(|| stored_storage_area(sync.as_ref()))
            .unwrap_or(if self.sync_available() {
                StorageTier::Sync
            } else {
                StorageTier::Local
            });
        debug!(tier = %tier, "Resolved preferred storage tier");
        Ok(tier)
    }

    pub fn preferred_area(&self) -> Result<&dyn KeyValueStore, StorageError> {
        Ok(self.area(self.preferred_tier()?))
    }

    /// Stored shortcuts, `None` when the key is absent or `null`
    fn read_shortcuts(area: &dyn KeyValueStore) -> Result<Option<Vec<Shortcut>>, StorageError> {
        match area.get(SHORTCUTS_KEY)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StorageError::Corrupt {
                    key: SHORTCUTS_KEY.to_string(),
                    message: e.to_string(),
                }),
        }
    }

    /// Shortcuts and settings from the preferred tier. An empty shortcut list
    /// is replaced by the default library.
    #[instrument(skip(self))]
    pub fn load_data(&self) -> Result<StoredData, StorageError> {
        let area = self.preferred_area()?;
        let shortcuts = Self::read_shortcuts(area)?
            .filter(|shortcuts| !shortcuts.is_empty())
            .unwrap_or_else(default_shortcuts);
        let settings = merge_settings([area.get(SETTINGS_KEY)?.as_ref()]);
        debug!(
            area = %area.describe(),
            shortcut_count = shortcuts.len(),
            "Loaded stored data"
        );
        Ok(StoredData {
            shortcuts,
            settings,
        })
    }

    /// Write the full shortcut list to the preferred tier
    #[instrument(skip(self, shortcuts), fields(count = shortcuts.len()))]
    pub fn save_shortcuts(&self, shortcuts: &[Shortcut]) -> Result<(), StorageError> {
        let area = self.preferred_area()?;
        area.set(SHORTCUTS_KEY, serde_json::to_value(shortcuts)?)?;
        info!(area = %area.describe(), "Saved shortcuts");
        Ok(())
    }

    /// Write settings to every tier
    #[instrument(skip(self))]
    pub fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let value = serde_json::to_value(settings)?;
        self.local.set(SETTINGS_KEY, value.clone())?;
        if let Some(sync) = &self.sync {
            sync.set(SETTINGS_KEY, value)?;
        }
        info!("Saved settings");
        Ok(())
    }

    /// Save settings from the options surface. When the storage area changes
    /// the current shortcut list moves to the new tier.
    #[instrument(skip(self))]
    pub fn update_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let current = self.load_data()?;
        self.save_settings(settings)?;
        if current.settings.storage_area != settings.storage_area {
            info!(
                from = %current.settings.storage_area,
                to = %settings.storage_area,
                "Storage area changed, moving shortcuts"
            );
            self.save_shortcuts(&current.shortcuts)?;
        }
        Ok(())
    }

    /// Seed the preferred tier with the default library and settings where
    /// missing. Returns whether anything was written.
    #[instrument(skip(self))]
    pub fn ensure_defaults(&self) -> Result<bool, StorageError> {
        let area = self.preferred_area()?;
        let mut seeded = false;

        let has_shortcuts = Self::read_shortcuts(area)?.is_some_and(|list| !list.is_empty());
        if !has_shortcuts {
            area.set(SHORTCUTS_KEY, serde_json::to_value(default_shortcuts())?)?;
            seeded = true;
        }
        if area.get(SETTINGS_KEY)?.filter(|value| !value.is_null()).is_none() {
            area.set(SETTINGS_KEY, serde_json::to_value(Settings::default())?)?;
            seeded = true;
        }

        if seeded {
            info!(area = %area.describe(), "Seeded default shortcuts and settings");
        }
        Ok(seeded)
    }
}

impl ShortcutSource for StorageBackends {
    fn shortcut_list(&self) -> Result<Vec<Shortcut>, StorageError> {
        Ok(Self::read_shortcuts(self.preferred_area()?)?.unwrap_or_default())
    }

    fn settings(&self) -> Result<Settings, StorageError> {
        let (local, sync) = self.stored_settings()?;
        Ok(merge_settings([sync.as_ref(), local.as_ref()]))
    }
}

impl std::fmt::Debug for StorageBackends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageBackends")
            .field("local", &self.local.describe())
            .field("sync", &self.sync.as_ref().map(|sync| sync.describe()))
            .finish()
    }
}
