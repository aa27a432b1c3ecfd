//! JSON backup export and import.
//!
//! Export writes `{ version, shortcuts, settings, exportedAt }`. Import is
//! lenient about shape: a missing or non-array `shortcuts` imports nothing,
//! unreadable entries are skipped, and `settings` overlays the current ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::types::Shortcut;
use crate::config::{parse_settings_layer, Settings, SettingsPatch, BACKUP_VERSION};
use crate::error::BackupError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub version: u64,
    pub shortcuts: Vec<Shortcut>,
    pub settings: Settings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

impl Backup {
    pub fn new(shortcuts: &[Shortcut], settings: Settings) -> Self {
        Backup {
            version: BACKUP_VERSION,
            shortcuts: shortcuts.to_vec(),
            settings,
            exported_at: Some(Utc::now()),
        }
    }
}

/// Pretty-printed backup document
pub fn export_backup(shortcuts: &[Shortcut], settings: Settings) -> Result<String, BackupError> {
    let json = serde_json::to_string_pretty(&Backup::new(shortcuts, settings))?;
    info!(count = shortcuts.len(), bytes = json.len(), "Exported backup");
    Ok(json)
}

/// What a backup file offers for import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomingBackup {
    pub shortcuts: Vec<Shortcut>,
    pub settings: SettingsPatch,
}

#[instrument(skip(json), fields(bytes = json.len()))]
pub fn parse_backup(json: &str) -> Result<IncomingBackup, BackupError> {
    let data: Value = serde_json::from_str(json)?;

    if let Some(version) = data.get("version").and_then(Value::as_u64) {
        if version > BACKUP_VERSION {
            return Err(BackupError::UnsupportedVersion(version));
        }
    }

    let shortcuts = match data.get("shortcuts") {
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                match Shortcut::deserialize(entry) {
                    Ok(shortcut) => Some(shortcut),
                    Err(e) => {
                        warn!(index, error = %e, "Skipping unreadable backup entry");
                        None
                    }
                }
            })
            .collect(),
        _ => Vec::new(),
    };
    let settings = parse_settings_layer(data.get("settings")).unwrap_or_default();

    Ok(IncomingBackup {
        shortcuts,
        settings,
    })
}

/// Result of merging a backup into the current library
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub shortcuts: Vec<Shortcut>,
    pub settings: Settings,
    pub imported: usize,
    /// Incoming shortcuts that replaced an existing one of the same name
    pub conflicts: usize,
}

/// Merge `incoming` into `existing` by name.
///
/// Existing shortcuts keep their position when replaced; new ones are
/// appended. Replacing anything requires `overwrite`.
pub fn merge_import(
    existing: &[Shortcut],
    settings: Settings,
    incoming: &IncomingBackup,
    overwrite: bool,
) -> Result<ImportOutcome, BackupError> {
    let conflicts = incoming
        .shortcuts
        .iter()
        .filter(|shortcut| existing.iter().any(|current| current.name == shortcut.name))
        .count();
    if conflicts > 0 && !overwrite {
        return Err(BackupError::OverwriteRequiresConsent { conflicts });
    }

    let mut merged = existing.to_vec();
    for shortcut in &incoming.shortcuts {
        match merged.iter().position(|current| current.name == shortcut.name) {
            Some(index) => merged[index] = shortcut.clone(),
            None => merged.push(shortcut.clone()),
        }
    }

    info!(
        imported = incoming.shortcuts.len(),
        conflicts,
        total = merged.len(),
        "Merged backup"
    );
    Ok(ImportOutcome {
        shortcuts: merged,
        settings: settings.merged(&incoming.settings),
        imported: incoming.shortcuts.len(),
        conflicts,
    })
}
