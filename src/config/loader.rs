//! Settings loading from stored JSON values
//!
//! Each storage tier may hold a `settings` object written by any version of
//! the extension. Layers are parsed leniently and overlaid field by field.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::types::{Settings, SettingsPatch, StorageTier};

/// Parse one stored settings layer.
///
/// Missing or `null` layers are skipped silently. A malformed layer is
/// logged and skipped so one bad tier can't hide the others.
pub fn parse_settings_layer(value: Option<&Value>) -> Option<SettingsPatch> {
    let value = value.filter(|value| !value.is_null())?;
    match SettingsPatch::deserialize(value) {
        Ok(patch) => Some(patch),
        Err(e) => {
            warn!(error = %e, layer = %value, "Ignoring malformed settings layer");
            None
        }
    }
}

/// Defaults overlaid with each layer in order; later layers win.
///
/// ```
/// use prompt_hash::config::merge_settings;
/// use serde_json::json;
///
/// let sync = json!({ "autoSend": true, "autoExpandOnSpace": true });
/// let local = json!({ "autoExpandOnSpace": false });
/// let settings = merge_settings([Some(&sync), Some(&local)]);
/// assert!(settings.auto_send);
/// assert!(!settings.auto_expand_on_space);
/// assert!(settings.auto_focus_target);
/// ```
pub fn merge_settings<'a>(layers: impl IntoIterator<Item = Option<&'a Value>>) -> Settings {
    let merged = layers
        .into_iter()
        .filter_map(parse_settings_layer)
        .fold(Settings::default(), |settings, patch| settings.merged(&patch));
    debug!(?merged, "Merged settings layers");
    merged
}

/// The storage area named by a stored settings layer.
///
/// An empty name counts as unset.
pub fn stored_storage_area(value: Option<&Value>) -> Option<StorageTier> {
    value?
        .get("storageArea")?
        .as_str()
        .filter(|name| !name.is_empty())
        .map(StorageTier::from_name)
}
