//! JSON-file storage tier
//!
//! The whole tier is one JSON object on disk. Writes go to a temp file that is
//! then renamed over the original, so a crash never leaves a half-written file.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use super::KeyValueStore;
use crate::error::StorageError;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at a path that may start with `~`
    pub fn at(path: &str) -> Self {
        Self::new(PathBuf::from(shellexpand::tilde(path).as_ref()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn read_all(&self) -> Result<Map<String, Value>, StorageError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Storage file not found, treating as empty");
            return Ok(Map::new());
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| self.io_error(&self.path, e))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(StorageError::Corrupt {
                key: self.describe(),
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
            Err(e) => Err(StorageError::Corrupt {
                key: self.describe(),
                message: e.to_string(),
            }),
        }
    }

    #[instrument(name = "storage_file_write", skip(self, values), fields(path = %self.path.display()))]
    fn write_all(&self, values: &Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
        }

        let json = serde_json::to_string_pretty(values)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &json).map_err(|e| self.io_error(&temp_path, e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(&self.path, e))?;

        info!(keys = values.len(), bytes = json.len(), "Saved storage file (atomic)");
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value);
        self.write_all(&values)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
