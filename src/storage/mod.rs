//! Persistent storage for shortcuts and settings.
//!
//! This module provides:
//! - The `KeyValueStore` seam over JSON values
//! - An in-memory store and a JSON-file store
//! - `StorageBackends`, which pairs a local tier with an optional sync tier
//!   and resolves where data lives
//!
//! # Example
//!
//! ```
//! use prompt_hash::storage::{ShortcutSource, StorageBackends};
//!
//! let backends = StorageBackends::in_memory(true);
//! backends.ensure_defaults().unwrap();
//! let data = backends.load_data().unwrap();
//! assert!(data.shortcuts.iter().any(|s| s.name == "#investigate"));
//! assert!(!backends.shortcut_list().unwrap().is_empty());
//! ```

mod backends;
mod file;
mod memory;

use serde_json::Value;

pub use backends::{ShortcutSource, StorageBackends, StoredData};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StorageError;

/// A flat key/value area holding JSON values (one storage tier)
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, `None` when absent
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;
