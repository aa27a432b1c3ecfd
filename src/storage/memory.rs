use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::Value;

use super::KeyValueStore;
use crate::error::StorageError;

/// Store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    name: String,
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new(name: &str) -> Self {
        MemoryStore {
            name: name.to_string(),
            values: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory:{}", self.name)
    }
}
