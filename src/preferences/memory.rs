use std::collections::HashMap;
use std::sync::Mutex;

use crate::preferences::PreferenceStore;
use crate::preferences::errors::{PreferenceError, PreferenceResult};

/// Process-local store, used by tests and sessions without a database.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> PreferenceResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|err| PreferenceError::Storage(format!("lock poisoned: {err}")))
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn read(&self, key: &str) -> PreferenceResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> PreferenceResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PreferenceResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
