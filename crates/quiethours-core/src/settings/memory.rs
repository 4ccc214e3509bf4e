//! In-memory settings store.
//!
//! Backs tests and simulations. Values are kept as strings, the same as
//! a device settings provider does, so the malformed-value recovery path
//! is exercisable.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{SettingKey, SettingsObserver, SettingsStore};
use crate::error::StorageError;

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<SettingKey, String>>,
    observers: Mutex<HashMap<SettingKey, Vec<SettingsObserver>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn notify(&self, key: SettingKey) {
        let observers: Vec<SettingsObserver> = self
            .observers
            .lock()
            .expect("observer table poisoned")
            .get(&key)
            .cloned()
            .unwrap_or_default();
        for observer in observers {
            observer(key);
        }
    }
}

impl SettingsStore for MemoryStore {
    fn get_int(&self, key: SettingKey) -> Result<Option<i64>, StorageError> {
        match self.values.lock().expect("value table poisoned").get(&key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|e| StorageError::ReadFailed {
                    key: key.as_str().into(),
                    message: format!("'{raw}' is not an integer: {e}"),
                }),
        }
    }

    fn put_int(&self, key: SettingKey, value: i64) -> Result<(), StorageError> {
        self.values
            .lock()
            .expect("value table poisoned")
            .insert(key, value.to_string());
        self.notify(key);
        Ok(())
    }

    fn get_string(&self, key: SettingKey) -> Result<Option<String>, StorageError> {
        Ok(self
            .values
            .lock()
            .expect("value table poisoned")
            .get(&key)
            .cloned())
    }

    fn put_string(&self, key: SettingKey, value: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .expect("value table poisoned")
            .insert(key, value.to_string());
        self.notify(key);
        Ok(())
    }

    fn observe(&self, key: SettingKey, observer: SettingsObserver) {
        self.observers
            .lock()
            .expect("observer table poisoned")
            .entry(key)
            .or_default()
            .push(observer);
    }
}
