//! TOML-file settings store.
//!
//! Stand-in for the device settings provider when running on a desktop:
//! a flat `settings.toml` under `~/.config/quiethours[-dev]/`, written
//! through on every put.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{SettingKey, SettingsObserver, SettingsStore};
use crate::error::StorageError;

/// Returns `~/.config/quiethours[-dev]/` based on QUIETHOURS_ENV.
///
/// Set QUIETHOURS_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("QUIETHOURS_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("quiethours-dev")
    } else {
        base_dir.join("quiethours")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::FileAccess {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, toml::Value>>,
    observers: Mutex<std::collections::HashMap<SettingKey, Vec<SettingsObserver>>>,
}

impl FileStore {
    /// Open the default store at `~/.config/quiethours/settings.toml`.
    pub fn open_default() -> Result<Self, StorageError> {
        Self::open(data_dir()?.join("settings.toml"))
    }

    /// Open (or create) a store at an explicit path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| StorageError::FileAccess {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            Err(_) => BTreeMap::new(),
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
            observers: Mutex::new(std::collections::HashMap::new()),
        })
    }

    fn persist(&self, values: &BTreeMap<String, toml::Value>) -> Result<(), StorageError> {
        let content = toml::to_string_pretty(values).map_err(|e| StorageError::FileAccess {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&self.path, content).map_err(|e| StorageError::FileAccess {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn put(&self, key: SettingKey, value: toml::Value) -> Result<(), StorageError> {
        {
            let mut values = self.values.lock().expect("value table poisoned");
            values.insert(key.as_str().to_string(), value);
            self.persist(&values)?;
        }
        self.notify(key);
        Ok(())
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

impl SettingsStore for FileStore {
    fn get_int(&self, key: SettingKey) -> Result<Option<i64>, StorageError> {
        match self
            .values
            .lock()
            .expect("value table poisoned")
            .get(key.as_str())
        {
            None => Ok(None),
            Some(toml::Value::Integer(n)) => Ok(Some(*n)),
            Some(other) => Err(StorageError::ReadFailed {
                key: key.as_str().into(),
                message: format!("expected integer, found {}", other.type_str()),
            }),
        }
    }

    fn put_int(&self, key: SettingKey, value: i64) -> Result<(), StorageError> {
        self.put(key, toml::Value::Integer(value))
    }

    fn get_string(&self, key: SettingKey) -> Result<Option<String>, StorageError> {
        match self
            .values
            .lock()
            .expect("value table poisoned")
            .get(key.as_str())
        {
            None => Ok(None),
            Some(toml::Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(StorageError::ReadFailed {
                key: key.as_str().into(),
                message: format!("expected string, found {}", other.type_str()),
            }),
        }
    }

    fn put_string(&self, key: SettingKey, value: &str) -> Result<(), StorageError> {
        self.put(key, toml::Value::String(value.to_string()))
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
