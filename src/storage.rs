use crate::errors::StorageError;
use crate::models::{default_habits, AppData, Habit, LogBook};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

pub const HABITS_KEY: &str = "habitpulse_2026_data_habits";
pub const LOGS_KEY: &str = "habitpulse_2026_data_logs";

/// String-keyed durable storage, one value per key.
pub trait KeyValueStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key)?, value)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: impl Into<String>) -> Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads both collections, each key independently. Anything missing or
/// unusable falls back to the defaults.
pub fn load_data<S: KeyValueStorage>(storage: &S, now_ms: i64) -> AppData {
    let habits = load_key::<_, Vec<Habit>>(storage, HABITS_KEY)
        .unwrap_or_else(|| default_habits(now_ms));
    let logs = load_key::<_, LogBook>(storage, LOGS_KEY).unwrap_or_default();
    AppData { habits, logs }
}

fn load_key<S: KeyValueStorage, T: DeserializeOwned>(storage: &S, key: &str) -> Option<T> {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            error!("failed to read {key}: {err}");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("failed to parse {key}, using defaults: {err}");
            None
        }
    }
}

pub fn persist_data<S: KeyValueStorage>(storage: &mut S, data: &AppData) -> Result<(), StorageError> {
    let habits = serde_json::to_string(&data.habits)?;
    let logs = serde_json::to_string(&data.logs)?;
    storage.write(HABITS_KEY, &habits)?;
    storage.write(LOGS_KEY, &logs)?;
    Ok(())
}
