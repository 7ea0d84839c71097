//! Flat key/value settings blob.
//!
//! The front end owns the meaning of the keys; this store only guarantees a
//! durable, last-write-wins merge. A `null` in a patch deletes the key. Each
//! merge re-reads the document under the store's lock file, so patches from
//! other processes are never dropped.

use crate::core::error::Result;
use crate::core::store::{lock_store, read_json, write_json_atomic};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

pub type Settings = Map<String, Value>;

pub struct SettingsStore {
    store_path: PathBuf,
    values: Mutex<Settings>,
}

impl SettingsStore {
    pub fn open(store_path: impl Into<PathBuf>) -> Result<Self> {
        let store_path = store_path.into();
        let values: Settings = read_json(&store_path)?.unwrap_or_default();
        Ok(Self {
            store_path,
            values: Mutex::new(values),
        })
    }

    pub fn get(&self) -> Settings {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merge `patch` over the current settings and persist the result.
    pub fn merge(&self, patch: Settings) -> Result<Settings> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        let _lock = lock_store(&self.store_path)?;
        let mut next: Settings = read_json(&self.store_path)?.unwrap_or_default();
        for (key, value) in patch {
            if value.is_null() {
                next.remove(&key);
            } else {
                next.insert(key, value);
            }
        }

        write_json_atomic(&self.store_path, &next)?;
        *values = next.clone();
        Ok(next)
    }
}
