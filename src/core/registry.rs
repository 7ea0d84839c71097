//! Durable registry of known repositories.
//!
//! The registry owns the list of [`RepositoryRecord`]s and the JSON document
//! that persists it. Every mutation takes the store's lock file, re-reads the
//! document (another process may have changed it since `open`), computes the
//! next list on a copy, writes it atomically, and only then swaps it in, so a
//! failed write leaves both the file and the in-memory list unchanged.
//!
//! # Invariants
//! - No two records share the same normalized path
//! - A path is validated as a working copy before it is persisted
//! - Removing a record never touches the working copy on disk

use crate::core::backend::VcsBackend;
use crate::core::dirs::{default_display_name, normalize_path};
use crate::core::error::{GitDeckError, Result};
use crate::core::store::{lock_store, read_json, write_json_atomic, FileLock};
use crate::core::validity::is_working_copy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRecord {
    pub id: String,
    pub path: PathBuf,
    pub display_name: String,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_source: Option<String>,
}

/// Fields that `update` may change; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryUpdate {
    pub name: Option<String>,
    pub path: Option<PathBuf>,
}

pub struct RepositoryRegistry {
    store_path: PathBuf,
    records: Mutex<Vec<RepositoryRecord>>,
}

impl RepositoryRegistry {
    /// Load the registry document at `store_path`; a missing file is an empty
    /// registry.
    pub fn open(store_path: impl Into<PathBuf>) -> Result<Self> {
        let store_path = store_path.into();
        let records: Vec<RepositoryRecord> = read_json(&store_path)?.unwrap_or_default();
        log::debug!(
            "Loaded {} repositories from {}",
            records.len(),
            store_path.display()
        );
        Ok(Self {
            store_path,
            records: Mutex::new(records),
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    fn records(&self) -> MutexGuard<'_, Vec<RepositoryRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the store against other processes and refresh the list from disk.
    /// Mutations hold both until they return.
    fn lock_latest(&self) -> Result<(FileLock, MutexGuard<'_, Vec<RepositoryRecord>>)> {
        let mut records = self.records();
        let lock = lock_store(&self.store_path)?;
        *records = read_json(&self.store_path)?.unwrap_or_default();
        Ok((lock, records))
    }

    pub fn list(&self) -> Vec<RepositoryRecord> {
        self.records().clone()
    }

    pub fn get(&self, id: &str) -> Result<RepositoryRecord> {
        self.records()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| GitDeckError::not_found(id))
    }

    /// Register an existing working copy.
    pub fn add(&self, path: &Path, name: Option<&str>) -> Result<RepositoryRecord> {
        self.insert(path, name, None)
    }

    /// Drop the record for `id`. The working copy is left untouched.
    pub fn remove(&self, id: &str) -> Result<RepositoryRecord> {
        let (_lock, mut records) = self.lock_latest()?;
        let position = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| GitDeckError::not_found(id))?;

        let mut next = records.clone();
        let removed = next.remove(position);
        self.persist(&next)?;
        *records = next;

        log::info!("Removed repository {} ({})", removed.display_name, removed.id);
        Ok(removed)
    }

    pub fn update(&self, id: &str, changes: RepositoryUpdate) -> Result<RepositoryRecord> {
        let (_lock, mut records) = self.lock_latest()?;
        let position = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| GitDeckError::not_found(id))?;

        let mut next = records.clone();

        if let Some(name) = changes.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(GitDeckError::validation("Display name must not be empty"));
            }
            next[position].display_name = name.to_string();
        }

        if let Some(path) = changes.path {
            let path = normalize_path(&path)?;
            if !is_working_copy(&path) {
                return Err(GitDeckError::invalid_path(path));
            }
            if records.iter().any(|r| r.id != id && r.path == path) {
                return Err(GitDeckError::duplicate(path));
            }
            next[position].path = path;
        }

        let updated = next[position].clone();
        self.persist(&next)?;
        *records = next;
        Ok(updated)
    }

    /// Clone `url` into `target` with `backend` and register the result.
    ///
    /// When `target` did not exist beforehand, a failed clone removes whatever
    /// partial directory it left behind; a pre-existing directory is never
    /// deleted.
    pub fn clone_from(
        &self,
        backend: &dyn VcsBackend,
        url: &str,
        target: &Path,
        name: Option<&str>,
    ) -> Result<RepositoryRecord> {
        if url.trim().is_empty() {
            return Err(GitDeckError::validation("Clone URL is required"));
        }
        let target = normalize_path(target)?;
        if self.records().iter().any(|r| r.path == target) {
            return Err(GitDeckError::duplicate(target));
        }

        let parent = target
            .parent()
            .ok_or_else(|| GitDeckError::invalid_path(&target))?
            .to_path_buf();
        std::fs::create_dir_all(&parent)?;
        let existed = target.exists();

        let args = vec![
            "clone".to_string(),
            "--".to_string(),
            url.to_string(),
            target.to_string_lossy().into_owned(),
        ];
        let outcome = backend.run(&parent, &args).and_then(|output| {
            if output.success {
                Ok(())
            } else {
                Err(GitDeckError::clone_failed(url, output.failure_text()))
            }
        });

        if let Err(e) = outcome {
            if !existed && target.exists() {
                log::info!("Removing partial clone at {}", target.display());
                if let Err(cleanup) = std::fs::remove_dir_all(&target) {
                    log::warn!(
                        "Could not remove partial clone {}: {}",
                        target.display(),
                        cleanup
                    );
                }
            }
            return Err(match e {
                GitDeckError::CloneFailed { .. } => e,
                other => GitDeckError::clone_failed(url, other.to_string()),
            });
        }

        self.insert(&target, name, Some(url.to_string()))
    }

    fn insert(
        &self,
        path: &Path,
        name: Option<&str>,
        clone_source: Option<String>,
    ) -> Result<RepositoryRecord> {
        let path = normalize_path(path)?;
        if !is_working_copy(&path) {
            return Err(GitDeckError::invalid_path(path));
        }

        let (_lock, mut records) = self.lock_latest()?;
        if records.iter().any(|r| r.path == path) {
            return Err(GitDeckError::duplicate(path));
        }

        let display_name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_display_name(&path));

        let record = RepositoryRecord {
            id: Uuid::new_v4().to_string(),
            path,
            display_name,
            added_at: Utc::now(),
            clone_source,
        };

        let mut next = records.clone();
        next.push(record.clone());
        self.persist(&next)?;
        *records = next;

        log::info!(
            "Registered repository {} at {}",
            record.display_name,
            record.path.display()
        );
        Ok(record)
    }

    fn persist(&self, records: &[RepositoryRecord]) -> Result<()> {
        write_json_atomic(&self.store_path, &records)
    }
}
