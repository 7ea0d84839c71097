//! Per-repository serialization of tool invocations.
//!
//! Each normalized repository path maps to one reader/writer lock. Mutating
//! operations take it exclusively; read-only operations share it, so they run
//! alongside each other but queue behind an in-flight mutation. Paths never
//! block one another.
//!
//! The map itself sits behind a short-lived mutex held only while fetching or
//! creating a path's lock, so two first requests for the same path always end
//! up with the same lock.
//!
//! Every CLI request is its own process, so a guard built with a lock
//! directory also takes an OS-level lock on `<lock-dir>/<path-id>.lock` in the
//! same mode, after the in-process lock. Both are released when the closure
//! returns, on every exit path.

use crate::core::error::Result;
use crate::core::store::{lock_exclusive, lock_shared, FileLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct RepositoryGuard {
    locks: Mutex<HashMap<PathBuf, Arc<RwLock<()>>>>,
    lock_dir: Option<PathBuf>,
}

impl RepositoryGuard {
    /// A guard that only serializes threads of this process.
    pub fn new() -> Self {
        Self::default()
    }

    /// A guard that also serializes other processes sharing `lock_dir`.
    pub fn with_lock_dir(lock_dir: impl Into<PathBuf>) -> Self {
        Self {
            locks: Mutex::default(),
            lock_dir: Some(lock_dir.into()),
        }
    }

    fn lock_for(&self, path: &Path) -> Arc<RwLock<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(path.to_path_buf()).or_default())
    }

    /// Lock file for `path`: a name-based UUID keeps it stable across
    /// processes and free of path separators.
    fn lock_file_path(&self, path: &Path) -> Option<PathBuf> {
        let id = Uuid::new_v5(&Uuid::NAMESPACE_URL, path.to_string_lossy().as_bytes());
        self.lock_dir
            .as_ref()
            .map(|dir| dir.join(format!("{id}.lock")))
    }

    fn file_lock(&self, path: &Path, exclusive: bool) -> Result<Option<FileLock>> {
        self.lock_file_path(path)
            .map(|lock_path| {
                log::debug!(
                    "Taking {} lock {} for {}",
                    if exclusive { "exclusive" } else { "shared" },
                    lock_path.display(),
                    path.display()
                );
                if exclusive {
                    lock_exclusive(&lock_path)
                } else {
                    lock_shared(&lock_path)
                }
            })
            .transpose()
    }

    /// Run `f` while holding the path's lock in shared mode.
    pub fn shared<T>(&self, path: &Path, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self.lock_for(path);
        let _held = lock.read().unwrap_or_else(PoisonError::into_inner);
        let _file = self.file_lock(path, false)?;
        f()
    }

    /// Run `f` while holding the path's lock exclusively.
    pub fn exclusive<T>(&self, path: &Path, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self.lock_for(path);
        let _held = lock.write().unwrap_or_else(PoisonError::into_inner);
        let _file = self.file_lock(path, true)?;
        f()
    }

    /// Number of paths that have been guarded so far.
    pub fn tracked_paths(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
