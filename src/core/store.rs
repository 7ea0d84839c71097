//! Whole-document JSON persistence.
//!
//! Both durable stores (the repository registry and the settings blob) are
//! single JSON documents rewritten wholesale on every mutation. Writes go to a
//! temporary file in the destination directory which is then renamed over the
//! target, so a concurrent reader sees either the previous document or the new
//! one, never a partial write.
//!
//! Separate processes share the stores, so every read-modify-write runs under
//! an OS-level lock on a sibling `<store>.lock` file ([`lock_store`]) and
//! re-reads the document once the lock is held. The same [`FileLock`] guards
//! repository paths across processes.

use crate::core::error::{GitDeckError, Result};
use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// An OS-level lock held on an open lock file. Released on drop.
#[derive(Debug)]
pub struct FileLock {
    _file: File,
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| GitDeckError::lock_failed(path, e))?;
    }
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
        .map_err(|e| GitDeckError::lock_failed(path, e))
}

/// Block until `path` is locked exclusively, creating the file if needed.
pub fn lock_exclusive(path: &Path) -> Result<FileLock> {
    let file = open_lock_file(path)?;
    FileExt::lock_exclusive(&file).map_err(|e| GitDeckError::lock_failed(path, e))?;
    Ok(FileLock { _file: file })
}

/// Block until `path` is locked in shared mode, creating the file if needed.
pub fn lock_shared(path: &Path) -> Result<FileLock> {
    let file = open_lock_file(path)?;
    FileExt::lock_shared(&file).map_err(|e| GitDeckError::lock_failed(path, e))?;
    Ok(FileLock { _file: file })
}

/// Exclusive lock guarding read-modify-write of the document at `store_path`.
pub fn lock_store(store_path: &Path) -> Result<FileLock> {
    lock_exclusive(&lock_path_for(store_path))
}

fn lock_path_for(store_path: &Path) -> PathBuf {
    let mut name = store_path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    store_path.with_file_name(name)
}

/// Load a JSON document, returning `None` when the file does not exist yet.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("Store {} does not exist yet", path.display());
            return Ok(None);
        }
        Err(e) => return Err(GitDeckError::store_read_failed(path, e)),
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| GitDeckError::store_parse_failed(path, e))
}

/// Serialize `value` and atomically replace the document at `path`.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| GitDeckError::store_write_failed(path, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| GitDeckError::store_write_failed(path, e))?;
    tmp.write_all(json.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| GitDeckError::store_write_failed(path, e))?;
    tmp.persist(path)
        .map_err(|e| GitDeckError::store_write_failed(path, e.error))?;

    log::debug!("Rewrote store {}", path.display());
    Ok(())
}
