//! Cheap, side-effect-free working copy detection.
//!
//! Opening a repository with `git2` only resolves its control directory; it
//! neither loads the index nor takes any lock, so this check never needs the
//! concurrency guard. Every failure (missing path, permissions, not a
//! repository, bare repository) is an expected `false`, logged at debug level.

use git2::{Repository, RepositoryOpenFlags};
use std::ffi::OsStr;
use std::path::Path;

/// True when `path` is the root of a non-bare working copy.
pub fn is_working_copy(path: &Path) -> bool {
    if !path.is_dir() {
        log::debug!("Validity: {} is not a directory", path.display());
        return false;
    }

    match Repository::open_ext(
        path,
        RepositoryOpenFlags::NO_SEARCH,
        std::iter::empty::<&OsStr>(),
    ) {
        Ok(repo) => {
            let valid = repo.workdir().is_some();
            if !valid {
                log::debug!("Validity: {} is a bare repository", path.display());
            }
            valid
        }
        Err(e) => {
            log::debug!("Validity: {} is not a working copy: {}", path.display(), e);
            false
        }
    }
}
