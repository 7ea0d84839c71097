//! Moving changes between the working tree and the index.

use super::RepoHandle;
use crate::core::error::{GitDeckError, Result};

/// `base`, followed by `-- files` when any files are given.
fn with_pathspec(base: &[&str], files: &[String]) -> Vec<String> {
    let mut args: Vec<String> = base.iter().map(|s| s.to_string()).collect();
    if !files.is_empty() {
        args.push("--".to_string());
        args.extend(files.iter().cloned());
    }
    args
}

impl RepoHandle<'_> {
    /// Stage `files`, or every change when `files` is empty.
    pub fn stage(&self, files: &[String]) -> Result<()> {
        let args = with_pathspec(&["add", "-A"], files);
        self.write(|| self.run_checked("stage", &args).map(|_| ()))
    }

    /// Unstage `files`, or everything when `files` is empty. The working tree
    /// is left alone.
    pub fn unstage(&self, files: &[String]) -> Result<()> {
        let args = with_pathspec(&["reset", "-q"], files);
        self.write(|| self.run_checked("unstage", &args).map(|_| ()))
    }

    /// Throw away working tree changes to `files`, restoring them from the
    /// index. An explicit list is required.
    pub fn discard(&self, files: &[String]) -> Result<()> {
        if files.iter().all(|f| f.trim().is_empty()) {
            return Err(GitDeckError::validation(
                "At least one file is required to discard changes",
            ));
        }
        let args = with_pathspec(&["checkout"], files);
        self.write(|| self.run_checked("discard", &args).map(|_| ()))
    }
}
