//! Derived, per-call views of a repository.
//!
//! Everything in this module is computed fresh from the tool on each request
//! and never cached. Field names serialize in camelCase so responses keep the
//! same shape regardless of which executor produced them.
//!
//! # Public API
//! - [`StatusSnapshot`] / [`FileEntry`]: working tree and index state
//! - [`BranchSet`] / [`BranchEntry`] / [`RemoteBranchEntry`]: branch listing
//! - [`CommitRecord`]: one entry of the commit log

use crate::core::git_status::FileState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub path: String,
    /// Source path of a rename or copy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    pub index_state: Option<FileState>,
    pub working_tree_state: Option<FileState>,
}

impl FileEntry {
    pub fn is_staged(&self) -> bool {
        self.index_state.is_some()
    }

    pub fn is_unstaged(&self) -> bool {
        self.working_tree_state.is_some()
    }

    pub fn is_conflicted(&self) -> bool {
        self.index_state == Some(FileState::Conflicted)
            || self.working_tree_state == Some(FileState::Conflicted)
    }

    fn sort_priority(&self) -> u8 {
        self.index_state
            .or(self.working_tree_state)
            .map(|state| state.sort_priority())
            .unwrap_or(u8::MAX)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// `None` when HEAD is detached.
    pub current: Option<String>,
    pub tracking: Option<String>,
    pub ahead: u32,
    pub behind: u32,
    pub files: Vec<FileEntry>,
}

impl StatusSnapshot {
    pub fn staged(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.iter().filter(|f| f.is_staged())
    }

    pub fn unstaged(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.iter().filter(|f| f.is_unstaged())
    }

    pub fn file(&self, path: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn is_clean(&self) -> bool {
        self.files.is_empty()
    }

    /// Order files by priority: conflicts, staged, unstaged, untracked; then path.
    pub(crate) fn sort_files(&mut self) {
        self.files.sort_by(|a, b| {
            a.sort_priority()
                .cmp(&b.sort_priority())
                .then_with(|| a.path.cmp(&b.path))
        });
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchEntry {
    pub name: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteBranchEntry {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSet {
    /// `None` when HEAD is detached.
    pub current: Option<String>,
    pub local: Vec<BranchEntry>,
    pub remote: Vec<RemoteBranchEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub hash: String,
    pub short_hash: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub date: String,
    pub refs: Vec<String>,
}
