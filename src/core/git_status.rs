//! Type-safe file state enumeration.
//!
//! This module defines [`FileState`], the small fixed alphabet used for both the
//! index side and the working-tree side of a status entry. It replaces the
//! tool's one-letter porcelain codes with a proper enumeration.
//!
//! # Public API
//! - [`FileState`]: Per-side state of a file
//!
//! # Key Features
//! - **Porcelain integration**: Direct conversion from the two-letter `XY` code
//! - **Conflict detection**: Unmerged code pairs collapse to `Conflicted` on both sides
//! - **Sorting logic**: Built-in priority ordering for stable snapshots

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of one side (index or working tree) of a file entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileState {
    /// Modified file (M), type changes included (T)
    Modified,
    /// Added/new file in index (A)
    Added,
    /// Deleted file (D)
    Deleted,
    /// Renamed file (R)
    Renamed,
    /// Copied file (C)
    Copied,
    /// Untracked file (??)
    Untracked,
    /// Ignored file (!!)
    Ignored,
    /// Unmerged/conflicted file (UU, AA, DU, ...)
    Conflicted,
    /// No change on this side
    Unmodified,
}

impl FileState {
    /// Convert a single porcelain status letter
    pub fn from_code(code: char) -> Option<FileState> {
        match code {
            'M' | 'T' => Some(FileState::Modified),
            'A' => Some(FileState::Added),
            'D' => Some(FileState::Deleted),
            'R' => Some(FileState::Renamed),
            'C' => Some(FileState::Copied),
            'U' => Some(FileState::Conflicted),
            '?' => Some(FileState::Untracked),
            '!' => Some(FileState::Ignored),
            ' ' => Some(FileState::Unmodified),
            _ => None,
        }
    }

    /// Convert a porcelain `XY` pair into `(index_state, working_tree_state)`.
    ///
    /// Unmodified sides are reported as `None`. Returns `None` for codes that
    /// are not part of the porcelain alphabet.
    pub fn from_porcelain_pair(x: char, y: char) -> Option<(Option<FileState>, Option<FileState>)> {
        if is_unmerged_pair(x, y) {
            return Some((Some(FileState::Conflicted), Some(FileState::Conflicted)));
        }

        match (x, y) {
            ('?', '?') => Some((None, Some(FileState::Untracked))),
            ('!', '!') => Some((None, Some(FileState::Ignored))),
            _ => {
                let index = FileState::from_code(x)?;
                let worktree = FileState::from_code(y)?;
                Some((index.changed(), worktree.changed()))
            }
        }
    }

    fn changed(self) -> Option<FileState> {
        match self {
            FileState::Unmodified => None,
            other => Some(other),
        }
    }

    /// Sort priority for snapshot ordering: conflicts first, untracked last
    pub fn sort_priority(&self) -> u8 {
        match self {
            FileState::Conflicted => 0,
            FileState::Added => 1,
            FileState::Modified => 2,
            FileState::Deleted => 3,
            FileState::Renamed => 4,
            FileState::Copied => 5,
            FileState::Untracked => 6,
            FileState::Ignored => 7,
            FileState::Unmodified => 8,
        }
    }

    /// Get human-readable description for status
    pub fn description(&self) -> &'static str {
        match self {
            FileState::Modified => "modified",
            FileState::Added => "added",
            FileState::Deleted => "deleted",
            FileState::Renamed => "renamed",
            FileState::Copied => "copied",
            FileState::Untracked => "untracked",
            FileState::Ignored => "ignored",
            FileState::Conflicted => "conflicted",
            FileState::Unmodified => "unmodified",
        }
    }
}

/// The seven unmerged combinations from `git status --porcelain`.
fn is_unmerged_pair(x: char, y: char) -> bool {
    matches!(
        (x, y),
        ('D', 'D') | ('A', 'U') | ('U', 'D') | ('U', 'A') | ('D', 'U') | ('A', 'A') | ('U', 'U')
    )
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
