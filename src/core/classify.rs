//! Best-effort classification of the tool's failure text.
//!
//! The tool reports lock contention and merge/rebase conflicts only as free
//! text, so they are recognised by substring markers. The subprocess runs under
//! `LC_ALL=C`, which keeps these markers stable; anything that matches no
//! marker is reported as a generic failure rather than guessed at.

/// What a failed invocation turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    IndexLocked,
    Conflict,
    Other,
}

// Only a lock file that already exists counts; other failures to create a
// file (permissions, a full disk) are generic.
const LOCK_MARKERS: &[&str] = &[
    "another git process seems to be running",
    ".lock': file exists",
];

const CONFLICT_MARKERS: &[&str] = &[
    "conflict (",
    "automatic merge failed",
    "could not apply",
    "resolve all conflicts manually",
    "fix conflicts and then commit",
    "merge conflict in",
];

/// True when the text reports a held lock file.
pub fn is_lock_failure(text: &str) -> bool {
    let lower = text.to_lowercase();
    LOCK_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// True when the text reports merge or rebase conflicts.
pub fn is_conflict_failure(text: &str) -> bool {
    let lower = text.to_lowercase();
    CONFLICT_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Classify failure text. Lock contention wins over conflicts: a merge that
/// could not take the lock never got far enough to conflict.
pub fn classify_failure(text: &str) -> FailureKind {
    if is_lock_failure(text) {
        FailureKind::IndexLocked
    } else if is_conflict_failure(text) {
        FailureKind::Conflict
    } else {
        FailureKind::Other
    }
}
