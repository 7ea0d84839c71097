//! Result payloads of mutating operations.
//!
//! Merge and rebase report conflicts through [`MergeOutcome`] rather than an
//! error: a conflict is an expected terminal state that the caller resolves
//! with continue/abort.

use serde::{Deserialize, Serialize};

/// Aggregate line counts from a `--stat`/`--shortstat` summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeTotals {
    pub changes: u32,
    pub insertions: u32,
    pub deletions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub commit_id: String,
    pub branch: Option<String>,
    pub summary: ChangeTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSummary {
    pub remote: String,
    pub branch: Option<String>,
    pub set_upstream: bool,
    /// The tool's own report, verbatim.
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullSummary {
    pub files: Vec<String>,
    pub summary: ChangeTotals,
    pub up_to_date: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedRef {
    pub from: String,
    pub to: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchSummary {
    pub remote: String,
    pub updated: Vec<FetchedRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleBranchReport {
    pub stale: Vec<String>,
    pub current: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchDeletion {
    pub name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    pub success: bool,
    pub conflict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub conflicted_files: Vec<String>,
}

impl MergeOutcome {
    pub fn completed() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn conflicted(message: impl Into<String>, conflicted_files: Vec<String>) -> Self {
        Self {
            success: false,
            conflict: true,
            message: Some(message.into()),
            conflicted_files,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StashEntry {
    pub index: usize,
    pub reference: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StashOutcome {
    pub action: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiffStat {
    pub path: String,
    pub insertions: u32,
    pub deletions: u32,
    pub is_binary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub files: Vec<FileDiffStat>,
    pub changed: u32,
    pub insertions: u32,
    pub deletions: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRefs {
    pub fetch: Option<String>,
    pub push: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    pub name: String,
    pub refs: RemoteRefs,
}

/// Parse a summary line such as
/// ` 3 files changed, 10 insertions(+), 2 deletions(-)`.
///
/// Returns `None` when the line is not a change summary.
pub fn parse_change_totals(line: &str) -> Option<ChangeTotals> {
    let line = line.trim();
    if !(line.contains("changed") && line.contains("file")) {
        return None;
    }

    let mut totals = ChangeTotals::default();
    for part in line.split(',') {
        let part = part.trim();
        let count = part
            .split_whitespace()
            .next()
            .and_then(|n| n.parse::<u32>().ok())?;
        if part.contains("changed") {
            totals.changes = count;
        } else if part.contains("insertion") {
            totals.insertions = count;
        } else if part.contains("deletion") {
            totals.deletions = count;
        }
    }
    Some(totals)
}
