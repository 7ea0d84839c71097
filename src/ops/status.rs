//! Working tree and index status.
//!
//! Parses `git status --porcelain=v1 --branch -z`: a `## ` header with the
//! branch, upstream and divergence, then one NUL-terminated `XY path` record
//! per file. Renames and copies carry their source path as the next record.

use super::RepoHandle;
use crate::core::error::Result;
use crate::core::git_status::FileState;
use crate::core::state::{FileEntry, StatusSnapshot};

const STATUS_ARGS: &[&str] = &[
    "status",
    "--porcelain=v1",
    "--branch",
    "-z",
    "--untracked-files=all",
];

impl RepoHandle<'_> {
    pub fn status(&self) -> Result<StatusSnapshot> {
        self.read(|| {
            let stdout = self.run_checked("status", STATUS_ARGS)?;
            Ok(parse_status(&stdout))
        })
    }
}

pub(crate) fn parse_status(output: &str) -> StatusSnapshot {
    let mut snapshot = StatusSnapshot::default();
    let mut records = output.split('\0');

    while let Some(record) = records.next() {
        if record.is_empty() {
            continue;
        }
        if let Some(header) = record.strip_prefix("## ") {
            parse_branch_header(header, &mut snapshot);
            continue;
        }

        let mut codes = record.chars();
        let (Some(x), Some(y)) = (codes.next(), codes.next()) else {
            continue;
        };
        let Some(path) = record.get(3..).filter(|p| !p.is_empty()) else {
            log::debug!("Skipping malformed status record {record:?}");
            continue;
        };
        let Some((index_state, working_tree_state)) = FileState::from_porcelain_pair(x, y) else {
            log::debug!("Skipping unknown status code {x}{y} for {path}");
            continue;
        };

        let original_path = if matches!(x, 'R' | 'C') || matches!(y, 'R' | 'C') {
            records.next().map(str::to_string)
        } else {
            None
        };

        if index_state.is_none() && working_tree_state.is_none() {
            continue;
        }
        snapshot.files.push(FileEntry {
            path: path.to_string(),
            original_path,
            index_state,
            working_tree_state,
        });
    }

    snapshot.sort_files();
    snapshot
}

fn parse_branch_header(header: &str, snapshot: &mut StatusSnapshot) {
    // An unborn branch can still track an upstream, e.g. after cloning an
    // empty remote: "No commits yet on main...origin/main [gone]".
    let header = header
        .strip_prefix("No commits yet on ")
        .or_else(|| header.strip_prefix("Initial commit on "))
        .unwrap_or(header);
    if header.starts_with("HEAD (no branch)") {
        return;
    }

    let (refs, divergence) = match header.split_once(" [") {
        Some((refs, rest)) => (refs, rest.trim_end_matches(']')),
        None => (header, ""),
    };
    match refs.split_once("...") {
        Some((local, upstream)) => {
            snapshot.current = Some(local.to_string());
            snapshot.tracking = Some(upstream.trim().to_string());
        }
        None => snapshot.current = Some(refs.trim().to_string()),
    }

    for part in divergence.split(", ") {
        if let Some(n) = part.strip_prefix("ahead ") {
            snapshot.ahead = n.trim().parse().unwrap_or(0);
        } else if let Some(n) = part.strip_prefix("behind ") {
            snapshot.behind = n.trim().parse().unwrap_or(0);
        }
    }
}
