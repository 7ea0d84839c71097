//! Commit log and diffs.

use super::{require_name, RepoHandle};
use crate::core::error::Result;
use crate::core::outcome::{DiffSummary, FileDiffStat};
use crate::core::state::CommitRecord;
use serde::Deserialize;

const FIELD_SEP: char = '\x1f';
const RECORD_SEP: char = '\x1e';
const LOG_FORMAT: &str = "--format=%H%x1f%an%x1f%ae%x1f%aI%x1f%D%x1f%s%x1e";

/// Which changes a diff covers. When several selectors are set the most
/// specific wins: a commit pair, then a single file, then the staged changes;
/// with none set the whole working tree is compared against the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSelector {
    pub file: Option<String>,
    pub commits: Option<(String, String)>,
    #[serde(default)]
    pub staged: bool,
}

impl DiffSelector {
    fn args(&self, base: &[&str]) -> Result<Vec<String>> {
        let mut args: Vec<String> = base.iter().map(|s| s.to_string()).collect();
        if let Some((from, to)) = &self.commits {
            args.push(require_name("Diff start commit", from)?.to_string());
            args.push(require_name("Diff end commit", to)?.to_string());
        } else if let Some(file) = &self.file {
            args.push("--".to_string());
            args.push(file.clone());
        } else if self.staged {
            args.push("--cached".to_string());
        }
        Ok(args)
    }
}

impl RepoHandle<'_> {
    /// Up to `max_count` commits reachable from HEAD, newest first
    /// (the configured default when absent).
    ///
    /// A failing log yields an empty list instead of an error; see
    /// [`log_unavailable`].
    pub fn log(&self, max_count: Option<usize>) -> Vec<CommitRecord> {
        let limit = max_count.unwrap_or(self.config().default_log_limit);
        if limit == 0 {
            return Vec::new();
        }
        let max_count = format!("--max-count={limit}");

        let output = self.read(|| self.invoke(&["log", max_count.as_str(), LOG_FORMAT]));
        match output {
            Ok(output) if output.success => parse_log(&output.stdout),
            Ok(output) => log_unavailable(self, &output.failure_text()),
            Err(e) => log_unavailable(self, &e.to_string()),
        }
    }

    pub fn diff(&self, selector: &DiffSelector) -> Result<String> {
        let args = selector.args(&["diff", "--no-color", "--no-ext-diff"])?;
        self.read(|| self.run_checked("diff", &args))
    }

    pub fn diff_summary(&self, selector: &DiffSelector) -> Result<DiffSummary> {
        let args = selector.args(&["diff", "--numstat", "--no-ext-diff"])?;
        self.read(|| {
            let stdout = self.run_checked("diff summary", &args)?;
            Ok(parse_numstat(&stdout))
        })
    }
}

/// The log is treated as "nothing to show" when it cannot be read (an unborn
/// branch, a damaged history, a missing tool). The reason is still reported
/// at warn level.
fn log_unavailable(repo: &RepoHandle<'_>, reason: &str) -> Vec<CommitRecord> {
    log::warn!(
        "Log unavailable for {}, returning no commits: {}",
        repo.path().display(),
        reason.trim()
    );
    Vec::new()
}

fn parse_log(output: &str) -> Vec<CommitRecord> {
    output
        .split(RECORD_SEP)
        .map(|record| record.trim_start_matches(['\n', '\r']))
        .filter(|record| !record.trim().is_empty())
        .filter_map(|record| {
            let fields: Vec<&str> = record.splitn(6, FIELD_SEP).collect();
            let [hash, author_name, author_email, date, refs, message] = fields[..] else {
                log::debug!("Skipping malformed log record {record:?}");
                return None;
            };
            Some(CommitRecord {
                hash: hash.to_string(),
                short_hash: hash.chars().take(7).collect(),
                message: message.trim_end().to_string(),
                author_name: author_name.to_string(),
                author_email: author_email.to_string(),
                date: date.to_string(),
                refs: refs
                    .split(", ")
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
        })
        .collect()
}

fn parse_numstat(output: &str) -> DiffSummary {
    let mut summary = DiffSummary::default();
    for line in output.lines() {
        let mut parts = line.splitn(3, '\t');
        let (Some(added), Some(removed), Some(path)) = (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };

        let is_binary = added == "-" && removed == "-";
        let insertions = added.parse().unwrap_or(0);
        let deletions = removed.parse().unwrap_or(0);
        summary.changed += 1;
        summary.insertions += insertions;
        summary.deletions += deletions;
        summary.files.push(FileDiffStat {
            path: path.to_string(),
            insertions,
            deletions,
            is_binary,
        });
    }
    summary
}
