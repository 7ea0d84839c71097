//! Remote synchronisation: push, pull, fetch and prune.

use super::{optional_name, require_name, RepoHandle};
use crate::core::error::{GitDeckError, Result};
use crate::core::outcome::{parse_change_totals, FetchSummary, FetchedRef, PullSummary, PushSummary};

impl RepoHandle<'_> {
    /// Push `branch` (the current upstream configuration when absent) to
    /// `remote`. With `set_upstream` the pushed branch starts tracking the
    /// remote one, which needs a branch name: the current branch is used when
    /// none is given.
    pub fn push(
        &self,
        remote: Option<&str>,
        branch: Option<&str>,
        set_upstream: bool,
    ) -> Result<PushSummary> {
        let remote = require_name("Remote name", self.remote_or_default(remote))?;
        let branch = optional_name("Branch name", branch)?;

        self.write(|| {
            let branch = match branch {
                Some(branch) => Some(branch.to_string()),
                None if set_upstream => Some(self.current_branch()?.ok_or_else(|| {
                    GitDeckError::validation("Cannot set upstream while HEAD is detached")
                })?),
                None => None,
            };

            let mut args = vec!["push".to_string()];
            if set_upstream {
                args.push("-u".to_string());
            }
            args.push(remote.to_string());
            args.extend(branch.clone());

            let output = self.invoke(&args)?;
            if !output.success {
                return Err(self.failure("push", &output));
            }
            // Push reports progress and results on stderr.
            let message = [output.stderr.trim(), output.stdout.trim()]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("\n");

            log::info!("Pushed {} to {}", branch.as_deref().unwrap_or("HEAD"), remote);
            Ok(PushSummary {
                remote: remote.to_string(),
                branch,
                set_upstream,
                message,
            })
        })
    }

    /// Merge-based pull from `remote`, optionally of one `branch`.
    pub fn pull(&self, remote: Option<&str>, branch: Option<&str>) -> Result<PullSummary> {
        let remote = require_name("Remote name", self.remote_or_default(remote))?;
        let branch = optional_name("Branch name", branch)?;

        let mut args = vec!["pull", "--no-rebase", "--stat", "--no-edit", remote];
        args.extend(branch);
        self.write(|| {
            let stdout = self.run_checked("pull", &args)?;
            Ok(parse_pull(&stdout))
        })
    }

    /// Fetch from `remote`, optionally only `branch`.
    pub fn fetch(&self, remote: Option<&str>, branch: Option<&str>) -> Result<FetchSummary> {
        let remote = require_name("Remote name", self.remote_or_default(remote))?;
        let branch = optional_name("Branch name", branch)?;

        let mut args = vec!["fetch", remote];
        args.extend(branch);
        self.write(|| {
            let output = self.invoke(&args)?;
            if !output.success {
                return Err(self.failure("fetch", &output));
            }
            let updated = parse_fetched_refs(&output.stderr)
                .into_iter()
                .chain(parse_fetched_refs(&output.stdout))
                .collect();
            Ok(FetchSummary {
                remote: remote.to_string(),
                updated,
            })
        })
    }

    /// Remove remote-tracking refs whose branch no longer exists on `remote`.
    pub fn prune(&self, remote: Option<&str>) -> Result<Vec<String>> {
        let remote = require_name("Remote name", self.remote_or_default(remote))?;
        self.write(|| {
            let stdout = self.run_checked("prune", &["remote", "prune", remote])?;
            Ok(parse_pruned(&stdout))
        })
    }
}

fn parse_pull(output: &str) -> PullSummary {
    let mut summary = PullSummary::default();
    for line in output.lines() {
        if line.contains("Already up to date") || line.contains("Already up-to-date") {
            summary.up_to_date = true;
        } else if let Some((file, _)) = line.split_once(" | ") {
            summary.files.push(file.trim().to_string());
        } else if let Some(totals) = parse_change_totals(line) {
            summary.summary = totals;
        }
    }
    summary
}

/// Parse `fetch` ref update lines such as
/// ` * [new branch]      feature    -> origin/feature` or
/// `   1a2b3c4..5d6e7f8  main       -> origin/main`.
fn parse_fetched_refs(output: &str) -> Vec<FetchedRef> {
    output
        .lines()
        .filter_map(|line| {
            let (left, to) = line.split_once(" -> ")?;
            let mut tokens = left.split_whitespace();
            let from = left.split_whitespace().last()?.to_string();

            let kind = match (left.find('['), left.find(']')) {
                (Some(open), Some(close)) if open < close => left[open + 1..close].to_string(),
                _ => {
                    let range = tokens.find(|t| t.contains(".."))?;
                    if range.contains("...") {
                        "forced update".to_string()
                    } else {
                        "fast-forward".to_string()
                    }
                }
            };

            Some(FetchedRef {
                from,
                to: to.split_whitespace().next().unwrap_or_default().to_string(),
                kind,
            })
        })
        .collect()
}

/// Ref names from ` * [pruned] origin/feature` lines.
fn parse_pruned(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("* [pruned] "))
        .map(|name| name.trim().to_string())
        .collect()
}
