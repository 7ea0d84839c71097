//! Merge and rebase.
//!
//! Both can stop on conflicts, which is an expected outcome rather than an
//! error: the caller gets a [`MergeOutcome`] with `conflict` set and the list
//! of unmerged paths, and the repository lock is released as usual.

use super::{require_name, RepoHandle};
use crate::core::classify::{classify_failure, FailureKind};
use crate::core::error::{GitDeckError, Result};
use crate::core::outcome::MergeOutcome;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOptions {
    #[serde(default)]
    pub no_ff: bool,
    #[serde(default)]
    pub ff_only: bool,
    #[serde(default)]
    pub squash: bool,
}

impl MergeOptions {
    fn flags(&self) -> Result<Vec<&'static str>> {
        if self.ff_only && (self.no_ff || self.squash) {
            return Err(GitDeckError::validation(
                "--ff-only cannot be combined with --no-ff or --squash",
            ));
        }
        if self.squash && self.no_ff {
            return Err(GitDeckError::validation("--squash cannot be combined with --no-ff"));
        }

        let mut flags = Vec::new();
        if self.no_ff {
            flags.push("--no-ff");
        }
        if self.ff_only {
            flags.push("--ff-only");
        }
        if self.squash {
            flags.push("--squash");
        }
        Ok(flags)
    }
}

impl RepoHandle<'_> {
    pub fn merge(&self, branch: &str, options: MergeOptions) -> Result<MergeOutcome> {
        let branch = require_name("Branch name", branch)?;
        let mut args = vec!["merge"];
        args.extend(options.flags()?);
        args.extend(["--no-edit", branch]);
        self.write(|| self.integrate("merge", &args))
    }

    /// Rebase the current branch onto `onto`.
    pub fn rebase(&self, onto: &str) -> Result<MergeOutcome> {
        let onto = require_name("Rebase target", onto)?;
        self.write(|| self.integrate("rebase", &["rebase", onto]))
    }

    pub fn rebase_abort(&self) -> Result<()> {
        self.write(|| self.run_checked("rebase abort", &["rebase", "--abort"]).map(|_| ()))
    }

    pub fn rebase_continue(&self) -> Result<()> {
        self.write(|| {
            self.run_checked("rebase continue", &["rebase", "--continue"])
                .map(|_| ())
        })
    }

    /// Run a merge-like command, turning a conflict into an outcome.
    fn integrate(&self, operation: &str, args: &[&str]) -> Result<MergeOutcome> {
        let output = self.invoke(args)?;
        if output.success {
            return Ok(MergeOutcome::completed());
        }

        let text = output.failure_text();
        match classify_failure(&text) {
            FailureKind::Conflict => {
                let files = self.conflicted_files();
                log::info!(
                    "{} stopped on conflicts in {} file(s) at {}",
                    operation,
                    files.len(),
                    self.path().display()
                );
                Ok(MergeOutcome::conflicted(text, files))
            }
            FailureKind::IndexLocked | FailureKind::Other => Err(self.failure(operation, &output)),
        }
    }

    /// Paths left unmerged. Best effort: the conflict outcome stands even if
    /// the list cannot be read.
    fn conflicted_files(&self) -> Vec<String> {
        match self.invoke(&["diff", "--name-only", "--diff-filter=U"]) {
            Ok(output) if output.success => output
                .stdout
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Ok(output) => {
                log::debug!("Could not list conflicted files: {}", output.failure_text());
                Vec::new()
            }
            Err(e) => {
                log::debug!("Could not list conflicted files: {e}");
                Vec::new()
            }
        }
    }
}
