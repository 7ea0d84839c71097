use super::{require_name, RepoHandle};
use crate::core::error::{GitDeckError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetMode {
    Soft,
    #[default]
    Mixed,
    Hard,
}

impl ResetMode {
    fn flag(self) -> &'static str {
        match self {
            ResetMode::Soft => "--soft",
            ResetMode::Mixed => "--mixed",
            ResetMode::Hard => "--hard",
        }
    }
}

impl fmt::Display for ResetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flag()[2..])
    }
}

impl FromStr for ResetMode {
    type Err = GitDeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soft" => Ok(ResetMode::Soft),
            "mixed" | "" => Ok(ResetMode::Mixed),
            "hard" => Ok(ResetMode::Hard),
            other => Err(GitDeckError::validation(format!(
                "Unknown reset mode '{other}' (expected soft, mixed or hard)"
            ))),
        }
    }
}

impl RepoHandle<'_> {
    /// Move the current branch to `target` (HEAD when absent).
    pub fn reset(&self, target: Option<&str>, mode: ResetMode) -> Result<()> {
        let target = match target.map(str::trim).filter(|t| !t.is_empty()) {
            Some(target) => require_name("Reset target", target)?,
            None => "HEAD",
        };
        self.write(|| {
            self.run_checked("reset", &["reset", "-q", mode.flag(), target])?;
            log::info!("Reset {} to {} ({})", self.path().display(), target, mode);
            Ok(())
        })
    }

    /// Revert `commit`. With `no_commit` the inverse changes are only staged.
    pub fn revert(&self, commit: &str, no_commit: bool) -> Result<()> {
        let commit = require_name("Commit", commit)?;
        let flag = if no_commit { "--no-commit" } else { "--no-edit" };
        self.write(|| self.run_checked("revert", &["revert", flag, commit]).map(|_| ()))
    }
}
