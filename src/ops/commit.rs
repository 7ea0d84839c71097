use super::RepoHandle;
use crate::core::error::{GitDeckError, Result};
use crate::core::outcome::{parse_change_totals, CommitSummary};

impl RepoHandle<'_> {
    /// Commit the index with `message`.
    ///
    /// A blank message is rejected before the tool is invoked.
    pub fn commit(&self, message: &str) -> Result<CommitSummary> {
        if message.trim().is_empty() {
            return Err(GitDeckError::validation("Commit message is required"));
        }

        self.write(|| {
            let stdout = self.run_checked("commit", &["commit", "-m", message])?;
            let commit_id = self
                .run_checked("rev-parse", &["rev-parse", "HEAD"])?
                .trim()
                .to_string();
            let branch = self.current_branch()?;
            let summary = stdout
                .lines()
                .find_map(parse_change_totals)
                .unwrap_or_default();

            log::info!("Committed {} on {}", commit_id, branch.as_deref().unwrap_or("HEAD"));
            Ok(CommitSummary {
                commit_id,
                branch,
                summary,
            })
        })
    }
}
