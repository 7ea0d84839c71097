//! Branch listing, lifecycle, and stale branch detection.

use super::{optional_name, require_name, RepoHandle};
use crate::core::error::{GitDeckError, Result};
use crate::core::outcome::{BranchDeletion, StaleBranchReport};
use crate::core::state::{BranchEntry, BranchSet, RemoteBranchEntry};
use std::collections::BTreeSet;

const HEADS: &str = "refs/heads/";
const REMOTES: &str = "refs/remotes/";

impl RepoHandle<'_> {
    /// Name of the checked-out branch, `None` when HEAD is detached.
    pub(crate) fn current_branch(&self) -> Result<Option<String>> {
        let output = self.invoke(&["symbolic-ref", "--quiet", "--short", "HEAD"])?;
        if output.success {
            let name = output.stdout.trim();
            return Ok((!name.is_empty()).then(|| name.to_string()));
        }
        // --quiet keeps a detached HEAD silent; anything printed is a real failure.
        if output.stderr.trim().is_empty() {
            Ok(None)
        } else {
            Err(self.failure("symbolic-ref", &output))
        }
    }

    /// Full ref names under `prefix`, in ref order.
    fn refs_under(&self, prefix: &str) -> Result<Vec<(String, bool)>> {
        let stdout = self.run_checked(
            "for-each-ref",
            &["for-each-ref", "--format=%(refname)%09%(symref)", prefix],
        )?;
        Ok(stdout
            .lines()
            .filter_map(|line| {
                let (name, symref) = line.split_once('\t').unwrap_or((line, ""));
                let name = name.trim();
                (!name.is_empty()).then(|| (name.to_string(), !symref.trim().is_empty()))
            })
            .collect())
    }

    fn local_branch_names(&self) -> Result<Vec<String>> {
        Ok(self
            .refs_under(HEADS)?
            .into_iter()
            .filter_map(|(name, _)| name.strip_prefix(HEADS).map(str::to_string))
            .collect())
    }

    pub fn branches(&self) -> Result<BranchSet> {
        self.read(|| {
            let current = self.current_branch()?;
            let local = self
                .local_branch_names()?
                .into_iter()
                .map(|name| BranchEntry {
                    is_current: current.as_deref() == Some(name.as_str()),
                    name,
                })
                .collect();
            let remote = self
                .refs_under(REMOTES)?
                .into_iter()
                .filter(|(_, is_symref)| !is_symref)
                .filter_map(|(name, _)| name.strip_prefix(REMOTES).map(str::to_string))
                .filter(|name| !name.ends_with("/HEAD"))
                .map(|name| RemoteBranchEntry { name })
                .collect();

            Ok(BranchSet {
                current,
                local,
                remote,
            })
        })
    }

    /// Create `name` at `start_point` (HEAD when absent) without switching.
    pub fn create_branch(&self, name: &str, start_point: Option<&str>) -> Result<()> {
        let name = require_name("Branch name", name)?;
        let mut args = vec!["branch", name];
        args.extend(optional_name("Start point", start_point)?);
        self.write(|| self.run_checked("branch", &args).map(|_| ()))
    }

    /// Switch to `name`. With `create` or a start point the branch is created
    /// first.
    pub fn checkout_branch(&self, name: &str, create: bool, start_point: Option<&str>) -> Result<()> {
        let name = require_name("Branch name", name)?;
        let start_point = optional_name("Start point", start_point)?;

        let mut args = vec!["checkout"];
        if create || start_point.is_some() {
            args.extend(["-b", name]);
            args.extend(start_point);
        } else {
            // The trailing "--" keeps a branch named like a tracked file a branch.
            args.extend([name, "--"]);
        }
        self.write(|| self.run_checked("checkout", &args).map(|_| ()))
    }

    pub fn rename_branch(&self, old_name: &str, new_name: &str) -> Result<()> {
        let old_name = require_name("Current branch name", old_name)?;
        let new_name = require_name("New branch name", new_name)?;
        self.write(|| {
            self.run_checked("branch rename", &["branch", "-m", old_name, new_name])
                .map(|_| ())
        })
    }

    pub fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        let name = require_name("Branch name", name)?;
        let flag = if force { "-D" } else { "-d" };
        self.write(|| self.run_checked("branch delete", &["branch", flag, name]).map(|_| ()))
    }

    /// Attempt to delete every branch in `names`, collecting one result per
    /// name. A failure never stops the remaining deletions.
    pub fn delete_branches(&self, names: &[String], force: bool) -> Result<Vec<BranchDeletion>> {
        if names.is_empty() {
            return Err(GitDeckError::validation("At least one branch name is required"));
        }
        let flag = if force { "-D" } else { "-d" };

        self.write(|| {
            let results = names
                .iter()
                .map(|name| {
                    let attempt = require_name("Branch name", name).and_then(|valid| {
                        let output = self.invoke(&["branch", flag, valid])?;
                        if output.success {
                            Ok(())
                        } else {
                            Err(self.failure("branch delete", &output))
                        }
                    });
                    match attempt {
                        Ok(()) => BranchDeletion {
                            name: name.clone(),
                            success: true,
                            error: None,
                        },
                        Err(e) => {
                            log::info!("Could not delete branch {name}: {e}");
                            BranchDeletion {
                                name: name.clone(),
                                success: false,
                                error: Some(e.to_string()),
                            }
                        }
                    }
                })
                .collect::<Vec<_>>();

            let deleted = results.iter().filter(|r| r.success).count();
            log::info!("Deleted {} of {} branches", deleted, results.len());
            Ok(results)
        })
    }

    /// Local branches with no tracking counterpart on `remote` after a
    /// fetch with prune. The current branch and protected names are never
    /// reported. Output is sorted, so repeated calls on an unchanged
    /// repository are identical.
    pub fn stale_branches(&self, remote: Option<&str>) -> Result<StaleBranchReport> {
        let remote = self.remote_or_default(remote);
        let remote = require_name("Remote name", remote)?;

        self.write(|| {
            self.run_checked("fetch", &["fetch", "--prune", remote])?;

            let current = self.current_branch()?;
            let remote_prefix = format!("{REMOTES}{remote}/");
            let tracked: BTreeSet<String> = self
                .refs_under(&remote_prefix)?
                .into_iter()
                .filter_map(|(name, _)| name.strip_prefix(&remote_prefix).map(str::to_string))
                .collect();

            let stale: BTreeSet<String> = self
                .local_branch_names()?
                .into_iter()
                .filter(|name| current.as_deref() != Some(name.as_str()))
                .filter(|name| !self.config().is_protected(name))
                .filter(|name| !tracked.contains(name))
                .collect();

            Ok(StaleBranchReport {
                stale: stale.into_iter().collect(),
                current,
            })
        })
    }
}
