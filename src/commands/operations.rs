//! Per-repository operations. Each needs `--repo <ID>`.

use super::Response;
use crate::core::error::{GitDeckError, Result};
use crate::ops::{DiffSelector, GitService, MergeOptions, RepoHandle, ResetMode, StashAction};
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum OperationCommand {
    /// Working tree and index status
    Status,
    /// Local and remote branches
    Branches,
    /// Commit history, newest first
    Log {
        /// Maximum number of commits
        #[arg(short = 'n', long)]
        max_count: Option<usize>,
    },
    /// Stage files (all changes when none are given)
    Stage { files: Vec<String> },
    /// Unstage files (everything when none are given)
    Unstage { files: Vec<String> },
    /// Discard working tree changes to files
    Discard { files: Vec<String> },
    /// Commit the staged changes
    Commit {
        #[arg(short, long, default_value = "")]
        message: String,
    },
    /// Push to a remote
    Push {
        #[arg(long)]
        remote: Option<String>,
        branch: Option<String>,
        /// Set the pushed branch's upstream
        #[arg(short = 'u', long)]
        set_upstream: bool,
    },
    /// Merge-based pull from a remote
    Pull {
        #[arg(long)]
        remote: Option<String>,
        branch: Option<String>,
    },
    /// Fetch from a remote
    Fetch {
        #[arg(long)]
        remote: Option<String>,
        branch: Option<String>,
    },
    /// Local branches with no counterpart on the remote (fetches with prune first)
    StaleBranches {
        #[arg(long)]
        remote: Option<String>,
    },
    /// Remove remote-tracking refs deleted on the remote
    Prune {
        #[arg(long)]
        remote: Option<String>,
    },
    /// Delete several branches, reporting each result
    DeleteBranches {
        names: Vec<String>,
        #[arg(short, long)]
        force: bool,
    },
    /// Create, switch, rename or delete one branch
    Branch {
        #[command(subcommand)]
        action: BranchCommand,
    },
    /// Merge a branch into the current one
    Merge {
        branch: String,
        #[arg(long)]
        no_ff: bool,
        #[arg(long)]
        ff_only: bool,
        #[arg(long)]
        squash: bool,
    },
    /// Rebase the current branch, or abort/continue one in progress
    Rebase {
        onto: Option<String>,
        #[arg(long, conflicts_with_all = ["onto", "continue_rebase"])]
        abort: bool,
        #[arg(long = "continue", conflicts_with = "onto")]
        continue_rebase: bool,
    },
    /// Stash operations
    Stash {
        #[command(subcommand)]
        action: StashCommand,
    },
    /// Tag operations
    Tag {
        #[command(subcommand)]
        action: TagCommand,
    },
    /// Move the current branch to a commit
    Reset {
        target: Option<String>,
        /// soft, mixed or hard
        #[arg(long, default_value = "mixed")]
        mode: String,
    },
    /// Revert a commit
    Revert {
        commit: String,
        #[arg(long)]
        no_commit: bool,
    },
    /// Configured remotes
    Remotes,
    /// Unified diff
    Diff(DiffArgs),
    /// Per-file insertion/deletion counts
    DiffSummary(DiffArgs),
}

#[derive(Subcommand, Debug)]
pub enum BranchCommand {
    /// Create a branch without switching to it
    Create {
        name: String,
        start_point: Option<String>,
    },
    /// Switch branches, creating one with --create or a start point
    Checkout {
        name: String,
        #[arg(short = 'b', long)]
        create: bool,
        start_point: Option<String>,
    },
    Rename { old_name: String, new_name: String },
    Delete {
        name: String,
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum StashCommand {
    Push {
        #[arg(short, long)]
        message: Option<String>,
    },
    Pop {
        #[arg(default_value_t = 0)]
        index: usize,
    },
    Apply {
        #[arg(default_value_t = 0)]
        index: usize,
    },
    Drop {
        #[arg(default_value_t = 0)]
        index: usize,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub enum TagCommand {
    /// Create a tag; annotated when a message is given
    Create {
        name: String,
        #[arg(short, long)]
        message: Option<String>,
        #[arg(long)]
        commit: Option<String>,
    },
    Delete { name: String },
    List,
}

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Limit the diff to one file
    #[arg(long)]
    file: Option<String>,
    /// Compare two commits (takes precedence over --file and --staged)
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    commits: Vec<String>,
    /// Only staged changes
    #[arg(long)]
    staged: bool,
}

impl From<DiffArgs> for DiffSelector {
    fn from(args: DiffArgs) -> Self {
        let mut commits = args.commits.into_iter();
        DiffSelector {
            file: args.file,
            commits: commits.next().zip(commits.next()),
            staged: args.staged,
        }
    }
}

pub fn execute_operation(
    service: &GitService,
    repo: Option<&str>,
    command: OperationCommand,
) -> Response {
    let handle = match open_handle(service, repo) {
        Ok(handle) => handle,
        Err(e) => return Response::failure(&e),
    };
    run(&handle, command)
}

fn open_handle<'a>(service: &'a GitService, repo: Option<&str>) -> Result<RepoHandle<'a>> {
    let id = repo
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| GitDeckError::validation("--repo <ID> is required for this command"))?;
    service.repository(id)
}

fn run(repo: &RepoHandle<'_>, command: OperationCommand) -> Response {
    match command {
        OperationCommand::Status => Response::from_result(repo.status()),
        OperationCommand::Branches => Response::from_result(repo.branches()),
        OperationCommand::Log { max_count } => Response::ok(&repo.log(max_count)),
        OperationCommand::Stage { files } => Response::from_result(repo.stage(&files)),
        OperationCommand::Unstage { files } => Response::from_result(repo.unstage(&files)),
        OperationCommand::Discard { files } => Response::from_result(repo.discard(&files)),
        OperationCommand::Commit { message } => Response::from_result(repo.commit(&message)),
        OperationCommand::Push {
            remote,
            branch,
            set_upstream,
        } => Response::from_result(repo.push(remote.as_deref(), branch.as_deref(), set_upstream)),
        OperationCommand::Pull { remote, branch } => {
            Response::from_result(repo.pull(remote.as_deref(), branch.as_deref()))
        }
        OperationCommand::Fetch { remote, branch } => {
            Response::from_result(repo.fetch(remote.as_deref(), branch.as_deref()))
        }
        OperationCommand::StaleBranches { remote } => {
            Response::from_result(repo.stale_branches(remote.as_deref()))
        }
        OperationCommand::Prune { remote } => Response::from_result(repo.prune(remote.as_deref())),
        OperationCommand::DeleteBranches { names, force } => {
            Response::from_result(repo.delete_branches(&names, force))
        }
        OperationCommand::Branch { action } => run_branch(repo, action),
        OperationCommand::Merge {
            branch,
            no_ff,
            ff_only,
            squash,
        } => Response::from_merge(repo.merge(
            &branch,
            MergeOptions {
                no_ff,
                ff_only,
                squash,
            },
        )),
        OperationCommand::Rebase {
            onto,
            abort,
            continue_rebase,
        } => {
            if abort {
                Response::from_result(repo.rebase_abort())
            } else if continue_rebase {
                Response::from_result(repo.rebase_continue())
            } else {
                Response::from_merge(repo.rebase(onto.as_deref().unwrap_or_default()))
            }
        }
        OperationCommand::Stash { action } => run_stash(repo, action),
        OperationCommand::Tag { action } => run_tag(repo, action),
        OperationCommand::Reset { target, mode } => Response::from_result(
            mode.parse::<ResetMode>()
                .and_then(|mode| repo.reset(target.as_deref(), mode)),
        ),
        OperationCommand::Revert { commit, no_commit } => {
            Response::from_result(repo.revert(&commit, no_commit))
        }
        OperationCommand::Remotes => Response::from_result(repo.remotes()),
        OperationCommand::Diff(args) => Response::from_result(repo.diff(&args.into())),
        OperationCommand::DiffSummary(args) => {
            Response::from_result(repo.diff_summary(&args.into()))
        }
    }
}

fn run_branch(repo: &RepoHandle<'_>, action: BranchCommand) -> Response {
    let result = match action {
        BranchCommand::Create { name, start_point } => {
            repo.create_branch(&name, start_point.as_deref())
        }
        BranchCommand::Checkout {
            name,
            create,
            start_point,
        } => repo.checkout_branch(&name, create, start_point.as_deref()),
        BranchCommand::Rename { old_name, new_name } => repo.rename_branch(&old_name, &new_name),
        BranchCommand::Delete { name, force } => repo.delete_branch(&name, force),
    };
    Response::from_result(result)
}

fn run_stash(repo: &RepoHandle<'_>, action: StashCommand) -> Response {
    let action = match action {
        StashCommand::List => return Response::from_result(repo.stash_list()),
        StashCommand::Push { message } => StashAction::Push { message },
        StashCommand::Pop { index } => StashAction::Pop { index },
        StashCommand::Apply { index } => StashAction::Apply { index },
        StashCommand::Drop { index } => StashAction::Drop { index },
    };
    Response::from_result(repo.stash(&action))
}

fn run_tag(repo: &RepoHandle<'_>, action: TagCommand) -> Response {
    match action {
        TagCommand::Create {
            name,
            message,
            commit,
        } => Response::from_result(repo.create_tag(&name, message.as_deref(), commit.as_deref())),
        TagCommand::Delete { name } => Response::from_result(repo.delete_tag(&name)),
        TagCommand::List => Response::from_result(repo.tags()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_args_into_selector() {
        let selector: DiffSelector = DiffArgs {
            file: Some("a.txt".into()),
            commits: vec!["HEAD~1".into(), "HEAD".into()],
            staged: false,
        }
        .into();
        assert_eq!(
            selector.commits,
            Some(("HEAD~1".to_string(), "HEAD".to_string()))
        );
        assert_eq!(selector.file.as_deref(), Some("a.txt"));
    }

    #[test]
    fn test_diff_args_without_commits() {
        let selector: DiffSelector = DiffArgs {
            file: None,
            commits: Vec::new(),
            staged: true,
        }
        .into();
        assert_eq!(selector.commits, None);
        assert!(selector.staged);
    }
}
