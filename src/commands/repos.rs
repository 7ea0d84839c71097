use super::Response;
use crate::core::registry::RepositoryUpdate;
use crate::ops::GitService;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ReposCommand {
    /// List registered repositories with their current validity
    List,
    /// Show one repository
    Show { id: String },
    /// Register an existing working copy
    Add {
        path: PathBuf,
        /// Display name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Rename a repository or point it at another path
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Forget a repository; the working copy is left on disk
    Remove { id: String },
    /// Clone a remote repository and register it
    Clone {
        url: String,
        target: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
}

pub fn execute_repos(service: &GitService, action: ReposCommand) -> Response {
    match action {
        ReposCommand::List => Response::ok(&service.list_repositories()),
        ReposCommand::Show { id } => Response::from_result(service.resolve(&id)),
        ReposCommand::Add { path, name } => {
            Response::from_result(service.add_repository(&path, name.as_deref()))
        }
        ReposCommand::Update { id, name, path } => {
            Response::from_result(service.update_repository(&id, RepositoryUpdate { name, path }))
        }
        ReposCommand::Remove { id } => Response::from_result(service.remove_repository(&id)),
        ReposCommand::Clone { url, target, name } => {
            Response::from_result(service.clone_repository(&url, &target, name.as_deref()))
        }
    }
}
