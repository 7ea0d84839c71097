//! Request surface: one `clap` subcommand per resource or operation.
//!
//! Every handler returns a [`Response`]; `main` prints it and turns it into
//! the exit code.

pub mod operations;
pub mod repos;
pub mod response;
pub mod settings;

pub use operations::{execute_operation, OperationCommand};
pub use repos::{execute_repos, ReposCommand};
pub use response::Response;
pub use settings::{execute_settings, SettingsCommand};

use crate::ops::GitService;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage registered repositories
    Repos {
        #[command(subcommand)]
        action: ReposCommand,
    },
    /// Read or merge-update the settings blob
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    #[command(flatten)]
    Operation(OperationCommand),
}

pub fn execute(service: &GitService, repo: Option<&str>, command: Commands) -> Response {
    match command {
        Commands::Repos { action } => execute_repos(service, action),
        Commands::Settings { action } => execute_settings(service, action),
        Commands::Operation(operation) => execute_operation(service, repo, operation),
    }
}
