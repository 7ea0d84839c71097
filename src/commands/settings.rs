use super::Response;
use crate::core::error::{GitDeckError, Result};
use crate::core::settings::Settings;
use crate::ops::GitService;
use clap::Subcommand;
use serde_json::Value;

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Merge a JSON object into the settings; `null` values remove keys
    Set {
        /// e.g. '{"theme": "dark", "activeRepository": null}'
        patch: String,
    },
}

pub fn execute_settings(service: &GitService, action: SettingsCommand) -> Response {
    match action {
        SettingsCommand::Show => Response::ok(&service.settings()),
        SettingsCommand::Set { patch } => {
            Response::from_result(parse_patch(&patch).and_then(|p| service.update_settings(p)))
        }
    }
}

fn parse_patch(patch: &str) -> Result<Settings> {
    match serde_json::from_str::<Value>(patch) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(GitDeckError::validation("Settings patch must be a JSON object")),
        Err(e) => Err(GitDeckError::validation(format!("Invalid settings patch: {e}"))),
    }
}
