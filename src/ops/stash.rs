use super::RepoHandle;
use crate::core::error::Result;
use crate::core::outcome::{StashEntry, StashOutcome};

/// One stash operation. Indices count from the most recent stash (0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StashAction {
    Push { message: Option<String> },
    Pop { index: usize },
    Apply { index: usize },
    Drop { index: usize },
}

impl Default for StashAction {
    fn default() -> Self {
        StashAction::Push { message: None }
    }
}

impl StashAction {
    pub fn name(&self) -> &'static str {
        match self {
            StashAction::Push { .. } => "push",
            StashAction::Pop { .. } => "pop",
            StashAction::Apply { .. } => "apply",
            StashAction::Drop { .. } => "drop",
        }
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec!["stash".to_string(), self.name().to_string()];
        match self {
            StashAction::Push { message } => {
                if let Some(message) = message.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
                    args.push("-m".to_string());
                    args.push(message.to_string());
                }
            }
            StashAction::Pop { index } | StashAction::Apply { index } | StashAction::Drop { index } => {
                args.push(format!("stash@{{{index}}}"));
            }
        }
        args
    }
}

impl RepoHandle<'_> {
    pub fn stash(&self, action: &StashAction) -> Result<StashOutcome> {
        let args = action.args();
        self.write(|| {
            let stdout = self.run_checked(&format!("stash {}", action.name()), &args)?;
            Ok(StashOutcome {
                action: action.name().to_string(),
                message: stdout.trim().to_string(),
            })
        })
    }

    pub fn stash_list(&self) -> Result<Vec<StashEntry>> {
        self.read(|| {
            let stdout =
                self.run_checked("stash list", &["stash", "list", "--format=%gd%x1f%gs"])?;
            Ok(parse_stash_list(&stdout))
        })
    }
}

fn parse_stash_list(output: &str) -> Vec<StashEntry> {
    output
        .lines()
        .filter_map(|line| {
            let (reference, message) = line.split_once('\x1f')?;
            let index = reference
                .strip_prefix("stash@{")?
                .strip_suffix('}')?
                .parse()
                .ok()?;
            Some(StashEntry {
                index,
                reference: reference.to_string(),
                message: message.to_string(),
            })
        })
        .collect()
}
