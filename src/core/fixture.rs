//! Fixture-backed [`VcsBackend`] for exercising executors without a real tool.
//!
//! Responses are matched on an argument prefix, first match wins, and every
//! invocation is recorded so tests can assert on what was (or was not) run.

use crate::core::backend::{ToolOutput, VcsBackend};
use crate::core::error::Result;
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct FixtureBackend {
    responses: Vec<(Vec<String>, ToolOutput)>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FixtureBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer any invocation whose arguments start with `prefix`.
    pub fn respond(mut self, prefix: &[&str], output: ToolOutput) -> Self {
        self.responses
            .push((prefix.iter().map(|s| s.to_string()).collect(), output));
        self
    }

    /// Every invocation so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Invocations whose first argument is `subcommand`.
    pub fn calls_to(&self, subcommand: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|call| call.first().map(String::as_str) == Some(subcommand))
            .collect()
    }
}

impl VcsBackend for FixtureBackend {
    fn run(&self, _workdir: &Path, args: &[String]) -> Result<ToolOutput> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(args.to_vec());

        let output = self
            .responses
            .iter()
            .find(|(prefix, _)| args.starts_with(prefix))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| ToolOutput::ok(""));
        Ok(output)
    }
}
