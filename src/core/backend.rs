//! The narrow seam between executors and the version-control tool.
//!
//! Executors build argument lists and parse text; a [`VcsBackend`] only runs
//! them. [`GitCli`] shells out to the `git` binary; the fixture backend in
//! [`crate::core::fixture`] answers from canned output instead.
//!
//! # Public API
//! - [`VcsBackend`]: Run one tool invocation in a working directory
//! - [`ToolOutput`]: Exit status plus captured stdout/stderr
//! - [`GitCli`]: Subprocess implementation

use crate::core::error::{GitDeckError, Result};
use std::path::Path;
use std::process::Command;

/// Captured result of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    /// Best human-readable description of a failure. Some commands (merge,
    /// commit) report on stdout only, so both streams are kept.
    pub fn failure_text(&self) -> String {
        let stderr = self.stderr.trim();
        let stdout = self.stdout.trim();
        match (stderr.is_empty(), stdout.is_empty()) {
            (false, false) => format!("{stdout}\n{stderr}"),
            (false, true) => stderr.to_string(),
            (true, false) => stdout.to_string(),
            (true, true) => "command failed without output".to_string(),
        }
    }
}

/// Runs version-control commands. Implementations must be shareable across
/// request threads.
pub trait VcsBackend: Send + Sync {
    /// Run the tool with `args` inside `workdir`.
    ///
    /// A non-zero exit is returned as `Ok` with `success == false`; `Err` is
    /// reserved for failing to run the tool at all.
    fn run(&self, workdir: &Path, args: &[String]) -> Result<ToolOutput>;
}

/// `VcsBackend` that spawns the `git` binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl VcsBackend for GitCli {
    fn run(&self, workdir: &Path, args: &[String]) -> Result<ToolOutput> {
        log::debug!("{} {} (in {})", self.program, args.join(" "), workdir.display());

        let mut cmd = Command::new(&self.program);
        cmd.arg("-c")
            .arg("core.quotepath=false")
            .args(args)
            .current_dir(workdir)
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_EDITOR", "true")
            .env("GIT_OPTIONAL_LOCKS", "0");

        let output = cmd.output().map_err(|e| GitDeckError::ToolUnavailable {
            program: self.program.clone(),
            source: e,
        })?;

        Ok(ToolOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
