//! git-deck - a registry of local git working copies plus a uniform,
//! typed interface for running git operations against them.
//!
//! # Public API
//! - [`ops::GitService`]: the operation gateway; resolves repository ids and
//!   hands out [`ops::RepoHandle`]s whose methods are the executors
//! - [`core`]: registry, settings, validity checker, concurrency guard, the
//!   `VcsBackend` seam and the result types every executor returns
//! - [`commands`]: the command-line request surface and its JSON envelope

pub mod commands;
pub mod core;
pub mod ops;

// Re-export the core public API for external users
pub use core::{
    // Error handling
    ErrorKind,
    GitDeckError,
    Result,

    // Tool seam
    FixtureBackend,
    GitCli,
    ToolOutput,
    VcsBackend,

    // Durable state
    RepositoryRecord,
    RepositoryUpdate,
    ServiceConfig,

    // Result shapes
    BranchSet,
    CommitRecord,
    FileEntry,
    FileState,
    MergeOutcome,
    StatusSnapshot,
};
pub use ops::{GitService, RepoHandle, RepositoryView};
