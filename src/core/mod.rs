//! Core building blocks for the git-deck service.
//!
//! This module provides the registry, the validity checker, the concurrency
//! guard, the tool seam, and the data types shared by every executor.

pub mod backend;
pub mod classify;
pub mod config;
pub mod dirs;
pub mod error;
pub mod fixture;
pub mod git_status;
pub mod guard;
pub mod outcome;
pub mod output;
pub mod registry;
pub mod settings;
pub mod state;
pub mod store;
pub mod validity;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{ErrorKind, GitDeckError, Result};

// === Tool seam ===
// Subprocess backend, fixture double, and failure-text classification
pub use backend::{GitCli, ToolOutput, VcsBackend};
pub use classify::{classify_failure, FailureKind};
pub use fixture::FixtureBackend;

// === Durable state ===
// Repository registry, settings blob, and service configuration
pub use config::ServiceConfig;
pub use registry::{RepositoryRecord, RepositoryRegistry, RepositoryUpdate};
pub use settings::{Settings, SettingsStore};

// === Safety ===
// Working copy detection and per-path serialization
pub use guard::RepositoryGuard;
pub use validity::is_working_copy;

// === Result shapes ===
// Per-call views and operation outcomes returned to callers
pub use git_status::FileState;
pub use outcome::{
    BranchDeletion, ChangeTotals, CommitSummary, DiffSummary, FetchSummary, FetchedRef,
    FileDiffStat, MergeOutcome, PullSummary, PushSummary, RemoteEntry, RemoteRefs,
    StaleBranchReport, StashEntry, StashOutcome,
};
pub use state::{
    BranchEntry, BranchSet, CommitRecord, FileEntry, RemoteBranchEntry, StatusSnapshot,
};

// === Output formatting ===
pub use output::{print_conflict, print_error};
