//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`GitDeckError`], the single failure type returned by the
//! registry, the operation gateway and every executor. It uses `thiserror` for
//! ergonomic definitions and carries helper constructors for the common cases.
//!
//! # Public API
//! - [`GitDeckError`]: Main error enum covering all failure modes
//! - [`ErrorKind`]: Stable, serializable classification sent to callers
//! - [`Result<T>`]: Type alias for `std::result::Result<T, GitDeckError>`
//!
//! # Error Categories
//! - **Registry**: unknown id, invalid path, duplicate path, clone failure
//! - **Tool failures**: lock contention, generic operation failure
//! - **Validation**: caller-supplied parameter missing or malformed
//! - **Storage**: reading, parsing or atomically rewriting the JSON stores,
//!   and taking the lock files that serialize processes

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for git-deck
#[derive(Error, Debug)]
pub enum GitDeckError {
    // Registry errors
    #[error("Repository not found: {id}")]
    NotFound { id: String },

    #[error("Not a valid git working copy: {path}")]
    InvalidPath { path: PathBuf },

    #[error("Repository already registered: {path}")]
    Duplicate { path: PathBuf },

    #[error("Failed to clone '{url}': {message}")]
    CloneFailed { url: String, message: String },

    // Tool errors
    #[error("Repository index is locked: {message}")]
    IndexLocked { message: String },

    #[error("{operation} failed: {message}")]
    OperationFailed { operation: String, message: String },

    #[error("Could not run '{program}': {source}")]
    ToolUnavailable {
        program: String,
        source: std::io::Error,
    },

    // Caller errors
    #[error("{message}")]
    Validation { message: String },

    // Storage errors
    #[error("Failed to read store '{path}': {source}")]
    StoreReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse store '{path}': {source}")]
    StoreParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write store '{path}': {source}")]
    StoreWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to lock '{path}': {source}")]
    LockFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Classification of a failure as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    NotFound,
    InvalidPath,
    Duplicate,
    IndexLocked,
    ValidationError,
    OperationFailed,
}

/// Convenience type alias for Results using GitDeckError
pub type Result<T> = std::result::Result<T, GitDeckError>;

impl GitDeckError {
    /// Create a not found error for a repository id
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    /// Create a duplicate path error
    pub fn duplicate(path: impl Into<PathBuf>) -> Self {
        Self::Duplicate { path: path.into() }
    }

    /// Create a validation error with a caller-facing message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an index locked error preserving the tool's message
    pub fn index_locked(message: impl Into<String>) -> Self {
        Self::IndexLocked {
            message: message.into(),
        }
    }

    /// Create a generic operation failure preserving the tool's message
    pub fn operation_failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a clone failure error
    pub fn clone_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CloneFailed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a store read failure
    pub fn store_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a store parse failure
    pub fn store_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::StoreParseFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a store write failure
    pub fn store_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreWriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a lock file failure
    pub fn lock_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LockFailed {
            path: path.into(),
            source,
        }
    }

    /// The caller-facing classification of this error.
    ///
    /// Clone, storage and spawn failures are all generic operation failures.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidPath { .. } => ErrorKind::InvalidPath,
            Self::Duplicate { .. } => ErrorKind::Duplicate,
            Self::IndexLocked { .. } => ErrorKind::IndexLocked,
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::CloneFailed { .. }
            | Self::OperationFailed { .. }
            | Self::ToolUnavailable { .. }
            | Self::StoreReadFailed { .. }
            | Self::StoreParseFailed { .. }
            | Self::StoreWriteFailed { .. }
            | Self::LockFailed { .. }
            | Self::Io(_)
            | Self::Json(_) => ErrorKind::OperationFailed,
        }
    }
}
