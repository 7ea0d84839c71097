//! The JSON envelope every command prints.
//!
//! `{success, data?, error?, errorKind?, conflict?}`: `success` is always
//! present; `conflict` only appears for merge and rebase outcomes that stopped
//! on conflicts, which are reported with `success: false` but no `errorKind`.

use crate::core::error::{ErrorKind, GitDeckError, Result};
use crate::core::outcome::MergeOutcome;
use crate::core::output::{print_conflict, print_error};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<bool>,
}

impl Response {
    pub fn ok<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(Value::Null) => Self::empty(),
            Ok(value) => Self {
                data: Some(value),
                ..Self::empty()
            },
            Err(e) => Self::failure(&GitDeckError::from(e)),
        }
    }

    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            error_kind: None,
            conflict: None,
        }
    }

    pub fn failure(err: &GitDeckError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
            conflict: None,
        }
    }

    pub fn from_result<T: Serialize>(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(&data),
            Err(e) => Self::failure(&e),
        }
    }

    /// Like [`Response::from_result`], but a conflict outcome becomes an
    /// unsuccessful response flagged with `conflict`.
    pub fn from_merge(result: Result<MergeOutcome>) -> Self {
        match result {
            Ok(outcome) if outcome.conflict => Self {
                success: false,
                error: outcome.message.clone(),
                conflict: Some(true),
                ..Self::ok(&outcome)
            },
            other => Self::from_result(other),
        }
    }

    /// Write the envelope to stdout and a readable summary of any failure to
    /// stderr.
    pub fn print(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                log::error!("Could not serialize response: {e}");
                println!("{{\"success\":false}}");
            }
        }

        if let Some(message) = &self.error {
            if self.conflict == Some(true) {
                print_conflict(message);
            } else {
                print_error(message);
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            1
        }
    }
}
