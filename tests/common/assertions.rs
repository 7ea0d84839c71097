//! Common assertion helpers for the JSON envelope printed by git-deck

#![allow(dead_code)]

use predicates::prelude::*;
use serde_json::Value;

/// Creates a predicate that checks for a successful envelope
pub fn succeeded() -> impl Predicate<str> {
    predicates::str::contains("\"success\": true")
}

/// Creates a predicate that checks for a failed envelope of `kind`
pub fn failed_with(kind: &str) -> impl Predicate<str> {
    predicates::str::contains("\"success\": false")
        .and(predicates::str::contains(format!("\"errorKind\": \"{kind}\"")))
}

/// Parses captured stdout as the response envelope
pub fn envelope(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("stdout must be one JSON envelope")
}
