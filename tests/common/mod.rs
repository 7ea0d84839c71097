//! Shared test utilities for git-deck
//!
//! Integration tests run against real throwaway repositories created with the
//! `git` binary.

pub mod assertions;
pub mod fixtures;
pub mod repository;
