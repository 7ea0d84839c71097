//! Test data generation utilities and predefined scenarios
//!
//! Provides functions for creating repositories in specific states, plus a
//! service whose data directory lives in its own temporary directory.

#![allow(dead_code)]

use super::repository::*;
use git_deck::{GitService, RepositoryView, Result, ServiceConfig};
use tempfile::TempDir;

/// A service over a throwaway data directory. Keep `data_dir` alive.
pub struct TestService {
    pub data_dir: TempDir,
    pub service: GitService,
}

pub fn setup_service() -> Result<TestService> {
    let data_dir = TempDir::new()?;
    let service = GitService::open(ServiceConfig::in_dir(data_dir.path()))?;
    Ok(TestService { data_dir, service })
}

/// A service with `repo` already registered
pub fn register(repo: &std::path::Path) -> Result<(TestService, RepositoryView)> {
    let test_service = setup_service()?;
    let view = test_service.service.add_repository(repo, None)?;
    Ok((test_service, view))
}

/// Scenario: `a.txt` committed then modified, `b.txt` new and untracked
pub fn create_stage_scenario() -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    commit_file(&repo.path, "a.txt", "first\n", "Add a")?;
    create_file(&repo.path, "a.txt", "first\nsecond\n")?;
    create_file(&repo.path, "b.txt", "brand new\n")?;
    Ok(repo)
}

/// Scenario: `main` and `feature` change the same line of `a.txt`;
/// `main` is checked out
pub fn create_conflict_scenario() -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    commit_file(&repo.path, "a.txt", "base\n", "Add a")?;

    git(&repo.path, &["checkout", "-q", "-b", "feature"])?;
    commit_file(&repo.path, "a.txt", "feature side\n", "Feature edit")?;

    git(&repo.path, &["checkout", "-q", "main"])?;
    commit_file(&repo.path, "a.txt", "main side\n", "Main edit")?;
    Ok(repo)
}

/// Scenario for stale branch detection, checked out on `feature/current`:
/// - `feature/pushed` exists on origin
/// - `feature/gone` was pushed, then deleted on origin
/// - `local-only` was never pushed
/// - `develop` and `Master` are local only but protected
pub fn create_stale_branch_scenario() -> Result<TestRemoteRepo> {
    let repo = setup_repo_with_origin()?;
    let path = &repo.path;

    for branch in ["feature/pushed", "feature/gone", "local-only", "develop", "Master"] {
        git(path, &["branch", branch])?;
    }
    git(path, &["push", "-q", "origin", "feature/pushed", "feature/gone"])?;
    git(path, &["push", "-q", "origin", "--delete", "feature/gone"])?;
    git(path, &["checkout", "-q", "-b", "feature/current"])?;
    Ok(repo)
}
