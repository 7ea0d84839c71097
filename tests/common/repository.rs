//! Git repository management and setup utilities
//!
//! Provides functions for creating throwaway repositories (and bare remotes)
//! with the real `git` binary, so integration tests exercise the same tool
//! the service shells out to.

#![allow(dead_code)]

use git_deck::{GitDeckError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test repository setup result containing both the temporary directory
/// and the repository path. The TempDir must be kept alive for the duration
/// of the test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    /// Get the repository path as a reference
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A working copy cloned from a bare `origin` living in the same temporary
/// directory.
pub struct TestRemoteRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
    pub origin: PathBuf,
}

/// Runs git in `repo_path`, failing the test setup if git fails.
///
/// # Returns
///
/// The command's stdout
pub fn git(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()?;
    if !output.status.success() {
        return Err(GitDeckError::operation_failed(
            format!("git {}", args.join(" ")),
            String::from_utf8_lossy(&output.stderr),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Initializes `path` as a repository on `main` with a local identity, so
/// tests never depend on the machine's global git configuration.
pub fn init_repo(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    git(path, &["init", "-q"])?;
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    git(path, &["config", "user.name", "Test User"])?;
    git(path, &["config", "user.email", "test@example.com"])?;
    git(path, &["config", "commit.gpgsign", "false"])?;
    git(path, &["config", "tag.gpgsign", "false"])?;
    Ok(())
}

/// Sets up a fresh git repository for testing
///
/// # Returns
///
/// A `TestRepo` containing both the temporary directory (which must be kept alive)
/// and the repository path.
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let repo_path = temp_dir.path().join("work");
    init_repo(&repo_path)?;

    Ok(TestRepo {
        temp_dir,
        path: repo_path,
    })
}

/// Sets up a git repository with an initial commit containing "initial.txt"
pub fn setup_test_repo_with_initial_commit() -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    create_file(&repo.path, "initial.txt", "initial content\n")?;
    git_add(&repo.path, "initial.txt")?;
    git_commit(&repo.path, "Initial commit")?;

    Ok(repo)
}

/// Sets up a bare `origin` and a working copy tracking it, with one commit
/// pushed to `main`.
pub fn setup_repo_with_origin() -> Result<TestRemoteRepo> {
    let temp_dir = TempDir::new()?;
    let origin = temp_dir.path().join("origin.git");
    fs::create_dir_all(&origin)?;
    git(&origin, &["init", "-q", "--bare"])?;
    git(&origin, &["symbolic-ref", "HEAD", "refs/heads/main"])?;

    let path = temp_dir.path().join("work");
    init_repo(&path)?;
    create_file(&path, "initial.txt", "initial content\n")?;
    git_add(&path, "initial.txt")?;
    git_commit(&path, "Initial commit")?;
    git(&path, &["remote", "add", "origin", &*origin.to_string_lossy()])?;
    git(&path, &["push", "-q", "-u", "origin", "main"])?;

    Ok(TestRemoteRepo {
        temp_dir,
        path,
        origin,
    })
}

/// Creates a file with specified content in the repository
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let target = repo_path.join(filename);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, content)?;
    Ok(())
}

/// Adds a file to the git index ("." for all files)
pub fn git_add(repo_path: &Path, filename: &str) -> Result<()> {
    git(repo_path, &["add", filename]).map(|_| ())
}

/// Creates a git commit with the specified message
pub fn git_commit(repo_path: &Path, message: &str) -> Result<()> {
    git(repo_path, &["commit", "-q", "-m", message]).map(|_| ())
}

/// Writes, stages and commits one file
pub fn commit_file(repo_path: &Path, filename: &str, content: &str, message: &str) -> Result<()> {
    create_file(repo_path, filename, content)?;
    git_add(repo_path, filename)?;
    git_commit(repo_path, message)
}

/// Name of the checked-out branch
pub fn current_branch(repo_path: &Path) -> Result<String> {
    Ok(git(repo_path, &["rev-parse", "--abbrev-ref", "HEAD"])?
        .trim()
        .to_string())
}

/// Local branch names, sorted
pub fn local_branches(repo_path: &Path) -> Result<Vec<String>> {
    Ok(git(repo_path, &["for-each-ref", "--format=%(refname:short)", "refs/heads/"])?
        .lines()
        .map(str::to_string)
        .collect())
}
