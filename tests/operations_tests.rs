mod common;
use common::{fixtures::*, repository::*};
use git_deck::ops::{DiffSelector, MergeOptions, StashAction};
use git_deck::{ErrorKind, FileState};
use std::sync::Arc;
use std::thread;

#[cfg(test)]
mod status_and_staging {
    use super::*;

    #[test]
    fn test_stage_one_file_leaves_other_untracked() -> anyhow::Result<()> {
        let repo = create_stage_scenario()?;
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        handle.stage(&["a.txt".to_string()])?;
        let status = handle.status()?;

        let a = status.file("a.txt").expect("a.txt in status");
        assert!(a.is_staged());
        assert_eq!(a.index_state, Some(FileState::Modified));
        assert_eq!(a.working_tree_state, None);

        let b = status.file("b.txt").expect("b.txt in status");
        assert!(!b.is_staged());
        assert_eq!(b.working_tree_state, Some(FileState::Untracked));
        Ok(())
    }

    #[test]
    fn test_status_entries_always_have_a_state() -> anyhow::Result<()> {
        let repo = create_stage_scenario()?;
        create_file(&repo.path, "nested/c.txt", "c\n")?;
        git(&repo.path, &["add", "nested/c.txt"])?;
        create_file(&repo.path, "nested/c.txt", "c changed\n")?;
        let (test_service, view) = register(&repo.path)?;

        let status = test_service.service.repository(&view.record.id)?.status()?;
        assert_eq!(status.current.as_deref(), Some("main"));
        assert_eq!((status.ahead, status.behind), (0, 0));
        assert_eq!(status.files.len(), 3);
        assert!(status
            .files
            .iter()
            .all(|f| f.index_state.is_some() || f.working_tree_state.is_some()));

        let c = status.file("nested/c.txt").expect("nested file listed");
        assert_eq!(c.index_state, Some(FileState::Added));
        assert_eq!(c.working_tree_state, Some(FileState::Modified));
        Ok(())
    }

    #[test]
    fn test_unstage_and_discard() -> anyhow::Result<()> {
        let repo = create_stage_scenario()?;
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        handle.stage(&[])?;
        assert!(handle.status()?.file("b.txt").unwrap().is_staged());

        handle.unstage(&[])?;
        let status = handle.status()?;
        assert!(status.staged().next().is_none());

        handle.discard(&["a.txt".to_string()])?;
        let status = handle.status()?;
        assert!(status.file("a.txt").is_none());
        assert_eq!(std::fs::read_to_string(repo.path.join("a.txt"))?, "first\n");
        Ok(())
    }

    #[test]
    fn test_status_on_unborn_branch() -> anyhow::Result<()> {
        let repo = setup_test_repo()?;
        create_file(&repo.path, "a.txt", "a\n")?;
        let (test_service, view) = register(&repo.path)?;

        let handle = test_service.service.repository(&view.record.id)?;
        let status = handle.status()?;
        assert_eq!(status.current.as_deref(), Some("main"));
        assert!(handle.log(None).is_empty());
        Ok(())
    }

    #[test]
    fn test_held_index_lock_is_reported() -> anyhow::Result<()> {
        let repo = create_stage_scenario()?;
        let (test_service, view) = register(&repo.path)?;
        std::fs::write(repo.path.join(".git").join("index.lock"), "")?;

        let handle = test_service.service.repository(&view.record.id)?;
        let err = handle.stage(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexLocked);

        let err = handle.commit("blocked").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexLocked);
        Ok(())
    }
}

#[cfg(test)]
mod commits_and_history {
    use super::*;

    #[test]
    fn test_empty_commit_message_creates_nothing() -> anyhow::Result<()> {
        let repo = create_stage_scenario()?;
        git(&repo.path, &["add", "-A"])?;
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;
        let before = handle.log(None).len();

        let err = handle.commit("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert_eq!(handle.log(None).len(), before);
        Ok(())
    }

    #[test]
    fn test_commit_then_log() -> anyhow::Result<()> {
        let repo = create_stage_scenario()?;
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        handle.stage(&[])?;
        let summary = handle.commit("Second commit")?;
        assert_eq!(summary.branch.as_deref(), Some("main"));
        assert_eq!(summary.summary.changes, 2);

        let log = handle.log(Some(10));
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].hash, summary.commit_id);
        assert_eq!(log[0].short_hash, &summary.commit_id[..7]);
        assert_eq!(log[0].message, "Second commit");
        assert_eq!(log[0].author_email, "test@example.com");
        assert!(log[0].refs.iter().any(|r| r.contains("main")));
        assert_eq!(log[1].message, "Add a");

        assert_eq!(handle.log(Some(1)).len(), 1);
        Ok(())
    }

    #[test]
    fn test_lightweight_tag_is_listed() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        handle.create_tag("v1.0.0", Some(""), None)?;
        assert!(handle.tags()?.contains(&"v1.0.0".to_string()));
        let object_type = git(&repo.path, &["cat-file", "-t", "v1.0.0"])?;
        assert_eq!(object_type.trim(), "commit");

        handle.create_tag("v1.1.0", Some("Release"), None)?;
        let object_type = git(&repo.path, &["cat-file", "-t", "v1.1.0"])?;
        assert_eq!(object_type.trim(), "tag");

        handle.delete_tag("v1.0.0")?;
        assert_eq!(handle.tags()?, vec!["v1.1.0"]);
        Ok(())
    }

    #[test]
    fn test_diff_and_summary() -> anyhow::Result<()> {
        let repo = create_stage_scenario()?;
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        let diff = handle.diff(&DiffSelector::default())?;
        assert!(diff.contains("+second"));

        let summary = handle.diff_summary(&DiffSelector::default())?;
        assert_eq!(summary.changed, 1);
        assert_eq!(summary.files[0].path, "a.txt");
        assert_eq!(summary.insertions, 1);

        let staged = DiffSelector {
            staged: true,
            ..DiffSelector::default()
        };
        assert!(handle.diff_summary(&staged)?.files.is_empty());
        Ok(())
    }

    #[test]
    fn test_reset_and_revert() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        commit_file(&repo.path, "a.txt", "a\n", "Add a")?;
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        handle.revert("HEAD", false)?;
        assert!(!repo.path.join("a.txt").exists());
        assert_eq!(handle.log(None).len(), 3);

        handle.reset(Some("HEAD~1"), git_deck::ops::ResetMode::Hard)?;
        assert!(repo.path.join("a.txt").exists());
        assert_eq!(handle.log(None).len(), 2);
        Ok(())
    }
}

#[cfg(test)]
mod branches_and_remotes {
    use super::*;

    #[test]
    fn test_stale_branches_with_real_remote() -> anyhow::Result<()> {
        let repo = create_stale_branch_scenario()?;
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        let first = handle.stale_branches(None)?;
        assert_eq!(first.current.as_deref(), Some("feature/current"));
        assert_eq!(first.stale, vec!["feature/gone", "local-only"]);

        let second = handle.stale_branches(Some("origin"))?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_bulk_delete_partial_failure() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        for branch in ["one", "two", "three"] {
            git(&repo.path, &["branch", branch])?;
        }
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        let names: Vec<String> = ["one", "does-not-exist", "two", "three"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let results = handle.delete_branches(&names, false)?;

        assert_eq!(results.len(), 4);
        assert_eq!(results.iter().filter(|r| r.success).count(), 3);
        assert!(!results[1].success);
        assert!(results[1].error.is_some());
        assert_eq!(local_branches(&repo.path)?, vec!["main"]);
        Ok(())
    }

    #[test]
    fn test_branch_lifecycle() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        handle.create_branch("topic", None)?;
        assert_eq!(current_branch(&repo.path)?, "main");

        handle.checkout_branch("topic", false, None)?;
        assert_eq!(current_branch(&repo.path)?, "topic");

        handle.checkout_branch("fresh", false, Some("main"))?;
        assert_eq!(current_branch(&repo.path)?, "fresh");

        handle.rename_branch("topic", "renamed")?;
        handle.delete_branch("renamed", false)?;

        let set = handle.branches()?;
        assert_eq!(set.current.as_deref(), Some("fresh"));
        let names: Vec<_> = set.local.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["fresh", "main"]);
        assert_eq!(set.local.iter().filter(|b| b.is_current).count(), 1);
        Ok(())
    }

    #[test]
    fn test_push_fetch_pull_and_remotes() -> anyhow::Result<()> {
        let remote = setup_repo_with_origin()?;
        let (test_service, view) = register(&remote.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        let remotes = handle.remotes()?;
        assert_eq!(remotes.len(), 1);
        assert_eq!(remotes[0].name, "origin");
        assert!(remotes[0].refs.push.is_some());

        handle.checkout_branch("shared", true, None)?;
        commit_file(&remote.path, "shared.txt", "shared\n", "Shared work")?;
        let pushed = handle.push(None, None, true)?;
        assert_eq!(pushed.branch.as_deref(), Some("shared"));
        let status = handle.status()?;
        assert_eq!(status.tracking.as_deref(), Some("origin/shared"));

        // A second clone advances origin/shared.
        let other = remote.temp_dir.path().join("other");
        git(
            remote.temp_dir.path(),
            &["clone", "-q", &*remote.origin.to_string_lossy(), "other"],
        )?;
        git(&other, &["config", "user.name", "Other"])?;
        git(&other, &["config", "user.email", "other@example.com"])?;
        git(&other, &["checkout", "-q", "shared"])?;
        commit_file(&other, "more.txt", "more\n", "More work")?;
        git(&other, &["push", "-q", "origin", "shared"])?;

        let fetched = handle.fetch(None, None)?;
        assert!(fetched.updated.iter().any(|r| r.to == "origin/shared"));
        assert_eq!(handle.status()?.behind, 1);

        let pulled = handle.pull(None, Some("shared"))?;
        assert!(!pulled.up_to_date);
        assert!(pulled.files.contains(&"more.txt".to_string()));

        let again = handle.pull(None, Some("shared"))?;
        assert!(again.up_to_date);
        Ok(())
    }

    #[test]
    fn test_option_like_arguments_never_reach_git() -> anyhow::Result<()> {
        let remote = setup_repo_with_origin()?;
        let (test_service, view) = register(&remote.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        let marker = remote.temp_dir.path().join("marker");
        let upload_pack = format!("--upload-pack=touch {}; git-upload-pack", marker.display());
        let err = handle.fetch(Some("origin"), Some(&upload_pack)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert!(!marker.exists());

        let written = remote.temp_dir.path().join("written.txt");
        let selector = DiffSelector {
            commits: Some((format!("--output={}", written.display()), "HEAD".into())),
            ..DiffSelector::default()
        };
        let err = handle.diff(&selector).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert!(!written.exists());

        let err = handle.create_tag("v1", None, Some("--contains")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert!(handle.tags()?.is_empty());
        Ok(())
    }
}

#[cfg(test)]
mod integration_and_stash {
    use super::*;

    #[test]
    fn test_merge_conflict_then_status() -> anyhow::Result<()> {
        let repo = create_conflict_scenario()?;
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        let outcome = handle.merge("feature", MergeOptions::default())?;
        assert!(!outcome.success);
        assert!(outcome.conflict);
        assert_eq!(outcome.conflicted_files, vec!["a.txt"]);

        let status = handle.status()?;
        assert!(status.file("a.txt").unwrap().is_conflicted());

        git(&repo.path, &["merge", "--abort"])?;
        assert!(handle.status()?.is_clean());
        Ok(())
    }

    #[test]
    fn test_clean_merge_succeeds() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        git(&repo.path, &["checkout", "-q", "-b", "feature"])?;
        commit_file(&repo.path, "f.txt", "f\n", "Feature file")?;
        git(&repo.path, &["checkout", "-q", "main"])?;
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        let options = MergeOptions {
            no_ff: true,
            ..MergeOptions::default()
        };
        let outcome = handle.merge("feature", options)?;
        assert!(outcome.success);
        assert!(!outcome.conflict);
        assert!(repo.path.join("f.txt").exists());
        Ok(())
    }

    #[test]
    fn test_rebase_conflict_then_abort() -> anyhow::Result<()> {
        let repo = create_conflict_scenario()?;
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        let outcome = handle.rebase("feature")?;
        assert!(outcome.conflict);

        handle.rebase_abort()?;
        assert_eq!(current_branch(&repo.path)?, "main");
        assert!(handle.status()?.is_clean());

        let err = handle.rebase_abort().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperationFailed);
        Ok(())
    }

    #[test]
    fn test_stash_round_trip() -> anyhow::Result<()> {
        let repo = create_stage_scenario()?;
        let (test_service, view) = register(&repo.path)?;
        let handle = test_service.service.repository(&view.record.id)?;

        handle.stash(&StashAction::Push {
            message: Some("wip".into()),
        })?;
        assert!(handle.status()?.file("a.txt").is_none());

        let entries = handle.stash_list()?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index, 0);
        assert!(entries[0].message.contains("wip"));

        handle.stash(&StashAction::Pop { index: 0 })?;
        assert!(handle.status()?.file("a.txt").is_some());
        assert!(handle.stash_list()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_concurrent_mutations_do_not_collide() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let (test_service, view) = register(&repo.path)?;
        let service = Arc::new(test_service.service);
        let id = view.record.id;

        // Unserialized, parallel `git add` calls would race for index.lock.
        let workers: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                let id = id.clone();
                let path = repo.path.clone();
                thread::spawn(move || -> git_deck::Result<()> {
                    let handle = service.repository(&id)?;
                    let name = format!("file{i}.txt");
                    std::fs::write(path.join(&name), format!("{i}\n"))?;
                    handle.stage(&[name])?;
                    handle.status()?;
                    Ok(())
                })
            })
            .collect();

        for worker in workers {
            worker.join().expect("worker panicked")?;
        }

        let handle = service.repository(&id)?;
        let status = handle.status()?;
        assert_eq!(status.staged().count(), 8);
        handle.commit("Add all files")?;
        assert_eq!(handle.log(None).len(), 2);
        Ok(())
    }
}
