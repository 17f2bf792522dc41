//! Stash, pull and restore when the local branch is behind.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::error::SyncError;
use crate::git::{query, Git};

/// What a completed merge did with local changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Whether local changes were stashed and popped back.
    pub restored_stash: bool,
}

/// Pulls `remote`/`branch` into the current branch without losing local edits.
///
/// Local changes are stashed first. If `home` exists in the stashed tree and
/// the remote-tracking branch changed it, the stash is restored and
/// [`SyncError::RemoteHomeChanged`] is returned before anything is pulled.
pub fn safe_remote_merge<G: Git>(
    git: &G,
    home: &Path,
    remote: &str,
    branch: &str,
) -> Result<MergeOutcome> {
    let remote_branch = format!("{remote}/{branch}");

    git.run(&["add", "-A"])?;
    let stashed = stash_push(git)?;
    info!(stashed, "local changes stashed for merge");

    // A home that vanished with the stash was only just created.
    if home.exists() {
        let diff = query::diff_stat(git, &remote_branch, home)?;
        if !diff.is_empty() {
            warn!(home = %home.display(), "remote changed the managed home");
            eprintln!("remote home had changed!");
            eprintln!("{diff}");
            if stashed {
                git.run(&["stash", "pop"])
                    .context("Failed to restore local changes after aborting the merge")?;
            }
            return Err(SyncError::RemoteHomeChanged { diff }.into());
        }
    }

    git.interactive(&["pull", remote, branch]).with_context(|| {
        if stashed {
            format!("Pull from {remote_branch} failed; local changes remain in the stash")
        } else {
            format!("Pull from {remote_branch} failed")
        }
    })?;

    if stashed {
        git.run(&["stash", "pop"])
            .context("Failed to restore local changes on top of the pulled branch")?;
    }

    Ok(MergeOutcome {
        restored_stash: stashed,
    })
}

/// Stashes the index and working tree, returning whether an entry was created.
fn stash_push<G: Git>(git: &G) -> Result<bool> {
    let before = query::stash_top(git)?;
    git.run(&["stash"])?;
    let after = query::stash_top(git)?;
    Ok(after.is_some() && after != before)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::git::test_utils::ScriptedGit;

    const STASH_TOP: &str = "rev-parse -q --verify refs/stash";

    fn home_dir() -> (tempfile::TempDir, std::path::PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let home = temp_dir.path().join("my_scripts");
        fs::create_dir_all(&home).unwrap();
        (temp_dir, home)
    }

    fn diff_key(home: &Path) -> String {
        format!("diff --stat origin/master -- {}", home.display())
    }

    #[test]
    fn unchanged_remote_home_pulls_and_restores() {
        let (_temp_dir, home) = home_dir();
        let git = ScriptedGit::new()
            .respond("add -A", "")
            .respond_code(STASH_TOP, 1, "")
            .respond(STASH_TOP, "1111\n")
            .respond("stash", "Saved working directory")
            .respond(&diff_key(&home), "")
            .respond("stash pop", "");

        let outcome = safe_remote_merge(&git, &home, "origin", "master").unwrap();
        assert!(outcome.restored_stash);

        let calls = git.calls();
        let pull = calls.iter().position(|c| c == "pull origin master").unwrap();
        let pop = calls.iter().position(|c| c == "stash pop").unwrap();
        assert!(pull < pop);
    }

    #[test]
    fn changed_remote_home_restores_stash_and_aborts() {
        let (_temp_dir, home) = home_dir();
        let git = ScriptedGit::new()
            .respond("add -A", "")
            .respond_code(STASH_TOP, 1, "")
            .respond(STASH_TOP, "1111\n")
            .respond("stash", "Saved working directory")
            .respond(&diff_key(&home), " my_scripts/a.sh | 2 +-\n")
            .respond("stash pop", "");

        let err = safe_remote_merge(&git, &home, "origin", "master").unwrap_err();
        match err.downcast_ref::<SyncError>() {
            Some(SyncError::RemoteHomeChanged { diff }) => {
                assert_eq!(diff, " my_scripts/a.sh | 2 +-");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(git.called("stash pop"));
        assert!(!git.called("pull origin master"));
    }

    #[test]
    fn clean_tree_never_pops() {
        let (_temp_dir, home) = home_dir();
        let git = ScriptedGit::new()
            .respond("add -A", "")
            .respond(STASH_TOP, "1111\n")
            .respond("stash", "No local changes to save")
            .respond(&diff_key(&home), "");

        let outcome = safe_remote_merge(&git, &home, "origin", "master").unwrap();
        assert!(!outcome.restored_stash);
        assert!(!git.called("stash pop"));
        assert!(git.called("pull origin master"));
    }

    #[test]
    fn missing_home_skips_remote_check() {
        let temp_dir = tempfile::tempdir().unwrap();
        let home = temp_dir.path().join("not_yet_committed");
        let git = ScriptedGit::new()
            .respond("add -A", "")
            .respond_code(STASH_TOP, 1, "")
            .respond(STASH_TOP, "2222\n")
            .respond("stash", "Saved working directory")
            .respond("stash pop", "");

        safe_remote_merge(&git, &home, "origin", "master").unwrap();
        assert!(!git.called(&diff_key(&home)));
    }

    #[test]
    fn failed_pull_keeps_stash_and_reports() {
        let (_temp_dir, home) = home_dir();
        let git = ScriptedGit::new()
            .respond("add -A", "")
            .respond_code(STASH_TOP, 1, "")
            .respond(STASH_TOP, "1111\n")
            .respond("stash", "Saved working directory")
            .respond(&diff_key(&home), "")
            .fail_interactive("pull origin master");

        let err = safe_remote_merge(&git, &home, "origin", "master").unwrap_err();
        assert!(format!("{err}").contains("remain in the stash"));
        assert!(!git.called("stash pop"));
    }
}
