//! The synchronization and auto-commit protocol.
//!
//! A run fetches, classifies the branch, refuses to continue on divergence,
//! validates unrelated subtrees, merges the remote when behind and finally
//! folds all local changes into today's auto-commit. Nothing is pushed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::SyncError;
use crate::git::{Git, GitRepository};
use crate::prompt::Confirm;

pub mod commit;
pub mod merge;
pub mod state;
pub mod validate;

pub use commit::{AutoCommitMessage, CommitOutcome};
pub use merge::MergeOutcome;
pub use state::BranchState;
pub use validate::DirtyPathReport;

/// Resolved locations and names a run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncContext {
    /// Canonical managed home.
    pub home: PathBuf,
    /// Canonical top-level working tree containing `home`.
    pub root: PathBuf,
    /// Current local branch.
    pub branch: String,
    /// Remote name.
    pub remote: String,
}

impl SyncContext {
    /// Resolves the context for `home`, checking that `remote` is configured.
    pub fn discover(home: &Path, remote: &str) -> Result<Self> {
        let home = home
            .canonicalize()
            .with_context(|| format!("Failed to resolve home {}", home.display()))?;

        let repo = GitRepository::discover(&home)?;
        let root = repo.root()?;
        let branch = repo.get_current_branch()?;

        if !repo.has_remote(remote) {
            return Err(SyncError::Precondition(format!("no remote named '{remote}'")).into());
        }

        Ok(Self {
            home,
            root,
            branch,
            remote: remote.to_string(),
        })
    }

    /// Returns `<remote>/<branch>`.
    pub fn remote_branch(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Branch state observed after fetching.
    pub state: BranchState,
    /// Dirty unrelated paths the operator accepted.
    pub accepted_dirty: Vec<DirtyPathReport>,
    /// Merge result, when the branch was behind.
    pub merge: Option<MergeOutcome>,
    /// What happened to today's auto-commit.
    pub commit: CommitOutcome,
}

/// Drives one protocol run.
pub struct Synchronizer<'a, G, C> {
    git: &'a G,
    confirm: &'a mut C,
    context: &'a SyncContext,
    edit: bool,
}

impl<'a, G, C> Synchronizer<'a, G, C>
where
    G: Git,
    C: Confirm,
{
    /// Creates a synchronizer; `git` must run in `context.root`.
    pub fn new(git: &'a G, confirm: &'a mut C, context: &'a SyncContext) -> Self {
        Self {
            git,
            confirm,
            context,
            edit: true,
        }
    }

    /// Sets whether the final amend opens the editor.
    pub fn edit(mut self, edit: bool) -> Self {
        self.edit = edit;
        self
    }

    /// Runs the protocol with the auto-commit message for `today`.
    pub fn run(self, today: NaiveDate) -> Result<SyncReport> {
        let ctx = self.context;
        let remote_branch = ctx.remote_branch();

        self.git
            .run(&["fetch", "--all"])
            .context("Failed to refresh remote-tracking branches")?;

        let state = state::classify(self.git, &ctx.branch, &remote_branch)?;
        info!(%state, branch = %ctx.branch, "classified branch");
        eprintln!("branch state = {state}");

        if state == BranchState::Diverged {
            warn!(branch = %ctx.branch, remote_branch = %remote_branch, "branch is diverged");
            eprintln!("branch is diverged!");
            return Err(SyncError::Diverged {
                branch: ctx.branch.clone(),
                remote_branch,
            }
            .into());
        }

        let accepted_dirty =
            validate::validate_clean(self.git, self.confirm, &ctx.root, &ctx.home)?;

        let merge = if state == BranchState::Behind {
            Some(merge::safe_remote_merge(
                self.git,
                &ctx.home,
                &ctx.remote,
                &ctx.branch,
            )?)
        } else {
            None
        };

        let message = AutoCommitMessage::for_home(today, &ctx.home)?;
        let commit = commit::compact(self.git, &message, self.edit)?;

        Ok(SyncReport {
            state,
            accepted_dirty,
            merge,
            commit,
        })
    }
}
