//! Branch state classification.

use std::fmt;

use anyhow::Result;

use crate::git::{query, Git};

/// Ancestry relationship between a local branch and its remote counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchState {
    /// Both tips are the same commit.
    UpToDate,
    /// Local has commits the remote lacks.
    Ahead,
    /// Remote has commits the local branch lacks.
    Behind,
    /// Both sides have commits the other lacks.
    Diverged,
}

impl BranchState {
    /// Derives the state from the emptiness of the ahead and behind sets.
    pub fn from_sets(ahead: bool, behind: bool) -> Self {
        match (ahead, behind) {
            (true, true) => BranchState::Diverged,
            (true, false) => BranchState::Ahead,
            (false, true) => BranchState::Behind,
            (false, false) => BranchState::UpToDate,
        }
    }
}

impl fmt::Display for BranchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchState::UpToDate => write!(f, "up_to_date"),
            BranchState::Ahead => write!(f, "ahead"),
            BranchState::Behind => write!(f, "behind"),
            BranchState::Diverged => write!(f, "diverged"),
        }
    }
}

/// Classifies `branch` against `remote_branch`.
///
/// The caller must fetch first; this only compares refs already present.
pub fn classify<G: Git>(
    git: &G,
    branch: &str,
    remote_branch: &str,
) -> Result<BranchState> {
    let ahead = !query::rev_list(git, remote_branch, branch)?.is_empty();
    let behind = !query::rev_list(git, branch, remote_branch)?.is_empty();
    Ok(BranchState::from_sets(ahead, behind))
}
