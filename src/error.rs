//! Sync protocol errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that end a sync run.
///
/// Each variant maps to a distinct process exit code so that schedulers can
/// tell an operator decision apart from a broken repository.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Local and remote branches both carry commits the other lacks.
    #[error("branch '{branch}' has diverged from '{remote_branch}'")]
    Diverged {
        /// Local branch name.
        branch: String,
        /// Remote-tracking branch, e.g. `origin/master`.
        remote_branch: String,
    },

    /// The operator refused to proceed with an unrelated dirty path.
    #[error("{} is not clean and the operator declined to proceed", path.display())]
    Declined {
        /// The unclean path outside the managed home.
        path: PathBuf,
    },

    /// The remote modified the managed home; merging could overwrite local work.
    #[error("remote home had changed:\n{diff}")]
    RemoteHomeChanged {
        /// `git diff --stat` output against the remote-tracking branch.
        diff: String,
    },

    /// An interrupt key was pressed while waiting for confirmation.
    #[error("interrupted")]
    Interrupted,

    /// A git invocation exited unsuccessfully.
    #[error("command `{command}` exit with {status}: {stderr}")]
    GitFailed {
        /// The full command line.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The repository is not in a state the protocol can start from.
    #[error("precondition failed: {0}")]
    Precondition(String),
}

impl SyncError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::Diverged { .. } => 2,
            SyncError::Declined { .. } => 3,
            SyncError::RemoteHomeChanged { .. } => 4,
            SyncError::Interrupted => 130,
            SyncError::GitFailed { .. } | SyncError::Precondition(_) => 1,
        }
    }
}

/// Returns the exit code for an arbitrary error chain.
///
/// The first [`SyncError`] found in the chain decides; anything else is 1.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<SyncError>())
        .map_or(1, SyncError::exit_code)
}
