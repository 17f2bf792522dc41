//! Daily rolling auto-commit.

use std::fmt;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use crate::error::SyncError;
use crate::git::{query, Git};

/// Generated subject marking a machine-made commit, e.g.
/// `[Auto Commit 2022-11-30 (my_scripts)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoCommitMessage(String);

impl AutoCommitMessage {
    /// Builds the message for `date` and a home named `home_name`.
    pub fn new(date: NaiveDate, home_name: &str) -> Self {
        Self(format!(
            "[Auto Commit {} ({home_name})]",
            date.format("%Y-%m-%d")
        ))
    }

    /// Builds the message for `date` from the final segment of `home`.
    pub fn for_home(date: NaiveDate, home: &Path) -> Result<Self> {
        let name = home.file_name().ok_or_else(|| {
            SyncError::Precondition(format!("{} has no final path segment", home.display()))
        })?;
        Ok(Self::new(date, &name.to_string_lossy()))
    }

    /// Returns whether a commit with `subject` is this auto-commit.
    ///
    /// Operators may append text after the generated prefix and keep the
    /// commit eligible for absorbing further changes.
    pub fn is_prefix_of(&self, subject: &str) -> bool {
        subject.starts_with(&self.0)
    }

    /// Returns the message text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AutoCommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the compactor did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new auto-commit was created, then amended.
    Created,
    /// Today's auto-commit already was HEAD and absorbed the changes.
    Amended,
}

impl fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitOutcome::Created => write!(f, "created"),
            CommitOutcome::Amended => write!(f, "amended"),
        }
    }
}

/// Stages everything and folds it into today's auto-commit.
///
/// The head commit is always amended at the end; with `edit` the amend
/// opens the editor so the message can be reviewed. With nothing staged and
/// HEAD not today's auto-commit, `git commit` fails and so does the run.
pub fn compact<G: Git>(git: &G, message: &AutoCommitMessage, edit: bool) -> Result<CommitOutcome> {
    git.run(&["add", "-A"])?;
    let last_subject = query::last_commit_subject(git)?;

    let outcome = if message.is_prefix_of(&last_subject) {
        eprintln!("Amend the last commit");
        CommitOutcome::Amended
    } else {
        eprintln!("Create new commit");
        git.run(&["commit", "-m", message.as_str()])?;
        CommitOutcome::Created
    };

    if edit {
        git.interactive(&["commit", "--amend"])?;
    } else {
        git.interactive(&["commit", "--amend", "--no-edit"])?;
    }

    info!(%message, %outcome, "auto-commit finalized");
    Ok(outcome)
}
