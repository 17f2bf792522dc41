//! Repository discovery for a managed home.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::Repository;

use crate::error::SyncError;

/// Git repository wrapper located from inside a managed home.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Opens the repository containing `path`, searching parent directories.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path)
            .with_context(|| format!("Not in a git repository: {}", path.display()))?;

        Ok(Self { repo })
    }

    /// Returns the canonical top-level working tree.
    pub fn root(&self) -> Result<PathBuf> {
        let workdir = self.repo.workdir().ok_or_else(|| {
            SyncError::Precondition("bare repositories have no working tree".to_string())
        })?;

        workdir
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", workdir.display()))
    }

    /// Get current branch name
    pub fn get_current_branch(&self) -> Result<String> {
        let head = self.repo.head().context("Failed to get HEAD reference")?;

        if let Some(name) = head.shorthand() {
            if name != "HEAD" {
                return Ok(name.to_string());
            }
        }

        Err(SyncError::Precondition("repository is in detached HEAD state".to_string()).into())
    }

    /// Returns whether a remote with this name is configured.
    pub fn has_remote(&self, name: &str) -> bool {
        self.repo.find_remote(name).is_ok()
    }
}
