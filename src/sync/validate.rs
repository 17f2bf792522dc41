//! Dirty-tree validation outside the managed home.
//!
//! Walks the repository depth-first from its root. Directories on the path
//! down to the managed home are only descended into; the home itself is
//! skipped; every other entry is status-checked as a whole subtree. Unclean
//! subtrees need the operator's explicit consent before the run continues.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::error::SyncError;
use crate::git::{query, Git};
use crate::prompt::Confirm;

/// Version-control metadata directory, never walked.
const GIT_DIR_NAME: &str = ".git";

/// An unclean path outside the managed home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyPathReport {
    /// The subtree that was status-checked.
    pub path: PathBuf,
    /// Porcelain status lines for it.
    pub status: String,
}

/// Checks every subtree of `root` unrelated to `home` for uncommitted changes.
///
/// Returns the dirty paths the operator agreed to proceed with, or
/// [`SyncError::Declined`] for the first one they refused.
pub fn validate_clean<G, C>(
    git: &G,
    confirm: &mut C,
    root: &Path,
    home: &Path,
) -> Result<Vec<DirtyPathReport>>
where
    G: Git,
    C: Confirm,
{
    let mut accepted = Vec::new();
    check_path(git, confirm, root, home, &mut accepted)?;
    Ok(accepted)
}

fn check_path<G, C>(
    git: &G,
    confirm: &mut C,
    path: &Path,
    home: &Path,
    accepted: &mut Vec<DirtyPathReport>,
) -> Result<()>
where
    G: Git,
    C: Confirm,
{
    if is_same_path(path, home) {
        return Ok(());
    }

    if !home.starts_with(path) {
        let status = query::status_porcelain(git, path)?;
        if status.is_empty() {
            return Ok(());
        }

        eprintln!("{status}");
        let ok = confirm.confirm(&format!(
            "{} is not clean. Sure to proceed? [Y/N]",
            path.display()
        ))?;
        if !ok {
            warn!(path = %path.display(), "operator declined unclean path");
            return Err(SyncError::Declined {
                path: path.to_path_buf(),
            }
            .into());
        }

        accepted.push(DirtyPathReport {
            path: path.to_path_buf(),
            status,
        });
        return Ok(());
    }

    debug!(path = %path.display(), "descending towards home");
    for child in sorted_children(path)? {
        check_path(git, confirm, &child, home, accepted)?;
    }
    Ok(())
}

/// Compares two paths after resolving symlinks.
fn is_same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut children = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        if entry.file_name() == GIT_DIR_NAME {
            continue;
        }
        children.push(entry.path());
    }
    children.sort();
    Ok(children)
}
