//! Read-only repository queries.
//!
//! Every function here inspects the repository through a [`Git`] runner and
//! returns a structured result. None of them touch the index, the working
//! tree or any ref.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::Result;

use crate::git::runner::Git;

/// Returns the commits reachable from `to` but not from `from`.
pub fn rev_list<G: Git>(git: &G, from: &str, to: &str) -> Result<Vec<String>> {
    let range = format!("{from}..{to}");
    let stdout = git.run(&["rev-list", range.as_str()])?;
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Returns `git status --porcelain` output restricted to `path`.
///
/// An empty string means the path has no uncommitted changes.
pub fn status_porcelain<G: Git>(git: &G, path: &Path) -> Result<String> {
    let stdout = git.run(&[
        OsStr::new("status"),
        OsStr::new("--porcelain"),
        OsStr::new("--"),
        path.as_os_str(),
    ])?;
    Ok(stdout.trim_end().to_string())
}

/// Returns `git diff --stat` between `rev` and the working tree, restricted to `path`.
pub fn diff_stat<G: Git>(git: &G, rev: &str, path: &Path) -> Result<String> {
    let stdout = git.run(&[
        OsStr::new("diff"),
        OsStr::new("--stat"),
        OsStr::new(rev),
        OsStr::new("--"),
        path.as_os_str(),
    ])?;
    Ok(stdout.trim_end().to_string())
}

/// Returns the subject line of the latest commit on HEAD.
pub fn last_commit_subject<G: Git>(git: &G) -> Result<String> {
    let stdout = git.run(&["log", "--pretty=format:%s", "--max-count", "1"])?;
    Ok(stdout.trim_end().to_string())
}

/// Returns the object id `refs/stash` points to, if any stash entry exists.
pub fn stash_top<G: Git>(git: &G) -> Result<Option<String>> {
    let output = git.output(&["rev-parse", "-q", "--verify", "refs/stash"])?;
    if output.success {
        Ok(Some(output.stdout.trim().to_string()))
    } else {
        Ok(None)
    }
}
