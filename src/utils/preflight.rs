//! Preflight validation checks for early failure detection
//!
//! These run before the protocol touches the repository so that a missing
//! tool or a misplaced home fails fast with a clear message.

use std::path::Path;

use anyhow::{bail, Result};

/// Validate the `git` binary is installed and in PATH
pub fn check_git_cli() -> Result<()> {
    let git_check = std::process::Command::new("git")
        .args(["--version"])
        .output();

    match git_check {
        Ok(output) if output.status.success() => Ok(()),
        _ => bail!(
            "git is not installed or not in PATH.\n\
             Please install it from https://git-scm.com/"
        ),
    }
}

/// Validate the managed home exists and is a directory
pub fn check_home_directory(home: &Path) -> Result<()> {
    if !home.exists() {
        bail!("Home directory does not exist: {}", home.display());
    }
    if !home.is_dir() {
        bail!("Home is not a directory: {}", home.display());
    }
    Ok(())
}
