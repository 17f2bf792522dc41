//! Subprocess access to the `git` binary.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::SyncError;

/// Captured result of one git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Whether git exited with status zero.
    pub success: bool,
    /// Exit code, absent when git was killed by a signal.
    pub code: Option<i32>,
    /// Exit status description, e.g. `exit status: 1`.
    pub status: String,
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

/// A way of running git commands against one repository.
///
/// Arguments are OS strings so paths reach git unchanged, whatever their
/// encoding.
pub trait Git {
    /// Runs git with `args`, capturing output regardless of exit status.
    fn output<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<GitOutput>;

    /// Runs git with `args` attached to the terminal (editor, credential prompts).
    fn interactive<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<()>;

    /// Runs git with `args` and returns stdout, failing on non-zero exit.
    fn run<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<String> {
        let output = self.output(args)?;
        if !output.success {
            return Err(SyncError::GitFailed {
                command: command_line(args),
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            }
            .into());
        }
        Ok(output.stdout)
    }
}

/// Renders `git <args>` for diagnostics, lossily.
pub(crate) fn command_line<S: AsRef<OsStr>>(args: &[S]) -> String {
    let mut line = String::from("git");
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    line
}

/// Runs the system `git` binary in a fixed working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
    envs: Vec<(String, String)>,
}

impl GitCli {
    /// Creates a runner rooted at `workdir`.
    pub fn new<P: AsRef<Path>>(workdir: P) -> Self {
        Self {
            workdir: workdir.as_ref().to_path_buf(),
            envs: Vec::new(),
        }
    }

    /// Adds an environment variable to every invocation.
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    fn command<S: AsRef<OsStr>>(&self, args: &[S]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.workdir);
        for (k, v) in &self.envs {
            cmd.env(k, v);
        }
        cmd
    }
}

impl Git for GitCli {
    fn output<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<GitOutput> {
        debug!(workdir = %self.workdir.display(), "{}", command_line(args));

        let output = self
            .command(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute {}", command_line(args)))?;

        Ok(GitOutput {
            success: output.status.success(),
            code: output.status.code(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn interactive<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<()> {
        debug!(workdir = %self.workdir.display(), "{} (interactive)", command_line(args));

        let status = self
            .command(args)
            .status()
            .with_context(|| format!("Failed to execute {}", command_line(args)))?;

        if !status.success() {
            return Err(SyncError::GitFailed {
                command: command_line(args),
                status: status.to_string(),
                stderr: String::new(),
            }
            .into());
        }
        Ok(())
    }
}
