//! Shared test utilities for the `git` module.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::ffi::OsStr;

use anyhow::Result;

use crate::git::runner::{Git, GitOutput};

/// Fake git runner with pre-programmed responses keyed by command line.
///
/// Keys are the arguments joined by single spaces, without the leading
/// `git`, decoded lossily. When a key has several queued responses they are
/// returned in FIFO order and the last one repeats. Unknown commands return an error so a
/// test fails loudly on an unexpected invocation.
///
/// Every call, captured or interactive, is recorded in order.
#[derive(Default)]
pub(crate) struct ScriptedGit {
    responses: RefCell<HashMap<String, VecDeque<GitOutput>>>,
    failing_interactive: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedGit {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub(crate) fn respond(self, command: &str, stdout: &str) -> Self {
        self.respond_code(command, 0, stdout)
    }

    /// Queues a response with an explicit exit code.
    pub(crate) fn respond_code(self, command: &str, code: i32, stdout: &str) -> Self {
        self.responses
            .borrow_mut()
            .entry(command.to_string())
            .or_default()
            .push_back(GitOutput {
                success: code == 0,
                code: Some(code),
                status: format!("exit status: {code}"),
                stdout: stdout.to_string(),
                stderr: if code == 0 {
                    String::new()
                } else {
                    format!("fatal: scripted failure of {command}")
                },
            });
        self
    }

    /// Makes an interactive command fail.
    pub(crate) fn fail_interactive(mut self, command: &str) -> Self {
        self.failing_interactive.insert(command.to_string());
        self
    }

    /// Returns every command issued so far.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Returns whether `command` was issued.
    pub(crate) fn called(&self, command: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == command)
    }
}

fn command_key<S: AsRef<OsStr>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| arg.as_ref().to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Git for ScriptedGit {
    fn output<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<GitOutput> {
        let key = command_key(args);
        self.calls.borrow_mut().push(key.clone());

        let mut responses = self.responses.borrow_mut();
        let queue = responses
            .get_mut(&key)
            .ok_or_else(|| anyhow::anyhow!("unexpected git command: {key}"))?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| anyhow::anyhow!("no response left for: {key}"))
    }

    fn interactive<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<()> {
        let key = command_key(args);
        self.calls.borrow_mut().push(key.clone());

        if self.failing_interactive.contains(&key) {
            anyhow::bail!("scripted interactive failure of {key}");
        }
        Ok(())
    }
}
