//! CLI interface for scripts-sync.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::git::GitCli;
use crate::prompt::KeyConfirm;
use crate::sync::{SyncContext, SyncReport, Synchronizer};
use crate::utils::{self, Settings};

/// scripts-sync: fold the day's changes in a scripts home into one commit,
/// merging the remote first when it is ahead.
#[derive(Parser)]
#[command(name = "scripts-sync")]
#[command(about = "Daily auto-commit and safe remote sync for a scripts home", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory to synchronize (defaults to $HS_HOME, then the current directory).
    #[arg(long, value_name = "PATH")]
    pub home: Option<PathBuf>,

    /// Remote to compare and pull from (defaults to $HS_REMOTE, then "origin").
    #[arg(long, value_name = "NAME")]
    pub remote: Option<String>,

    /// Finalize the commit without opening the editor.
    #[arg(long)]
    pub no_edit: bool,
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<SyncReport> {
        let settings = Settings::load()?;
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        let home = settings.resolve_home(self.home, cwd);
        let remote = settings.resolve_remote(self.remote);

        utils::check_git_cli()?;
        utils::check_home_directory(&home)?;

        let context = SyncContext::discover(&home, &remote)?;
        info!(
            home = %context.home.display(),
            root = %context.root.display(),
            branch = %context.branch,
            remote = %context.remote,
            "resolved sync context"
        );

        let git = GitCli::new(&context.root);
        let mut confirm = KeyConfirm::terminal();
        let today = chrono::Utc::now().date_naive();

        let report = Synchronizer::new(&git, &mut confirm, &context)
            .edit(!self.no_edit)
            .run(today)?;

        info!(state = %report.state, commit = %report.commit, "sync finished");
        Ok(report)
    }
}
