//! # scripts-sync
//!
//! Keeps a managed scripts directory in step with its remote repository.
//!
//! A run fetches, refuses to continue when the branch has diverged, asks
//! before committing over unrelated dirty subtrees, merges incoming remote
//! changes behind a stash, and folds every local change into a single
//! `[Auto Commit YYYY-MM-DD (<home>)]` commit per day.
//!
//! ## Quick Start
//!
//! ```rust
//! use scripts_sync::sync::AutoCommitMessage;
//!
//! let date = chrono::NaiveDate::from_ymd_opt(2022, 11, 30).unwrap();
//! let msg = AutoCommitMessage::new(date, "my_scripts");
//! assert_eq!(msg.as_str(), "[Auto Commit 2022-11-30 (my_scripts)]");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod error;
pub mod git;
pub mod prompt;
pub mod sync;
pub mod utils;

pub use crate::cli::Cli;
pub use crate::error::SyncError;

/// The current version of scripts-sync.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
