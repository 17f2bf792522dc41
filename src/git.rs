//! Git operations and repository discovery.

pub mod query;
pub mod repository;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_utils;

pub use repository::GitRepository;
pub use runner::{Git, GitCli, GitOutput};

/// Remote name used when none is configured.
pub const DEFAULT_REMOTE: &str = "origin";
