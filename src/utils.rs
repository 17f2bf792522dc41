//! Utility functions and helpers.

pub mod preflight;
pub mod settings;

pub use preflight::{check_git_cli, check_home_directory};
pub use settings::Settings;
