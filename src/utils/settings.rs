//! Settings and configuration utilities.
//!
//! This module reads settings from $HOME/.scripts-sync/settings.json and uses
//! them as a fallback for environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming the managed home.
pub const HOME_ENV: &str = "HS_HOME";

/// Environment variable naming the remote.
pub const REMOTE_ENV: &str = "HS_REMOTE";

/// Settings loaded from $HOME/.scripts-sync/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Remote to sync with.
    #[serde(default)]
    pub remote: Option<String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".scripts-sync").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) => Some(value),
            Err(_) => self.env.get(key).cloned(),
        }
    }

    /// Resolves the managed home: explicit value, `HS_HOME`, then `fallback`.
    pub fn resolve_home(&self, explicit: Option<PathBuf>, fallback: PathBuf) -> PathBuf {
        explicit
            .or_else(|| self.get_env_var(HOME_ENV).map(PathBuf::from))
            .unwrap_or(fallback)
    }

    /// Resolves the remote: explicit value, `HS_REMOTE`, settings, then `origin`.
    pub fn resolve_remote(&self, explicit: Option<String>) -> String {
        explicit
            .or_else(|| self.get_env_var(REMOTE_ENV))
            .or_else(|| self.remote.clone())
            .unwrap_or_else(|| crate::git::DEFAULT_REMOTE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn settings_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");

        let settings_json = r#"{
            "env": {
                "TEST_SYNC_VAR": "test_value"
            },
            "remote": "backup"
        }"#;
        fs::write(&settings_path, settings_json).unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();

        assert_eq!(settings.env.get("TEST_SYNC_VAR").unwrap(), "test_value");
        assert_eq!(settings.remote.as_deref(), Some("backup"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(temp_dir.path().join("absent.json")).unwrap();
        assert!(settings.env.is_empty());
        assert!(settings.remote.is_none());
    }

    #[test]
    fn malformed_file_names_the_path() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(&settings_path, "{ not json").unwrap();

        let err = Settings::load_from_path(&settings_path).unwrap_err();
        assert!(format!("{err}").contains("settings.json"));
    }

    #[test]
    fn settings_get_env_var() {
        let mut settings = Settings::default();
        settings
            .env
            .insert("TEST_SYNC_FALLBACK".to_string(), "from_settings".to_string());

        env::set_var("TEST_SYNC_FALLBACK", "from_env");
        assert_eq!(
            settings.get_env_var("TEST_SYNC_FALLBACK").unwrap(),
            "from_env"
        );

        env::remove_var("TEST_SYNC_FALLBACK");
        assert_eq!(
            settings.get_env_var("TEST_SYNC_FALLBACK").unwrap(),
            "from_settings"
        );
    }

    #[test]
    fn explicit_values_win() {
        let settings = Settings {
            env: HashMap::new(),
            remote: Some("backup".to_string()),
        };

        assert_eq!(
            settings.resolve_remote(Some("mirror".to_string())),
            "mirror"
        );
        assert_eq!(
            settings.resolve_home(Some(PathBuf::from("/x")), PathBuf::from("/cwd")),
            PathBuf::from("/x")
        );
    }
}
