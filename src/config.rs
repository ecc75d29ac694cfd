//! Runtime settings.
//!
//! Layered from defaults, an optional config file, and `ARBOR_*`
//! environment variable overrides via the `config` crate.

use crate::error::ConfigError;
use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the block store and repository state.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Default log filter directive (`ARBOR_LOG` overrides it).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Repository name used when none is given.
    #[serde(default = "default_repository")]
    pub repository: String,
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "arbor")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".arbor"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_repository() -> String {
    "default".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            repository: default_repository(),
        }
    }
}

impl Settings {
    /// Load settings, merging an optional file and `ARBOR_*` variables
    /// over the defaults. A missing optional file is not an error.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .set_default("log_level", defaults.log_level)?
            .set_default("repository", defaults.repository)?;

        if let Some(file) = file {
            builder = builder.add_source(File::from(file.to_path_buf()));
        }

        let cfg = builder
            .add_source(Environment::with_prefix("ARBOR"))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// Location of the sled block store.
    pub fn blocks_path(&self) -> PathBuf {
        self.data_dir.join("blocks")
    }

    /// Location of the persisted repository state.
    pub fn repo_state_path(&self) -> PathBuf {
        self.data_dir.join("repository.bin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.repository, "default");
        assert!(settings.blocks_path().ends_with("blocks"));
        assert!(settings.repo_state_path().ends_with("repository.bin"));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.repository, "default");
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("arbor.toml");
        std::fs::write(
            &config_file,
            r#"
data_dir = "/tmp/arbor-test"
log_level = "debug"
repository = "example"
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&config_file)).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/arbor-test"));
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.repository, "example");
    }
}
