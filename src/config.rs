//! Configuration loaded from `command-not-found.toml`.
//!
//! Every field has a default, so a missing default file behaves like an
//! empty one. A file named with `--config` must exist.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Compiled index read by lookups and written by the `index` binary.
    #[serde(default = "default_index")]
    pub index: PathBuf,

    /// Largest best distance still reported as a suggestion.
    #[serde(default = "default_max_distance")]
    pub max_distance: usize,

    /// Shown before the package name in install advice.
    #[serde(default = "default_install_command")]
    pub install_command: String,

    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Listings compiled into the index, in lookup order.
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Tag attached to matches; empty for the main repository.
    #[serde(default)]
    pub name: String,
    pub listing: PathBuf,
}

fn default_index() -> PathBuf {
    PathBuf::from(FINAL_INDEX_PATH)
}

fn default_max_distance() -> usize {
    MAX_SUGGEST_DISTANCE
}

fn default_install_command() -> String {
    DEFAULT_INSTALL_COMMAND.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            index: default_index(),
            max_distance: default_max_distance(),
            install_command: default_install_command(),
            log_level: default_log_level(),
            repositories: Vec::new(),
        }
    }
}

impl Config {
    /// Load the config file.
    ///
    /// A path given with `--config` must exist. Without one, the default
    /// path is read if present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = Self::resolve_path(explicit);
        if !path.exists() {
            return match explicit {
                Some(_) => Err(ConfigError::NotFound(path)),
                None => Ok(Config::default()),
            };
        }
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.install_command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "install_command must not be empty".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for repo in &self.repositories {
            if repo.listing.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "repository '{}' has an empty listing path",
                    repo.name
                )));
            }
            if !names.insert(repo.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "repository '{}' is listed more than once",
                    repo.name
                )));
            }
        }
        Ok(())
    }

    /// Resolve default or explicit config path.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}
