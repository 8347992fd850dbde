// Project Configuration
// Optional folder-sync.yaml overrides layered over the built-in defaults

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::app_config::{AppConfig, ConfigError};

/// Project config file name looked up in the working directory
pub const PROJECT_CONFIG_NAME: &str = "folder-sync.yaml";

/// Project-level configuration.
/// Every field is optional; unset fields keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Tolerance window in seconds
    pub tolerance_secs: Option<f64>,

    /// Extra exclude patterns
    pub exclude: Vec<String>,

    /// Whether hidden entries are scanned
    pub include_hidden: Option<bool>,

    /// Whether symlinked directories are followed
    pub follow_links: Option<bool>,

    /// Back up files before overwriting them
    pub create_backups: Option<bool>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, path)
    }

    /// Load `folder-sync.yaml` from `dir` if it exists
    pub fn discover(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(PROJECT_CONFIG_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }

    /// Parse YAML content; `origin` is only used in error messages
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Overlay the fields set in this file onto `config`
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(tolerance) = self.tolerance_secs {
            config.tolerance_secs = tolerance;
        }
        config.global_excludes.extend(self.exclude.iter().cloned());
        if let Some(include_hidden) = self.include_hidden {
            config.include_hidden = include_hidden;
        }
        if let Some(follow_links) = self.follow_links {
            config.follow_links = follow_links;
        }
        if let Some(create_backups) = self.create_backups {
            config.create_backups = create_backups;
        }
    }
}
