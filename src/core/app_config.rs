// Application Configuration
// Effective settings for one sync run, built from defaults, the project file and flags

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::operations::{Differ, ScanOptions, SyncOptions, DEFAULT_TOLERANCE_SECS};
use crate::operations::sync::BACKUP_SUFFIX;

/// Configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Tolerance must be a non-negative number of seconds, got {0}")]
    InvalidTolerance(f64),
}

/// Settings for a sync run
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Modification times closer than this are considered equal
    pub tolerance_secs: f64,

    /// Component patterns left out of both manifests
    pub global_excludes: Vec<String>,

    /// Record dot-files and descend into dot-directories
    pub include_hidden: bool,

    /// Descend into symlinked directories
    pub follow_links: bool,

    /// Back up files before overwriting them
    pub create_backups: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
            global_excludes: Vec::new(),
            include_hidden: true,
            follow_links: false,
            create_backups: false,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance_secs.is_finite() || self.tolerance_secs < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance_secs));
        }
        Ok(())
    }

    /// Scanner policy. Backups are excluded so they never sync back across.
    pub fn scan_options(&self) -> ScanOptions {
        let mut excludes = self.global_excludes.clone();
        if self.create_backups {
            excludes.push(format!("*{BACKUP_SUFFIX}"));
        }

        ScanOptions {
            follow_links: self.follow_links,
            include_hidden: self.include_hidden,
            excludes,
        }
    }

    pub fn differ(&self) -> Differ {
        Differ::new(self.tolerance_secs)
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            create_backup: self.create_backups,
        }
    }
}
