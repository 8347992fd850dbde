// Command line
// Argument parsing and layering of flags onto the loaded configuration

use clap::Parser;
use std::path::PathBuf;

use folder_sync::core::{AppConfig, RunMode};

/// Two-way directory sync: newer files win, missing files are copied across
#[derive(Parser, Debug)]
#[command(name = "folder-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// First directory (DIR 1)
    pub dir1: PathBuf,

    /// Second directory (DIR 2)
    pub dir2: PathBuf,

    /// Show the planned operations without changing any file
    #[arg(short, long)]
    pub dry_run: bool,

    /// Execute without asking for confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Config file to use instead of ./folder-sync.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Modification time tolerance in seconds
    #[arg(long, value_name = "SECS")]
    pub tolerance: Option<f64>,

    /// Leave out entries whose name matches PATTERN (repeatable)
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Ignore dot-files and dot-directories
    #[arg(long)]
    pub skip_hidden: bool,

    /// Descend into symlinked directories
    #[arg(long)]
    pub follow_links: bool,

    /// Keep a .backup copy of every overwritten file
    #[arg(long)]
    pub backup: bool,
}

impl Cli {
    pub fn mode(&self) -> RunMode {
        RunMode {
            dry_run: self.dry_run,
            force: self.force,
        }
    }

    /// Flags win over the config file; boolean flags can only switch a setting on
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(tolerance) = self.tolerance {
            config.tolerance_secs = tolerance;
        }
        config.global_excludes.extend(self.exclude.iter().cloned());
        if self.skip_hidden {
            config.include_hidden = false;
        }
        if self.follow_links {
            config.follow_links = true;
        }
        if self.backup {
            config.create_backups = true;
        }
    }
}
