// Application
// Runs the scan -> diff -> confirm -> execute pipeline for two directories

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{AppConfig, Confirm, Reporter};
use crate::operations::{Differ, Manifest, Scanner, SyncEngine, SyncOperation, SyncSummary};

/// Prompt shown before executing a plan
pub const CONFIRM_PROMPT: &str = "Do you want to proceed with the sync operations?";

/// How far a run is allowed to go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunMode {
    /// Compute and present the plan, never execute it
    pub dry_run: bool,
    /// Execute without asking for confirmation
    pub force: bool,
}

/// Operations computed for a pair of directories
#[derive(Debug, Clone)]
pub struct Plan {
    /// Resolved first root (DIR 1)
    pub first: PathBuf,
    /// Resolved second root (DIR 2)
    pub second: PathBuf,
    pub operations: Vec<SyncOperation>,
}

/// How a run ended
#[derive(Debug)]
pub enum Outcome {
    /// Nothing to do
    InSync,
    /// Plan presented, nothing executed
    DryRun { planned: usize },
    /// The user declined the prompt
    Aborted { planned: usize },
    /// The plan was executed
    Completed(SyncSummary),
}

impl Outcome {
    /// Process exit status: 2 when some operations failed, otherwise 0
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed(summary) if !summary.is_success() => 2,
            _ => 0,
        }
    }
}

/// Directory synchronization pipeline
#[derive(Debug, Clone)]
pub struct App {
    config: AppConfig,
    scanner: Scanner,
    differ: Differ,
    engine: SyncEngine,
}

impl App {
    /// Create a pipeline from validated configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            scanner: Scanner::new(config.scan_options()),
            differ: config.differ(),
            engine: SyncEngine::new(config.sync_options()),
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Scan both directories and diff them.
    ///
    /// Both roots are checked before either is scanned.
    pub fn plan(&self, first: &Path, second: &Path, reporter: &mut dyn Reporter) -> Result<Plan> {
        let first_root = Scanner::validate_root(first)?;
        let second_root = Scanner::validate_root(second)?;
        reporter.comparing(&first_root, &second_root);

        let first_manifest = self.scan_root("DIR 1", &first_root, reporter)?;
        let second_manifest = self.scan_root("DIR 2", &second_root, reporter)?;

        let operations = self.differ.diff(&first_manifest, &second_manifest);
        reporter.plan_ready(&operations);

        Ok(Plan {
            first: first_root,
            second: second_root,
            operations,
        })
    }

    fn scan_root(&self, side: &str, root: &Path, reporter: &mut dyn Reporter) -> Result<Manifest> {
        let manifest = self
            .scanner
            .scan(root)
            .with_context(|| format!("Failed to scan {side} '{}'", root.display()))?;
        reporter.scanned(&manifest);
        Ok(manifest)
    }

    /// Apply operations in order
    pub fn execute(&self, operations: Vec<SyncOperation>, reporter: &mut dyn Reporter) -> SyncSummary {
        self.engine.apply(operations, reporter)
    }

    /// Plan, then execute according to `mode`
    pub fn run(
        &self,
        first: &Path,
        second: &Path,
        mode: RunMode,
        confirm: &mut dyn Confirm,
        reporter: &mut dyn Reporter,
    ) -> Result<Outcome> {
        let plan = self.plan(first, second, reporter)?;
        let planned = plan.operations.len();

        if planned == 0 {
            return Ok(Outcome::InSync);
        }

        if mode.dry_run {
            reporter.dry_run();
            return Ok(Outcome::DryRun { planned });
        }

        if !mode.force && !confirm.confirm(CONFIRM_PROMPT)? {
            reporter.aborted();
            return Ok(Outcome::Aborted { planned });
        }

        let summary = self.execute(plan.operations, reporter);
        info!(succeeded = summary.succeeded, failed = summary.failed, "Sync finished");
        Ok(Outcome::Completed(summary))
    }
}
