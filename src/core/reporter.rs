// Reporter
// Progress and presentation hooks injected into the sync pipeline

use std::path::Path;

use crate::operations::{Manifest, SyncError, SyncOperation, SyncSummary};

/// Receives pipeline events for display. Every hook defaults to a no-op,
/// so implementations only override what they render.
pub trait Reporter {
    /// Both roots were validated and are about to be scanned
    fn comparing(&mut self, _first: &Path, _second: &Path) {}

    /// A manifest finished scanning
    fn scanned(&mut self, _manifest: &Manifest) {}

    /// The operation list is ready; an empty slice means the trees agree
    fn plan_ready(&mut self, _operations: &[SyncOperation]) {}

    /// Dry run requested, nothing will be executed
    fn dry_run(&mut self) {}

    /// The user declined the confirmation prompt
    fn aborted(&mut self) {}

    fn batch_started(&mut self, _total: usize) {}

    /// `index` is 1-based
    fn operation_started(&mut self, _index: usize, _total: usize, _operation: &SyncOperation) {}

    fn operation_failed(&mut self, _operation: &SyncOperation, _error: &SyncError) {}

    fn batch_finished(&mut self, _summary: &SyncSummary) {}
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {}
