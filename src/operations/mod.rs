// Operations module
// Business logic for scanning, diffing and applying sync operations

pub mod diff;
pub mod error;
pub mod scan;
pub mod sync;

pub use diff::{diff, CopyOperation, CopyReason, Differ, Direction, SyncOperation, DEFAULT_TOLERANCE_SECS};
pub use error::{ScanError, SyncError};
pub use scan::{FileRecord, Manifest, ScanOptions, Scanner};
pub use sync::{SyncEngine, SyncFailure, SyncOptions, SyncSummary};
