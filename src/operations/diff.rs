// Diff Engine
// Derives an ordered list of copy operations from two manifests

use std::path::{Path, PathBuf};
use tracing::debug;

use super::scan::{FileRecord, Manifest};
use crate::utilities::join_posix;

/// Modification times this close are treated as equal
pub const DEFAULT_TOLERANCE_SECS: f64 = 1.0;

/// Which way a copy flows between the two compared roots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the first directory (DIR 1) into the second (DIR 2)
    FirstToSecond,
    /// From the second directory (DIR 2) into the first (DIR 1)
    SecondToFirst,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::FirstToSecond => "DIR 1 -> 2",
            Direction::SecondToFirst => "DIR 2 -> 1",
        }
    }

    /// Name of the side the copy reads from
    pub fn source_side(self) -> &'static str {
        match self {
            Direction::FirstToSecond => "DIR 1",
            Direction::SecondToFirst => "DIR 2",
        }
    }
}

/// Why a copy was suggested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyReason {
    /// Both sides have the file and the source is newer beyond tolerance
    NewerInSource,
    /// Only the source side has the file
    OnlyInSource,
}

/// A directed copy between the two roots
#[derive(Debug, Clone, PartialEq)]
pub struct CopyOperation {
    /// Manifest key shared by both ends
    pub relative_path: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub direction: Direction,
    pub reason: CopyReason,
    pub source_mod_time: f64,
    /// `None` when the destination does not exist yet
    pub destination_mod_time: Option<f64>,
}

/// A single synchronization step. More kinds (delete, conflict) may follow.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOperation {
    Copy(CopyOperation),
}

impl SyncOperation {
    /// Action name used in reports
    pub fn action(&self) -> &'static str {
        match self {
            SyncOperation::Copy(_) => "COPY",
        }
    }

    pub fn relative_path(&self) -> &str {
        match self {
            SyncOperation::Copy(copy) => &copy.relative_path,
        }
    }

    pub fn source(&self) -> &Path {
        match self {
            SyncOperation::Copy(copy) => &copy.source,
        }
    }

    pub fn destination(&self) -> &Path {
        match self {
            SyncOperation::Copy(copy) => &copy.destination,
        }
    }
}

/// Compares two manifests by modification time
#[derive(Debug, Clone, Copy)]
pub struct Differ {
    tolerance_secs: f64,
}

impl Default for Differ {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_SECS)
    }
}

impl Differ {
    /// Create a differ with the given tolerance window in seconds.
    /// Callers validate that the tolerance is finite and non-negative.
    pub fn new(tolerance_secs: f64) -> Self {
        Self { tolerance_secs }
    }

    pub fn tolerance_secs(&self) -> f64 {
        self.tolerance_secs
    }

    /// Whether two modification times fall inside the tolerance window
    pub fn in_sync(&self, first: f64, second: f64) -> bool {
        (first - second).abs() <= self.tolerance_secs
    }

    /// Compute the operations that bring `first` and `second` into agreement.
    ///
    /// Output order: common paths, then paths only in `first`, then paths
    /// only in `second`, each group ascending by relative path. An empty
    /// list means the trees already agree. No conflict detection is done:
    /// when both sides changed, the later timestamp wins.
    pub fn diff(&self, first: &Manifest, second: &Manifest) -> Vec<SyncOperation> {
        let mut operations = Vec::new();

        for a in first.iter() {
            let Some(b) = second.get(&a.relative_path) else {
                continue;
            };
            if self.in_sync(a.mod_time, b.mod_time) {
                continue;
            }

            let operation = if a.mod_time > b.mod_time {
                Self::newer(a, b, Direction::FirstToSecond)
            } else {
                Self::newer(b, a, Direction::SecondToFirst)
            };
            operations.push(operation);
        }

        let common = operations.len();

        operations.extend(
            first
                .iter()
                .filter(|a| !second.contains(&a.relative_path))
                .map(|a| Self::only_in(a, second.root(), Direction::FirstToSecond)),
        );

        let only_first = operations.len() - common;

        operations.extend(
            second
                .iter()
                .filter(|b| !first.contains(&b.relative_path))
                .map(|b| Self::only_in(b, first.root(), Direction::SecondToFirst)),
        );

        debug!(
            newer = common,
            only_in_first = only_first,
            only_in_second = operations.len() - common - only_first,
            tolerance_secs = self.tolerance_secs,
            "Computed sync operations"
        );

        operations
    }

    fn newer(source: &FileRecord, destination: &FileRecord, direction: Direction) -> SyncOperation {
        SyncOperation::Copy(CopyOperation {
            relative_path: source.relative_path.clone(),
            source: source.absolute_path.clone(),
            destination: destination.absolute_path.clone(),
            direction,
            reason: CopyReason::NewerInSource,
            source_mod_time: source.mod_time,
            destination_mod_time: Some(destination.mod_time),
        })
    }

    fn only_in(source: &FileRecord, other_root: &Path, direction: Direction) -> SyncOperation {
        SyncOperation::Copy(CopyOperation {
            relative_path: source.relative_path.clone(),
            source: source.absolute_path.clone(),
            destination: join_posix(other_root, &source.relative_path),
            direction,
            reason: CopyReason::OnlyInSource,
            source_mod_time: source.mod_time,
            destination_mod_time: None,
        })
    }
}

/// Diff with the default one-second tolerance
pub fn diff(first: &Manifest, second: &Manifest) -> Vec<SyncOperation> {
    Differ::default().diff(first, second)
}
