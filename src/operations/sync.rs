// Sync Engine
// Applies sync operations with per-operation failure isolation

use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::diff::{CopyOperation, SyncOperation};
use super::error::SyncError;
use crate::core::Reporter;

/// Suffix appended to backups of overwritten files
pub const BACKUP_SUFFIX: &str = ".backup";

/// Options for sync operations
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Keep a copy of an existing destination before overwriting it
    pub create_backup: bool,
}

/// One operation that could not be applied
#[derive(Debug)]
pub struct SyncFailure {
    pub operation: SyncOperation,
    pub error: SyncError,
}

/// Result of applying a batch
#[derive(Debug, Default)]
pub struct SyncSummary {
    /// Number of operations applied
    pub succeeded: usize,
    /// Number of operations that failed
    pub failed: usize,
    /// Failed operations in execution order
    pub failures: Vec<SyncFailure>,
}

impl SyncSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Engine for file synchronization operations
#[derive(Debug, Clone, Default)]
pub struct SyncEngine {
    options: SyncOptions,
}

impl SyncEngine {
    /// Create a new sync engine with the given options
    pub fn new(options: SyncOptions) -> Self {
        Self { options }
    }

    /// Apply every operation in order.
    ///
    /// A failing operation is recorded and the batch carries on; the
    /// summary is always returned, even if nothing succeeded.
    pub fn apply(&self, operations: Vec<SyncOperation>, reporter: &mut dyn Reporter) -> SyncSummary {
        let total = operations.len();
        let mut summary = SyncSummary::default();

        reporter.batch_started(total);

        for (index, operation) in operations.into_iter().enumerate() {
            reporter.operation_started(index + 1, total, &operation);

            match self.apply_one(&operation) {
                Ok(()) => summary.succeeded += 1,
                Err(error) => {
                    warn!(path = operation.relative_path(), error = %error, "Sync operation failed");
                    reporter.operation_failed(&operation, &error);
                    summary.failed += 1;
                    summary.failures.push(SyncFailure { operation, error });
                }
            }
        }

        reporter.batch_finished(&summary);
        summary
    }

    /// Apply a single operation
    pub fn apply_one(&self, operation: &SyncOperation) -> Result<(), SyncError> {
        match operation {
            SyncOperation::Copy(copy) => self.copy_file(copy),
        }
    }

    fn copy_file(&self, copy: &CopyOperation) -> Result<(), SyncError> {
        let source = &copy.source;
        let dest = &copy.destination;

        // Ensure destination directory exists
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| SyncError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        if self.options.create_backup && dest.is_file() {
            Self::create_backup(dest)?;
        }

        // Content and permission bits
        fs::copy(source, dest).map_err(|err| SyncError::Copy {
            from: source.clone(),
            to: dest.clone(),
            source: err,
        })?;

        // Access and modification times follow the source
        let metadata = fs::metadata(source).map_err(|err| SyncError::Timestamps {
            path: source.clone(),
            source: err,
        })?;
        filetime::set_file_times(
            dest,
            FileTime::from_last_access_time(&metadata),
            FileTime::from_last_modification_time(&metadata),
        )
        .map_err(|err| SyncError::Timestamps {
            path: dest.clone(),
            source: err,
        })?;

        debug!(from = %source.display(), to = %dest.display(), "Copied file");
        Ok(())
    }

    /// Path a backup of `path` is written to
    pub fn backup_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(BACKUP_SUFFIX);
        path.with_file_name(name)
    }

    fn create_backup(path: &Path) -> Result<(), SyncError> {
        let backup_path = Self::backup_path(path);

        fs::copy(path, &backup_path).map_err(|source| SyncError::Backup {
            path: backup_path.clone(),
            source,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{CopyReason, Direction};
    use filetime::set_file_mtime;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const T: i64 = 1_700_000_000;

    fn copy_op(source: PathBuf, destination: PathBuf) -> SyncOperation {
        SyncOperation::Copy(CopyOperation {
            relative_path: destination.file_name().unwrap().to_string_lossy().into_owned(),
            source,
            destination,
            direction: Direction::FirstToSecond,
            reason: CopyReason::OnlyInSource,
            source_mod_time: T as f64,
            destination_mod_time: None,
        })
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Reporter for Recorder {
        fn batch_started(&mut self, total: usize) {
            self.events.push(format!("start {total}"));
        }

        fn operation_started(&mut self, index: usize, total: usize, operation: &SyncOperation) {
            self.events.push(format!("{index}/{total} {}", operation.relative_path()));
        }

        fn operation_failed(&mut self, operation: &SyncOperation, _error: &SyncError) {
            self.events.push(format!("failed {}", operation.relative_path()));
        }

        fn batch_finished(&mut self, summary: &SyncSummary) {
            self.events.push(format!("done {}/{}", summary.succeeded, summary.failed));
        }
    }

    #[test]
    fn test_copy_creates_parents_and_preserves_mtime() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let source = src.path().join("readme.txt");
        fs::write(&source, "hello").unwrap();
        set_file_mtime(&source, FileTime::from_unix_time(T, 250_000_000)).unwrap();
        let destination = dst.path().join("notes").join("deep").join("readme.txt");

        let summary = SyncEngine::default().apply(vec![copy_op(source, destination.clone())], &mut Recorder::default());

        assert_eq!(summary.succeeded, 1);
        assert!(summary.is_success());
        assert_eq!(fs::read_to_string(&destination).unwrap(), "hello");
        let mtime = FileTime::from_last_modification_time(&fs::metadata(&destination).unwrap());
        assert_eq!(mtime.unix_seconds(), T);
    }

    #[test]
    fn test_copy_overwrites_existing_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("new.csv");
        let destination = dir.path().join("old.csv");
        fs::write(&source, "fresh").unwrap();
        fs::write(&destination, "stale").unwrap();

        let engine = SyncEngine::default();
        engine.apply_one(&copy_op(source, destination.clone())).unwrap();

        assert_eq!(fs::read_to_string(&destination).unwrap(), "fresh");
        assert!(!SyncEngine::backup_path(&destination).exists());
    }

    #[test]
    fn test_backup_keeps_previous_contents() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.json");
        let destination = dir.path().join("b.json");
        fs::write(&source, "{\"v\":2}").unwrap();
        fs::write(&destination, "{\"v\":1}").unwrap();

        let engine = SyncEngine::new(SyncOptions { create_backup: true });
        engine.apply_one(&copy_op(source, destination.clone())).unwrap();

        let backup = SyncEngine::backup_path(&destination);
        assert_eq!(backup, dir.path().join("b.json.backup"));
        assert_eq!(fs::read_to_string(backup).unwrap(), "{\"v\":1}");
        assert_eq!(fs::read_to_string(&destination).unwrap(), "{\"v\":2}");
    }

    #[test]
    fn test_failure_is_isolated_and_batch_continues() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("one"), "1").unwrap();
        fs::write(src.path().join("three"), "3").unwrap();

        let operations = vec![
            copy_op(src.path().join("one"), dst.path().join("one")),
            copy_op(src.path().join("vanished"), dst.path().join("two")),
            copy_op(src.path().join("three"), dst.path().join("three")),
        ];
        let mut recorder = Recorder::default();

        let summary = SyncEngine::default().apply(operations, &mut recorder);

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.failures[0].operation.relative_path(), "two");
        assert!(matches!(summary.failures[0].error, SyncError::Copy { .. }));
        assert!(dst.path().join("one").exists());
        assert!(dst.path().join("three").exists());
        assert_eq!(
            recorder.events,
            vec!["start 3", "1/3 one", "2/3 two", "failed two", "3/3 three", "done 2/1"]
        );
    }

    #[test]
    fn test_blocked_parent_directory_is_reported() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("file.txt");
        fs::write(&source, "x").unwrap();
        fs::write(dir.path().join("blocker"), "not a directory").unwrap();

        let summary = SyncEngine::default().apply(
            vec![copy_op(source, dir.path().join("blocker").join("file.txt"))],
            &mut Recorder::default(),
        );

        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 1);
        assert!(matches!(summary.failures[0].error, SyncError::CreateDir { .. }));
    }

    #[test]
    fn test_empty_batch_returns_empty_summary() {
        let summary = SyncEngine::default().apply(Vec::new(), &mut Recorder::default());

        assert_eq!(summary.total(), 0);
        assert!(summary.is_success());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_preserves_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let source = dir.path().join("script.sh");
        let destination = dir.path().join("out").join("script.sh");
        fs::write(&source, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o750)).unwrap();

        SyncEngine::default().apply_one(&copy_op(source, destination.clone())).unwrap();

        let mode = fs::metadata(&destination).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o750);
    }
}
