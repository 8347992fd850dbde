// Manifest Scanner
// Walks a directory tree into an immutable relative-path snapshot

use filetime::FileTime;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::error::ScanError;
use crate::utilities::{is_hidden, resolve_root, to_posix, PatternMatcher};

/// One regular file discovered under a scan root
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    /// Forward-slash path relative to the scan root; the manifest key
    pub relative_path: String,
    /// Resolved location on disk, only used for I/O
    pub absolute_path: PathBuf,
    /// Modification time in seconds since the Unix epoch
    pub mod_time: f64,
}

/// Point-in-time snapshot of one directory tree, keyed by relative path.
///
/// Iteration is always in ascending key order.
#[derive(Debug, Clone)]
pub struct Manifest {
    root: PathBuf,
    entries: BTreeMap<String, FileRecord>,
    skipped: Vec<PathBuf>,
}

impl Manifest {
    /// Build a manifest from records gathered elsewhere. A later record
    /// with a duplicate key replaces the earlier one.
    pub fn from_records(root: impl Into<PathBuf>, records: impl IntoIterator<Item = FileRecord>) -> Self {
        let entries = records
            .into_iter()
            .map(|record| (record.relative_path.clone(), record))
            .collect();

        Self {
            root: root.into(),
            entries,
            skipped: Vec::new(),
        }
    }

    /// Resolved root the manifest was taken from
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, relative_path: &str) -> Option<&FileRecord> {
        self.entries.get(relative_path)
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.entries.contains_key(relative_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subtrees and entries that could not be read during the walk
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }
}

/// Walk policy for the scanner
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Descend into symlinked directories
    pub follow_links: bool,
    /// Record entries whose name starts with a dot
    pub include_hidden: bool,
    /// Component patterns to leave out of the manifest
    pub excludes: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            follow_links: false,
            include_hidden: true,
            excludes: Vec::new(),
        }
    }
}

/// Builds manifests from directory trees
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
    matcher: PatternMatcher,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        let matcher = PatternMatcher::new(options.excludes.clone());
        Self { options, matcher }
    }

    /// Check that `root` is an existing directory and resolve it
    pub fn validate_root(root: &Path) -> Result<PathBuf, ScanError> {
        match fs::metadata(root) {
            Ok(metadata) if metadata.is_dir() => {}
            _ => {
                return Err(ScanError::RootNotFound {
                    path: root.to_path_buf(),
                })
            }
        }

        resolve_root(root).map_err(|source| ScanError::Resolve {
            path: root.to_path_buf(),
            source,
        })
    }

    /// Snapshot every regular file reachable under `root`.
    ///
    /// Unreadable subtrees are skipped and listed in [`Manifest::skipped`];
    /// only a missing root is fatal.
    pub fn scan(&self, root: &Path) -> Result<Manifest, ScanError> {
        let root = Self::validate_root(root)?;
        let mut entries = BTreeMap::new();
        let mut skipped = Vec::new();

        let walker = WalkDir::new(&root)
            .follow_links(self.options.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || self.is_included(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                    warn!(path = %path.display(), error = %err, "Skipping unreadable subtree");
                    skipped.push(path);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            if let Some(record) = self.record(&root, &entry, &mut skipped) {
                entries.insert(record.relative_path.clone(), record);
            }
        }

        debug!(
            root = %root.display(),
            files = entries.len(),
            skipped = skipped.len(),
            "Scanned directory"
        );

        Ok(Manifest {
            root,
            entries,
            skipped,
        })
    }

    fn is_included(&self, entry: &DirEntry) -> bool {
        let Some(name) = entry.file_name().to_str() else {
            // Undecodable names are reported when their files are recorded
            return true;
        };

        if !self.options.include_hidden && is_hidden(name) {
            return false;
        }

        !self.matcher.should_exclude(name)
    }

    fn record(&self, root: &Path, entry: &DirEntry, skipped: &mut Vec<PathBuf>) -> Option<FileRecord> {
        let path = entry.path();

        // Follows links, so a symlink to a regular file is recorded with its target's time
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Skipping unreadable entry");
                skipped.push(path.to_path_buf());
                return None;
            }
        };

        if !metadata.is_file() {
            return None;
        }

        let relative_path = match path.strip_prefix(root).ok().and_then(to_posix) {
            Some(relative_path) => relative_path,
            None => {
                warn!(path = %path.display(), "Skipping entry without a portable UTF-8 path");
                skipped.push(path.to_path_buf());
                return None;
            }
        };

        Some(FileRecord {
            relative_path,
            absolute_path: path.to_path_buf(),
            mod_time: mod_time_secs(&metadata),
        })
    }
}

/// Modification time as fractional seconds since the Unix epoch
pub fn mod_time_secs(metadata: &fs::Metadata) -> f64 {
    let mtime = FileTime::from_last_modification_time(metadata);
    mtime.unix_seconds() as f64 + f64::from(mtime.nanoseconds()) / 1_000_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::set_file_mtime;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
        let path = crate::utilities::join_posix(root, relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    fn keys(manifest: &Manifest) -> Vec<&str> {
        manifest.iter().map(|r| r.relative_path.as_str()).collect()
    }

    #[test]
    fn test_scan_records_nested_files_with_posix_keys() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.txt", "b");
        write(dir.path(), "notes/readme.txt", "hello");
        write(dir.path(), "notes/deep/a.md", "a");
        fs::create_dir_all(dir.path().join("empty")).unwrap();

        let manifest = Scanner::default().scan(dir.path()).unwrap();

        assert_eq!(keys(&manifest), vec!["b.txt", "notes/deep/a.md", "notes/readme.txt"]);
        let record = manifest.get("notes/readme.txt").unwrap();
        assert!(record.absolute_path.is_absolute());
        assert_eq!(fs::read_to_string(&record.absolute_path).unwrap(), "hello");
        assert!(manifest.skipped().is_empty());
    }

    #[test]
    fn test_scan_preserves_fractional_mod_time() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "data.csv", "1,2,3");
        set_file_mtime(&path, FileTime::from_unix_time(1_700_000_000, 500_000_000)).unwrap();

        let manifest = Scanner::default().scan(dir.path()).unwrap();

        let mod_time = manifest.get("data.csv").unwrap().mod_time;
        assert!((mod_time - 1_700_000_000.5).abs() < 1e-3, "got {mod_time}");
    }

    #[test]
    fn test_scan_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = Scanner::default().scan(&missing).unwrap_err();

        assert!(matches!(err, ScanError::RootNotFound { ref path } if path == &missing));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_scan_file_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let file = write(dir.path(), "plain.txt", "x");

        let err = Scanner::default().scan(&file).unwrap_err();

        assert!(matches!(err, ScanError::RootNotFound { .. }));
    }

    #[test]
    fn test_scan_walks_hidden_entries_by_default() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".env", "k=v");
        write(dir.path(), ".cache/blob", "x");
        write(dir.path(), "visible.txt", "y");

        let all = Scanner::default().scan(dir.path()).unwrap();
        assert_eq!(keys(&all), vec![".cache/blob", ".env", "visible.txt"]);

        let scanner = Scanner::new(ScanOptions {
            include_hidden: false,
            ..ScanOptions::default()
        });
        let visible = scanner.scan(dir.path()).unwrap();
        assert_eq!(keys(&visible), vec!["visible.txt"]);
    }

    #[test]
    fn test_scan_excludes_do_not_descend() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "node_modules/pkg/index.js", "x");
        write(dir.path(), "src/main.rs", "fn main() {}");
        write(dir.path(), "src/main.rs.swp", "swap");

        let scanner = Scanner::new(ScanOptions {
            excludes: vec!["node_modules".to_string(), "*.swp".to_string()],
            ..ScanOptions::default()
        });
        let manifest = scanner.scan(dir.path()).unwrap();

        assert_eq!(keys(&manifest), vec!["src/main.rs"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_records_file_symlinks_but_not_directory_links_by_default() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write(target.path(), "inner.txt", "inner");
        let real = write(dir.path(), "real.txt", "real");
        symlink(&real, dir.path().join("link.txt")).unwrap();
        symlink(target.path(), dir.path().join("linked_dir")).unwrap();
        symlink(dir.path().join("missing"), dir.path().join("dangling")).unwrap();

        let manifest = Scanner::default().scan(dir.path()).unwrap();
        assert_eq!(keys(&manifest), vec!["link.txt", "real.txt"]);
        assert_eq!(manifest.skipped().len(), 1);

        let following = Scanner::new(ScanOptions {
            follow_links: true,
            ..ScanOptions::default()
        });
        let manifest = following.scan(dir.path()).unwrap();
        assert!(manifest.contains("linked_dir/inner.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_skips_unreadable_subtree() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "open/a.txt", "a");
        write(dir.path(), "locked/secret.txt", "s");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can read the directory anyway
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = Scanner::default().scan(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let manifest = result.unwrap();
        assert_eq!(keys(&manifest), vec!["open/a.txt"]);
        assert_eq!(manifest.skipped().len(), 1);
        assert!(manifest.skipped()[0].ends_with("locked"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_scan_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.txt", "ok");
        let bad_name = OsStr::from_bytes(b"bad\xff.txt");
        fs::write(dir.path().join(bad_name), "bad").unwrap();

        let manifest = Scanner::default().scan(dir.path()).unwrap();

        assert_eq!(keys(&manifest), vec!["good.txt"]);
        assert_eq!(manifest.skipped().len(), 1);
        assert_eq!(manifest.skipped()[0].file_name(), Some(bad_name));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_records_link_loop_as_skipped_subtree() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "nested/a.txt", "a");
        symlink(dir.path(), dir.path().join("nested").join("loop")).unwrap();

        let following = Scanner::new(ScanOptions {
            follow_links: true,
            ..ScanOptions::default()
        });
        let manifest = following.scan(dir.path()).unwrap();

        assert_eq!(keys(&manifest), vec!["nested/a.txt"]);
        assert_eq!(manifest.skipped().len(), 1);
        assert!(manifest.skipped()[0].ends_with("nested/loop"));
    }

    #[test]
    fn test_from_records_orders_by_key() {
        let manifest = Manifest::from_records(
            "/root",
            ["z.txt", "a/b.txt", "a.txt"].iter().map(|key| FileRecord {
                relative_path: key.to_string(),
                absolute_path: PathBuf::from("/root").join(key),
                mod_time: 0.0,
            }),
        );

        assert_eq!(keys(&manifest), vec!["a.txt", "a/b.txt", "z.txt"]);
        assert_eq!(manifest.len(), 3);
        assert!(!manifest.is_empty());
    }
}
