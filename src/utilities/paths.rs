// Path Utilities
// Conversions between native paths and the portable keys used in manifests

use std::io;
use std::path::{Component, Path, PathBuf};

/// Convert a path relative to a scan root into a forward-slash key.
///
/// Returns `None` when a component is not valid UTF-8 or the path escapes
/// its root (`..`, a prefix or a root component).
pub fn to_posix(relative: &Path) -> Option<String> {
    let mut parts = Vec::new();

    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(parts.join("/"))
}

/// Join a forward-slash key onto a native root directory
pub fn join_posix(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Resolve a directory to an absolute path without UNC prefixes on Windows
pub fn resolve_root(path: &Path) -> io::Result<PathBuf> {
    dunce::canonicalize(path)
}

/// Whether a key component marks a hidden entry
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}
