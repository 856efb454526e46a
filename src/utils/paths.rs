//! Filesystem helpers for build directory lifecycle
//!
//! Directory creation and removal are idempotent so `configure` and
//! `clean_all` can be re-run after a failed invocation.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::BuildError;

/// Ensure `path` exists as a directory.
///
/// An `AlreadyExists` race with a concurrent creator is not an error.
pub fn create_dir(path: &Path) -> Result<(), BuildError> {
    match std::fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(BuildError::filesystem("create directory", path, e)),
    }
}

/// Recursively delete `path` if it exists.
pub fn remove_dir(path: &Path) -> Result<(), BuildError> {
    if !path.is_dir() {
        return Ok(());
    }
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BuildError::filesystem("remove directory", path, e)),
    }
}

/// Make `path` absolute against the current directory and fold `.`/`..`
/// lexically. Symlinks are not resolved.
pub fn absolute(path: &Path) -> PathBuf {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Check whether `child` lies under `parent`.
///
/// This is a textual prefix test on the absolute forms, not a path-segment
/// test: `/foo` is reported as a parent of `/foobar`. Use
/// [`is_subdirectory_strict`] for component-wise containment.
pub fn is_subdirectory(parent: &Path, child: &Path) -> bool {
    let parent = absolute(parent);
    let child = absolute(child);
    child
        .to_string_lossy()
        .starts_with(parent.to_string_lossy().as_ref())
}

/// Component-wise variant of [`is_subdirectory`].
pub fn is_subdirectory_strict(parent: &Path, child: &Path) -> bool {
    absolute(child).starts_with(absolute(parent))
}

/// Number of logical processors visible to this process
pub fn cpu_count() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}
