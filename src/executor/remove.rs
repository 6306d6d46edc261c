//! Delete primitive

use crate::types::SyncError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Remove any filesystem entry at `path`.
///
/// Directories are removed recursively; files and symlinks are removed as
/// files (a symlinked directory loses only the link). A path that is
/// already gone counts as removed.
pub fn remove_path_any(path: &Path) -> Result<(), SyncError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(SyncError::from_io(path, e)),
    };

    let result = if metadata.file_type().is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SyncError::from_io(path, e)),
    }
}
