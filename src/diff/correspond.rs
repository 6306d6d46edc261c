//! Path correspondence between the source and target trees

use std::path::{Path, PathBuf};

/// Maps paths in one tree onto the matching path in the other.
///
/// Two entries are the same logical entry when their paths relative to their
/// roots are equal. Mapping is purely structural: the suffix below the root
/// is kept segment-for-segment and nothing is looked up on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correspondence {
    source_root: PathBuf,
    target_root: PathBuf,
}

impl Correspondence {
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Counterpart in the source tree of a path under the target root
    pub fn to_source(&self, target_path: &Path) -> Option<PathBuf> {
        rebase(target_path, &self.target_root, &self.source_root)
    }

    /// Counterpart in the target tree of a path under the source root
    pub fn to_target(&self, source_path: &Path) -> Option<PathBuf> {
        rebase(source_path, &self.source_root, &self.target_root)
    }
}

/// Swap the `from` prefix of `path` for `to`.
///
/// Returns `None` when `path` does not lie under `from`.
pub fn rebase(path: &Path, from: &Path, to: &Path) -> Option<PathBuf> {
    let relative = path.strip_prefix(from).ok()?;
    if relative.as_os_str().is_empty() {
        Some(to.to_path_buf())
    } else {
        Some(to.join(relative))
    }
}
