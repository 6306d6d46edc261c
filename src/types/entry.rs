//! Entry - A single filesystem object discovered by a tree walk

use std::fs::FileType;
use std::path::{Path, PathBuf};

/// Kind of a scanned entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file or symlink (symlinks are never followed)
    File,

    /// Directory
    Directory,
}

impl EntryKind {
    /// Map a filesystem type onto an entry kind.
    ///
    /// Returns `None` for special files (pipes, sockets, devices), which are
    /// never reconciled.
    pub fn from_file_type(file_type: FileType) -> Option<Self> {
        if file_type.is_dir() {
            Some(EntryKind::Directory)
        } else if file_type.is_file() || file_type.is_symlink() {
            Some(EntryKind::File)
        } else {
            None
        }
    }

    pub fn is_dir(self) -> bool {
        self == EntryKind::Directory
    }
}

/// A file or directory under one of the two tree roots
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    /// Absolute path (root joined with the relative path)
    pub path: PathBuf,

    /// File or directory
    pub kind: EntryKind,
}

impl Entry {
    pub fn new(path: PathBuf, kind: EntryKind) -> Self {
        Self { path, kind }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into(), EntryKind::File)
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into(), EntryKind::Directory)
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Directory that directly contains this entry.
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// A source file paired with the target path it reconciles against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// File in the source tree
    pub source: PathBuf,

    /// Corresponding path in the target tree
    pub target: PathBuf,
}

impl Transfer {
    pub fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}
