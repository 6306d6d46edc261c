//! Entry classification
//!
//! Decides per entry whether reconciliation deletes, overwrites, copies or
//! leaves it alone. Only metadata is read; nothing is modified.

use crate::diff::Correspondence;
use crate::types::{Classification, Entry, EntryKind, Staleness, SyncError};
use crate::Config;
use std::fs::{self, Metadata};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Compare a target file's mtime against its source counterpart's.
///
/// Differences up to and including `tolerance` are `Same`; beyond that the
/// later timestamp wins.
pub fn staleness(
    target_mtime: SystemTime,
    source_mtime: SystemTime,
    tolerance: Duration,
) -> Staleness {
    let (delta, target_is_later) = match target_mtime.duration_since(source_mtime) {
        Ok(delta) => (delta, true),
        Err(err) => (err.duration(), false),
    };

    if delta <= tolerance {
        Staleness::Same
    } else if target_is_later {
        Staleness::TargetNewer
    } else {
        Staleness::TargetOlder
    }
}

/// Copy test for a source file.
///
/// A missing target always needs the copy. An existing one needs it only
/// when the source is newer by more than `tolerance`, the same window the
/// staleness test uses.
pub fn needs_copy(
    source_mtime: SystemTime,
    target_mtime: Option<SystemTime>,
    tolerance: Duration,
) -> bool {
    match target_mtime {
        None => true,
        Some(target_mtime) => {
            staleness(target_mtime, source_mtime, tolerance) == Staleness::TargetOlder
        }
    }
}

/// Filesystem-backed classifier for one source/target pair
#[derive(Debug, Clone)]
pub struct Classifier {
    map: Correspondence,
    tolerance: Duration,
}

impl Classifier {
    pub fn new(map: Correspondence, tolerance: Duration) -> Self {
        Self { map, tolerance }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Correspondence::new(&config.source, &config.target),
            config.time_tolerance,
        )
    }

    pub fn correspondence(&self) -> &Correspondence {
        &self.map
    }

    /// Classify an entry found in the target tree.
    ///
    /// Returns `Delete`, `Overwrite` or `Unchanged`.
    pub fn classify_target(&self, entry: &Entry) -> Result<Classification, SyncError> {
        let source_path = self.source_counterpart(&entry.path)?;
        let Some(source_meta) = stat_if_present(&source_path)? else {
            return Ok(Classification::Delete);
        };

        let class = match entry.kind {
            EntryKind::Directory => Classification::Unchanged,
            // Kind mismatch: the file is kept and later copies under it fail visibly
            EntryKind::File if source_meta.is_dir() => Classification::Unchanged,
            EntryKind::File => {
                let target_meta =
                    fs::symlink_metadata(&entry.path).map_err(|e| SyncError::from_io(&entry.path, e))?;
                let target_mtime = modified(&target_meta, &entry.path)?;
                let source_mtime = modified(&source_meta, &source_path)?;

                match staleness(target_mtime, source_mtime, self.tolerance) {
                    Staleness::TargetOlder => Classification::Overwrite,
                    Staleness::Same | Staleness::TargetNewer => Classification::Unchanged,
                }
            }
        };

        tracing::debug!(path = %entry.path.display(), ?class, "classified target entry");
        Ok(class)
    }

    /// Classify a file found in the source tree.
    ///
    /// Returns `Copy` or `Unchanged` along with the target path it maps to.
    pub fn classify_source_file(
        &self,
        source_path: &Path,
    ) -> Result<(Classification, PathBuf), SyncError> {
        let target_path = self.map.to_target(source_path).ok_or_else(|| {
            SyncError::Validation(format!(
                "{} is outside the source root {}",
                source_path.display(),
                self.map.source_root().display()
            ))
        })?;

        let class = match stat_if_present(&target_path)? {
            None => Classification::Copy,
            Some(target_meta) if target_meta.is_dir() => Classification::Unchanged,
            Some(target_meta) => {
                let source_meta =
                    fs::symlink_metadata(source_path).map_err(|e| SyncError::from_io(source_path, e))?;
                let source_mtime = modified(&source_meta, source_path)?;
                let target_mtime = modified(&target_meta, &target_path)?;

                if needs_copy(source_mtime, Some(target_mtime), self.tolerance) {
                    Classification::Copy
                } else {
                    Classification::Unchanged
                }
            }
        };

        tracing::debug!(path = %source_path.display(), ?class, "classified source file");
        Ok((class, target_path))
    }

    fn source_counterpart(&self, target_path: &Path) -> Result<PathBuf, SyncError> {
        self.map.to_source(target_path).ok_or_else(|| {
            SyncError::Validation(format!(
                "{} is outside the target root {}",
                target_path.display(),
                self.map.target_root().display()
            ))
        })
    }
}

/// Metadata without following symlinks; `None` when nothing is there.
fn stat_if_present(path: &Path) -> Result<Option<Metadata>, SyncError> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SyncError::from_io(path, e)),
    }
}

fn modified(meta: &Metadata, path: &Path) -> Result<SystemTime, SyncError> {
    meta.modified().map_err(|e| {
        SyncError::Io(std::io::Error::other(format!(
            "Failed to get modification time for {}: {}",
            path.display(),
            e
        )))
    })
}
