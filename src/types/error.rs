//! Error types for treesync

use super::Operation;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for treesync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failure reported by the walker
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (logic checks)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Permission denied for specific path
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// No space left on the device holding the path
    #[error("No space left on device: {path}")]
    StorageFull { path: PathBuf },
}

impl SyncError {
    /// Classify a raw IO error against the path it concerns.
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        if error.kind() == ErrorKind::PermissionDenied {
            SyncError::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else if error.kind() == ErrorKind::StorageFull
            || matches!(error.raw_os_error(), Some(28 | 112))
        {
            SyncError::StorageFull {
                path: path.to_path_buf(),
            }
        } else {
            SyncError::Io(error)
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, SyncError::Validation(_) | SyncError::Config(_))
    }

    /// Check if this error is related to permissions
    pub fn is_permission_error(&self) -> bool {
        match self {
            SyncError::PermissionDenied { .. } => true,
            SyncError::Io(e) => e.kind() == ErrorKind::PermissionDenied,
            _ => false,
        }
    }

    /// Check if this error is related to disk space
    pub fn is_disk_space_error(&self) -> bool {
        matches!(self, SyncError::StorageFull { .. })
    }

    fn is_not_found(&self) -> bool {
        matches!(self, SyncError::Io(e) if e.kind() == ErrorKind::NotFound)
    }
}

/// One failed filesystem operation, kept for the end-of-run report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub path: PathBuf,
    pub operation: Operation,
    pub message: String,
    pub hint: Option<&'static str>,
}

impl ErrorRecord {
    pub fn new(path: &Path, operation: Operation, error: &SyncError) -> Self {
        Self {
            path: path.to_path_buf(),
            operation,
            message: error.to_string(),
            hint: hint_for(error),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error {} {}: {}",
            self.operation.verb(),
            self.path.display(),
            self.message
        )
    }
}

fn hint_for(error: &SyncError) -> Option<&'static str> {
    if error.is_permission_error() {
        Some("Check file permissions or run with a user that has access.")
    } else if error.is_disk_space_error() {
        Some("Free space on the target device and run again.")
    } else if error.is_not_found() {
        Some("The path changed while syncing; run again to pick up the new state.")
    } else {
        None
    }
}
