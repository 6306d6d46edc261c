//! # treesync - one-way directory tree reconciliation
//!
//! Makes a target tree mirror a source tree: stale target files are
//! overwritten, files missing from the target are copied, and target
//! entries with no source counterpart are deleted. Modification times
//! within a small tolerance count as equal. Deletions and overwrites are
//! only applied after confirmation; copies always run.

pub mod commands;
pub mod config;
pub mod diff;
pub mod executor;
pub mod scanner;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use diff::SyncPlan;
pub use types::{Classification, Entry, EntryKind, ErrorRecord, Operation, SyncError, Transfer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
