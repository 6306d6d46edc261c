//! Core type definitions for treesync

mod action;
mod entry;
mod error;

pub use action::{Classification, Operation, Staleness};
pub use entry::{Entry, EntryKind, Transfer};
pub use error::{ErrorRecord, SyncError};
