//! Command implementations

pub mod sync;

pub use sync::{run, SyncReport};
