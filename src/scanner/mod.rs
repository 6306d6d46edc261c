//! Directory scanning logic

mod walker;

pub use walker::{scan_dirs_bottom_up, walk_error_path, TreeWalker};
