//! Terminal output and input

pub mod progress;
pub mod prompt;
pub mod summary;

pub use progress::ProgressReporter;
pub use prompt::{AssumeYes, FixedAnswer, TerminalPrompt};
pub use summary::{copy_lines, format_error_report, summarize};
