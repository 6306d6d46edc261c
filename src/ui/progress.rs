//! Progress reporting

use crate::diff::{PlanStats, ScanPass};
use crate::executor::{Action, ExecutionEvent};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Console progress for a sync run.
///
/// A spinner tracks the scan passes; per-action lines are printed above it
/// so the two never interleave on the terminal.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        Self { bar }
    }

    /// Reporter that draws nothing but still prints lines.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update scanning progress counters.
    pub fn update_scan(&self, pass: ScanPass, entries_seen: u64) {
        self.bar
            .set_message(format!("Scanning {}... {} entries", pass.label(), entries_seen));
    }

    /// Mark completion of the scan passes.
    pub fn finish_scan(&self, stats: &PlanStats) {
        self.bar.set_message(format!(
            "Planned {} delete(s), {} overwrite(s), {} copy(ies)",
            stats.delete_count, stats.overwrite_count, stats.copy_count
        ));
        self.bar.finish_and_clear();
    }

    /// Print one line without tearing the spinner.
    pub fn line(&self, text: &str) {
        self.bar.suspend(|| println!("{}", text));
    }

    /// Print the progress line for an execution event, if it has one.
    pub fn event(&self, event: &ExecutionEvent) {
        if let Some(text) = format_event(event) {
            self.line(&text);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress line for an execution event.
///
/// Failures are not printed here; they are collected for the final report.
pub fn format_event(event: &ExecutionEvent) -> Option<String> {
    match event {
        ExecutionEvent::ActionSuccess { action, .. } => Some(match action {
            Action::Delete(entry) if entry.is_dir() => {
                format!("Deleted directory: {}", entry.path.display())
            }
            Action::Delete(entry) => format!("Deleted {}", entry.path.display()),
            Action::Overwrite(transfer) => format!("Overwritten {}", transfer.target.display()),
            Action::Copy(transfer) => format!(
                "Copied {} to {}",
                transfer.source.display(),
                transfer.target.display()
            ),
        }),
        ExecutionEvent::ActionError { .. } | ExecutionEvent::DestructiveSkipped { .. } => None,
        ExecutionEvent::Complete { stats } => {
            tracing::info!(
                deleted = stats.deleted,
                overwritten = stats.overwritten,
                copied = stats.copied,
                failed = stats.failed,
                "sync finished, {} written",
                HumanBytes(stats.bytes_copied)
            );
            None
        }
    }
}
