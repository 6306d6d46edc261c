//! Executor module for file operations
//!
//! Runs a plan in three phases:
//! - review: destructive candidates go through a [`ConfirmationGate`]
//! - destructive: deletions then overwrites, only when confirmed
//! - copy: always runs, whatever the review decided
//!
//! A failing action becomes an [`ErrorRecord`] and the batch moves on.

pub mod copy;
pub mod remove;

use crate::diff::SyncPlan;
use crate::types::{Entry, ErrorRecord, Operation, SyncError, Transfer};
use std::fs;
use std::path::Path;

pub use copy::copy_file_preserving;
pub use remove::remove_path_any;

/// Decides whether the destructive phase may run.
///
/// Only consulted when the plan holds deletions or overwrites.
pub trait ConfirmationGate {
    /// Present the pending destructive changes and return whether to apply them.
    fn review(&mut self, plan: &SyncPlan) -> Result<bool, SyncError>;
}

/// One filesystem mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Delete(Entry),
    Overwrite(Transfer),
    Copy(Transfer),
}

impl Action {
    pub fn operation(&self) -> Operation {
        match self {
            Action::Delete(_) => Operation::Delete,
            Action::Overwrite(_) => Operation::Overwrite,
            Action::Copy(_) => Operation::Copy,
        }
    }

    /// Path reported when the action fails
    pub fn subject(&self) -> &Path {
        match self {
            Action::Delete(entry) => &entry.path,
            Action::Overwrite(transfer) => &transfer.target,
            Action::Copy(transfer) => &transfer.source,
        }
    }
}

/// Execution statistics for a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    pub deleted: usize,
    pub overwritten: usize,
    pub copied: usize,
    pub failed: usize,
    /// Aggregate bytes written by overwrites and copies
    pub bytes_copied: u64,
}

/// Events emitted while executing a plan.
#[derive(Debug)]
pub enum ExecutionEvent {
    /// Action succeeded.
    ActionSuccess { action: Action, bytes_copied: u64 },
    /// Action failed but executor continued.
    ActionError { action: Action, record: ErrorRecord },
    /// Destructive candidates existed but were not confirmed.
    DestructiveSkipped { deletes: usize, overwrites: usize },
    /// Plan execution completed (with or without errors).
    Complete { stats: ExecutionStats },
}

/// Optional callback used to receive execution events.
pub type ExecutionCallback<'a> = dyn Fn(&ExecutionEvent) + Send + Sync + 'a;

/// Outcome of running a plan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionReport {
    pub stats: ExecutionStats,

    /// Scan errors carried over from the plan, then action failures in order
    pub errors: Vec<ErrorRecord>,

    /// Whether the destructive phase ran
    pub confirmed: bool,
}

/// Execute a sync plan
///
/// Never aborts part-way: every per-path failure, including a failing
/// confirmation prompt (treated as a decline), ends up in the report.
pub fn execute_plan(
    plan: &SyncPlan,
    gate: &mut dyn ConfirmationGate,
    on_event: Option<&ExecutionCallback<'_>>,
) -> ExecutionReport {
    let mut report = ExecutionReport {
        errors: plan.scan_errors.clone(),
        ..Default::default()
    };

    if plan.has_destructive() {
        report.confirmed = match gate.review(plan) {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!("confirmation failed, skipping destructive changes: {}", err);
                false
            }
        };

        if report.confirmed {
            tracing::info!("destructive phase confirmed");
            for entry in &plan.deletions {
                run_action(Action::Delete(entry.clone()), &mut report, on_event);
            }
            for transfer in &plan.overwrites {
                run_action(Action::Overwrite(transfer.clone()), &mut report, on_event);
            }
        } else {
            tracing::info!("destructive phase declined");
            emit_event(
                on_event,
                ExecutionEvent::DestructiveSkipped {
                    deletes: plan.deletions.len(),
                    overwrites: plan.overwrites.len(),
                },
            );
        }
    }

    for transfer in &plan.copies {
        run_action(Action::Copy(transfer.clone()), &mut report, on_event);
    }

    emit_event(
        on_event,
        ExecutionEvent::Complete {
            stats: report.stats.clone(),
        },
    );

    report
}

fn run_action(
    action: Action,
    report: &mut ExecutionReport,
    on_event: Option<&ExecutionCallback<'_>>,
) {
    match execute_action(&action) {
        Ok(bytes) => {
            match action.operation() {
                Operation::Delete => report.stats.deleted += 1,
                Operation::Overwrite => report.stats.overwritten += 1,
                Operation::Copy => report.stats.copied += 1,
                Operation::Scan => {}
            }
            report.stats.bytes_copied += bytes;
            emit_event(
                on_event,
                ExecutionEvent::ActionSuccess {
                    action,
                    bytes_copied: bytes,
                },
            );
        }
        Err(err) => {
            let record = ErrorRecord::new(action.subject(), action.operation(), &err);
            tracing::warn!("{}", record);
            report.stats.failed += 1;
            report.errors.push(record.clone());
            emit_event(on_event, ExecutionEvent::ActionError { action, record });
        }
    }
}

fn execute_action(action: &Action) -> Result<u64, SyncError> {
    match action {
        Action::Delete(entry) => remove_path_any(&entry.path).map(|_| 0),
        Action::Overwrite(transfer) => copy_file_preserving(&transfer.source, &transfer.target),
        Action::Copy(transfer) => {
            // Not rolled back if the copy below fails
            if let Some(parent) = transfer.target.parent() {
                fs::create_dir_all(parent).map_err(|e| SyncError::from_io(parent, e))?;
            }
            copy_file_preserving(&transfer.source, &transfer.target)
        }
    }
}

fn emit_event(on_event: Option<&ExecutionCallback<'_>>, event: ExecutionEvent) {
    if let Some(callback) = on_event {
        callback(&event);
    }
}
