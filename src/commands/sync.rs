//! Main sync command

use crate::diff::{build_plan, PlanStats, ScanPass, SyncPlan};
use crate::executor::{execute_plan, ConfirmationGate, ExecutionEvent, ExecutionStats};
use crate::types::{ErrorRecord, SyncError};
use crate::ui::{copy_lines, format_error_report, summarize, ProgressReporter};
use crate::Config;

/// What a run planned and what it did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub plan_counts: PlanStats,
    pub stats: ExecutionStats,

    /// Scan failures, then action failures in execution order
    pub errors: Vec<ErrorRecord>,

    /// Whether deletions and overwrites were applied
    pub confirmed: bool,
}

/// Run the sync operation
///
/// Only an invalid configuration is returned as `Err`. Everything that goes
/// wrong with individual entries is collected into the report and printed
/// at the end.
pub fn run(config: &Config, gate: &mut dyn ConfirmationGate) -> Result<SyncReport, SyncError> {
    config.validate()?;
    run_with_reporter(config, gate, &ProgressReporter::new())
}

fn run_with_reporter(
    config: &Config,
    gate: &mut dyn ConfirmationGate,
    reporter: &ProgressReporter,
) -> Result<SyncReport, SyncError> {
    tracing::info!(
        "syncing {} -> {}",
        config.source.display(),
        config.target.display()
    );

    let on_scan = |pass: ScanPass, seen: u64| reporter.update_scan(pass, seen);
    let plan = build_plan(config, Some(&on_scan));
    let plan_counts = plan.stats();
    reporter.finish_scan(&plan_counts);

    if config.dry_run {
        for line in format_dry_run(&plan) {
            reporter.line(&line);
        }
        print_errors(reporter, &plan.scan_errors);
        return Ok(SyncReport {
            plan_counts,
            errors: plan.scan_errors,
            ..SyncReport::default()
        });
    }

    let on_event = |event: &ExecutionEvent| reporter.event(event);
    let execution = execute_plan(&plan, gate, Some(&on_event));
    print_errors(reporter, &execution.errors);

    Ok(SyncReport {
        plan_counts,
        stats: execution.stats,
        errors: execution.errors,
        confirmed: execution.confirmed,
    })
}

/// Review summary followed by the pending copies
fn format_dry_run(plan: &SyncPlan) -> Vec<String> {
    let mut lines = summarize(plan);
    lines.extend(copy_lines(plan));
    lines
}

fn print_errors(reporter: &ProgressReporter, records: &[ErrorRecord]) {
    if let Some(report) = format_error_report(records) {
        reporter.line(&report);
    }
}
