//! Reconciliation planning
//!
//! Three independent walks produce the three candidate sets:
//! 1. target, top-down, files: delete or overwrite
//! 2. target, bottom-up, directories: delete
//! 3. source, top-down, files: copy

use crate::diff::Classifier;
use crate::scanner::{scan_dirs_bottom_up, walk_error_path, TreeWalker};
use crate::types::{Classification, Entry, ErrorRecord, Operation, SyncError, Transfer};
use crate::Config;
use std::path::Path;

/// Which of the three walks is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPass {
    Target,
    TargetDirectories,
    Source,
}

impl ScanPass {
    pub fn label(self) -> &'static str {
        match self {
            ScanPass::Target => "target",
            ScanPass::TargetDirectories => "target directories",
            ScanPass::Source => "source",
        }
    }
}

/// Callback for reporting scan progress
///
/// Arguments:
/// - `pass`: the walk currently running
/// - `entries_seen`: entries examined so far in that walk
pub type ProgressCallback<'a> = dyn Fn(ScanPass, u64) + Send + Sync + 'a;

/// Candidate sets for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    /// Target files, then target directories children-first
    pub deletions: Vec<Entry>,

    /// Stale target files with the source file that replaces each
    pub overwrites: Vec<Transfer>,

    /// Source files missing from the target
    pub copies: Vec<Transfer>,

    /// Entries that could not be classified
    pub scan_errors: Vec<ErrorRecord>,
}

impl SyncPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything needs confirmation
    pub fn has_destructive(&self) -> bool {
        !self.deletions.is_empty() || !self.overwrites.is_empty()
    }

    /// Whether the run would change nothing
    pub fn is_empty(&self) -> bool {
        !self.has_destructive() && self.copies.is_empty()
    }

    pub fn stats(&self) -> PlanStats {
        PlanStats {
            delete_count: self.deletions.len(),
            overwrite_count: self.overwrites.len(),
            copy_count: self.copies.len(),
            scan_error_count: self.scan_errors.len(),
        }
    }
}

/// Statistics about a sync plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanStats {
    pub delete_count: usize,
    pub overwrite_count: usize,
    pub copy_count: usize,
    pub scan_error_count: usize,
}

/// Build the plan for reconciling `config.target` against `config.source`.
///
/// Entries whose metadata cannot be read are recorded in `scan_errors` and
/// left out of every candidate set. A stale target file is both an
/// overwrite and a copy candidate: the copy runs even when destructive
/// changes are declined, and repeats a confirmed overwrite harmlessly.
///
/// # Example
/// ```
/// use treesync::diff::build_plan;
/// use treesync::Config;
///
/// let src = tempfile::tempdir()?;
/// let dst = tempfile::tempdir()?;
/// std::fs::write(src.path().join("new.txt"), b"hello")?;
///
/// let config = Config {
///     source: src.path().to_path_buf(),
///     target: dst.path().to_path_buf(),
///     ..Config::default()
/// };
/// let plan = build_plan(&config, None);
/// assert_eq!(plan.copies.len(), 1);
/// assert!(!plan.has_destructive());
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn build_plan(config: &Config, on_progress: Option<&ProgressCallback<'_>>) -> SyncPlan {
    let classifier = Classifier::from_config(config);
    let mut plan = SyncPlan::new();

    scan_target_files(config, &classifier, &mut plan, on_progress);
    scan_target_dirs(config, &classifier, &mut plan, on_progress);
    scan_source_files(config, &classifier, &mut plan, on_progress);

    let stats = plan.stats();
    tracing::info!(
        deletes = stats.delete_count,
        overwrites = stats.overwrite_count,
        copies = stats.copy_count,
        scan_errors = stats.scan_error_count,
        "plan built"
    );

    plan
}

fn scan_target_files(
    config: &Config,
    classifier: &Classifier,
    plan: &mut SyncPlan,
    on_progress: Option<&ProgressCallback<'_>>,
) {
    let mut seen = 0u64;
    for item in TreeWalker::new(&config.target, config) {
        seen += 1;
        report(on_progress, ScanPass::Target, seen);

        let entry = match item {
            Ok(entry) if entry.is_dir() => continue,
            Ok(entry) => entry,
            Err(err) => {
                plan.scan_errors.push(walk_record(&config.target, &err));
                continue;
            }
        };

        match classifier.classify_target(&entry) {
            Ok(Classification::Delete) => plan.deletions.push(entry),
            Ok(Classification::Overwrite) => {
                if let Some(source) = classifier.correspondence().to_source(&entry.path) {
                    plan.overwrites.push(Transfer::new(source, entry.path));
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!("skipping {}: {}", entry.path.display(), err);
                plan.scan_errors
                    .push(ErrorRecord::new(&entry.path, Operation::Scan, &err));
            }
        }
    }
}

fn scan_target_dirs(
    config: &Config,
    classifier: &Classifier,
    plan: &mut SyncPlan,
    on_progress: Option<&ProgressCallback<'_>>,
) {
    let mut seen = 0u64;
    for item in scan_dirs_bottom_up(&config.target, config) {
        seen += 1;
        report(on_progress, ScanPass::TargetDirectories, seen);

        let entry = match item {
            Ok(entry) => entry,
            // Already recorded by the top-down pass over the same tree
            Err(_) => continue,
        };

        match classifier.classify_target(&entry) {
            Ok(Classification::Delete) => plan.deletions.push(entry),
            Ok(_) => {}
            Err(err) => {
                tracing::warn!("skipping {}: {}", entry.path.display(), err);
                plan.scan_errors
                    .push(ErrorRecord::new(&entry.path, Operation::Scan, &err));
            }
        }
    }
}

fn scan_source_files(
    config: &Config,
    classifier: &Classifier,
    plan: &mut SyncPlan,
    on_progress: Option<&ProgressCallback<'_>>,
) {
    let mut seen = 0u64;
    for item in TreeWalker::new(&config.source, config) {
        seen += 1;
        report(on_progress, ScanPass::Source, seen);

        let entry = match item {
            Ok(entry) if entry.is_dir() => continue,
            Ok(entry) => entry,
            Err(err) => {
                plan.scan_errors.push(walk_record(&config.source, &err));
                continue;
            }
        };

        match classifier.classify_source_file(&entry.path) {
            Ok((Classification::Copy, target)) => {
                if config.self_path.as_ref() == Some(&target) {
                    continue;
                }
                plan.copies.push(Transfer::new(entry.path, target));
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!("skipping {}: {}", entry.path.display(), err);
                plan.scan_errors
                    .push(ErrorRecord::new(&entry.path, Operation::Scan, &err));
            }
        }
    }
}

fn walk_record(root: &Path, err: &SyncError) -> ErrorRecord {
    let path = match err {
        SyncError::Walk(inner) => walk_error_path(inner).unwrap_or(root),
        _ => root,
    };
    tracing::warn!("walk error under {}: {}", root.display(), err);
    ErrorRecord::new(path, Operation::Scan, err)
}

fn report(on_progress: Option<&ProgressCallback<'_>>, pass: ScanPass, seen: u64) {
    if let Some(callback) = on_progress {
        callback(pass, seen);
    }
}
