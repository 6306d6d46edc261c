//! Diff engine - Correspondence, classification and plan generation

mod compare;
mod correspond;
mod plan;

pub use compare::{needs_copy, staleness, Classifier};
pub use correspond::{rebase, Correspondence};
pub use plan::{build_plan, PlanStats, ProgressCallback, ScanPass, SyncPlan};
