//! Human-readable rendering of plans and error reports

use crate::diff::SyncPlan;
use crate::types::{Entry, ErrorRecord};
use std::collections::HashMap;
use std::path::Path;

/// Groups larger than this collapse to a single line.
pub const COLLAPSE_THRESHOLD: usize = 20;

/// Paths sharing a containing directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryGroup<'a, T> {
    pub directory: &'a Path,
    pub members: Vec<&'a T>,
}

/// Group items by the directory that directly contains them.
///
/// Groups come out in order of first appearance, members in input order.
pub fn group_by_directory<'a, T, F>(items: &'a [T], path_of: F) -> Vec<DirectoryGroup<'a, T>>
where
    F: Fn(&'a T) -> &'a Path,
{
    let mut groups: Vec<DirectoryGroup<'a, T>> = Vec::new();
    let mut index: HashMap<&'a Path, usize> = HashMap::new();

    for item in items {
        let path = path_of(item);
        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        match index.get(directory) {
            Some(&i) => groups[i].members.push(item),
            None => {
                index.insert(directory, groups.len());
                groups.push(DirectoryGroup {
                    directory,
                    members: vec![item],
                });
            }
        }
    }

    groups
}

/// Review lines for the destructive part of a plan: deletions first, then overwrites.
pub fn summarize(plan: &SyncPlan) -> Vec<String> {
    let mut lines = Vec::new();

    for group in group_by_directory(&plan.deletions, |entry: &Entry| entry.path.as_path()) {
        if group.members.len() > COLLAPSE_THRESHOLD {
            lines.push(collapsed_line("Delete", group.directory));
        } else {
            lines.extend(group.members.iter().map(|entry| {
                let noun = if entry.is_dir() { "directory" } else { "file" };
                format!("Delete {}: {}", noun, entry.path.display())
            }));
        }
    }

    for group in group_by_directory(&plan.overwrites, |t| t.target.as_path()) {
        if group.members.len() > COLLAPSE_THRESHOLD {
            lines.push(collapsed_line("Overwrite", group.directory));
        } else {
            lines.extend(
                group
                    .members
                    .iter()
                    .map(|t| format!("Overwrite file: {}", t.target.display())),
            );
        }
    }

    lines
}

/// One line per pending copy, for dry runs.
pub fn copy_lines(plan: &SyncPlan) -> Vec<String> {
    plan.copies
        .iter()
        .map(|t| format!("Copy {} to {}", t.source.display(), t.target.display()))
        .collect()
}

/// End-of-run listing of every failure. Empty input renders nothing.
pub fn format_error_report(records: &[ErrorRecord]) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let mut lines = vec![format!(
        "\nThe sync encountered {} error(s) with the following paths:",
        records.len()
    )];
    lines.extend(records.iter().map(ToString::to_string));

    let mut hints: Vec<&str> = records.iter().filter_map(|r| r.hint).collect();
    hints.sort_unstable();
    hints.dedup();
    lines.extend(hints.into_iter().map(|hint| format!("  Try: {}", hint)));

    Some(lines.join("\n"))
}

fn collapsed_line(verb: &str, directory: &Path) -> String {
    format!(
        "{} {}+ files in directory: {}",
        verb,
        COLLAPSE_THRESHOLD,
        directory.display()
    )
}
