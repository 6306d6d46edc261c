//! Classification - Decisions produced by the entry classifier

use std::fmt;

/// What reconciliation will do with one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Target entry has no source counterpart
    Delete,

    /// Target file is older than its source counterpart beyond tolerance
    Overwrite,

    /// Source file is missing from the target, or newer beyond tolerance
    Copy,

    /// Nothing to do
    Unchanged,
}

/// Outcome of comparing a target file's mtime against its source file's
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// Timestamps within the tolerance window
    Same,

    /// Target was modified later than source; target wins
    TargetNewer,

    /// Target is older than source; replace it
    TargetOlder,
}

/// Filesystem operation an error record is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    /// Metadata read while classifying
    Scan,
    Delete,
    Overwrite,
    Copy,
}

impl Operation {
    /// Gerund used in report lines ("Error deleting ...")
    pub fn verb(self) -> &'static str {
        match self {
            Operation::Scan => "reading",
            Operation::Delete => "deleting",
            Operation::Overwrite => "overwriting",
            Operation::Copy => "copying",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::Scan => "Scan",
            Operation::Delete => "Delete",
            Operation::Overwrite => "Overwrite",
            Operation::Copy => "Copy",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_labels() {
        assert_eq!(Operation::Delete.verb(), "deleting");
        assert_eq!(Operation::Copy.to_string(), "Copy");
    }
}
