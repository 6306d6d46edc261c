//! Sequential tree walker

use crate::config::{is_excluded_name, Config};
use crate::types::{Entry, EntryKind, SyncError};
use ignore::{DirEntry, Walk, WalkBuilder};
use std::path::{Path, PathBuf};

/// Lazy top-down walk over every entry below a tree root.
///
/// Excluded directory names are pruned at any depth (never descended into),
/// the root itself is not yielded, and the running executable is skipped.
/// Symlinks are reported as files and never followed. Siblings are visited
/// in file-name order so repeated runs produce identical candidate lists.
pub struct TreeWalker {
    inner: Walk,
    self_path: Option<PathBuf>,
}

impl TreeWalker {
    pub fn new(root: &Path, config: &Config) -> Self {
        let excluded = config.exclude_dirs.clone();

        // No .gitignore/.ignore/hidden-file filtering: a mirror copies everything.
        let inner = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| !is_excluded_dir(entry, &excluded))
            .build();

        Self {
            inner,
            self_path: config.self_path.clone(),
        }
    }
}

impl Iterator for TreeWalker {
    type Item = Result<Entry, SyncError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(SyncError::Walk(err))),
            };

            if entry.depth() == 0 {
                continue;
            }

            if self.self_path.as_deref() == Some(entry.path()) {
                tracing::debug!("skipping own executable {}", entry.path().display());
                continue;
            }

            // Special files (pipes, sockets, devices) are never reconciled
            let Some(kind) = entry.file_type().and_then(EntryKind::from_file_type) else {
                continue;
            };

            return Some(Ok(Entry::new(entry.into_path(), kind)));
        }
    }
}

/// Directories below `root`, children before parents.
///
/// Reversing a pre-order walk places every descendant ahead of its
/// ancestors, which is the order recursive deletes must run in.
pub fn scan_dirs_bottom_up(
    root: &Path,
    config: &Config,
) -> impl Iterator<Item = Result<Entry, SyncError>> {
    let mut dirs: Vec<Result<Entry, SyncError>> = TreeWalker::new(root, config)
        .filter(|item| match item {
            Ok(entry) => entry.is_dir(),
            Err(_) => true,
        })
        .collect();
    dirs.reverse();
    dirs.into_iter()
}

/// Path a walk error refers to, when the walker recorded one.
pub fn walk_error_path(error: &ignore::Error) -> Option<&Path> {
    match error {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::Loop { child, .. } => Some(child),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            walk_error_path(err)
        }
        _ => None,
    }
}

fn is_excluded_dir(entry: &DirEntry, excluded: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_some_and(|ft| ft.is_dir())
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| is_excluded_name(excluded, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn collect(root: &Path, config: &Config) -> Vec<Entry> {
        TreeWalker::new(root, config)
            .collect::<Result<Vec<_>, _>>()
            .expect("walk succeeds")
    }

    fn relative(root: &Path, entries: &[Entry]) -> Vec<String> {
        entries
            .iter()
            .map(|e| {
                e.path
                    .strip_prefix(root)
                    .expect("entry under root")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_walk_empty_directory() {
        let temp = TempDir::new().expect("create temp dir");
        let entries = collect(temp.path(), &Config::default());
        assert!(entries.is_empty(), "root itself must not be yielded");
    }

    #[test]
    fn test_walk_nested_is_top_down_and_sorted() {
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path();
        fs::create_dir_all(root.join("a/b")).expect("create dirs");
        fs::write(root.join("a/b/file.txt"), b"x").expect("write nested");
        fs::write(root.join("z.txt"), b"z").expect("write z");

        let entries = collect(root, &Config::default());

        assert_eq!(relative(root, &entries), vec!["a", "a/b", "a/b/file.txt", "z.txt"]);
        assert!(entries[0].is_dir());
        assert_eq!(entries[2].kind, EntryKind::File);
    }

    #[test]
    fn test_walk_includes_hidden_and_gitignored_files() {
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path();
        fs::create_dir(root.join(".git")).expect("create .git");
        fs::write(root.join(".gitignore"), "*.log\n").expect("write gitignore");
        fs::write(root.join("build.log"), b"log").expect("write log");

        let names = relative(root, &collect(root, &Config::default()));
        assert!(names.contains(&".gitignore".to_string()));
        assert!(names.contains(&"build.log".to_string()));
        assert!(names.contains(&".git".to_string()));
    }

    #[test]
    fn test_walk_prunes_excluded_dirs_at_any_depth() {
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path();
        fs::create_dir_all(root.join("System Volume Information")).expect("create top excluded");
        fs::write(root.join("System Volume Information/IndexerVolumeGuid"), b"x")
            .expect("write excluded file");
        fs::create_dir_all(root.join("deep/cache/inner")).expect("create nested excluded");
        fs::write(root.join("deep/cache/inner/blob"), b"x").expect("write nested blob");
        fs::write(root.join("deep/keep.txt"), b"k").expect("write keep");

        let config = Config {
            exclude_dirs: vec!["System Volume Information".to_string(), "cache".to_string()],
            ..Config::default()
        };
        let names = relative(root, &collect(root, &config));

        assert_eq!(names, vec!["deep", "deep/keep.txt"]);
    }

    #[test]
    fn test_walk_excludes_only_directories_by_name() {
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path();
        fs::write(root.join("cache"), b"a file named like an excluded dir").expect("write file");

        let config = Config {
            exclude_dirs: vec!["cache".to_string()],
            ..Config::default()
        };
        let names = relative(root, &collect(root, &config));
        assert_eq!(names, vec!["cache"]);
    }

    #[test]
    fn test_walk_skips_self_path_only() {
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path();
        fs::create_dir(root.join("bin")).expect("create bin");
        fs::write(root.join("bin/treesync"), b"exe").expect("write self");
        fs::write(root.join("treesync"), b"same name, different file").expect("write namesake");

        let config = Config {
            self_path: Some(root.join("bin/treesync")),
            ..Config::default()
        };
        let names = relative(root, &collect(root, &config));

        assert_eq!(names, vec!["bin", "treesync"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_walk_reports_symlinks_as_files_without_following() {
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path();
        fs::create_dir(root.join("real")).expect("create real dir");
        fs::write(root.join("real/inside.txt"), b"x").expect("write inside");
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).expect("symlink dir");

        let entries = collect(root, &Config::default());
        let link = entries
            .iter()
            .find(|e| e.path == root.join("link"))
            .expect("link entry present");

        assert_eq!(link.kind, EntryKind::File);
        assert!(!entries.iter().any(|e| e.path == root.join("link/inside.txt")));
    }

    #[test]
    fn test_bottom_up_yields_children_before_parents() {
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path();
        fs::create_dir_all(root.join("a/b/c")).expect("create a/b/c");
        fs::create_dir_all(root.join("d")).expect("create d");
        fs::write(root.join("a/b/file.txt"), b"x").expect("write file");

        let dirs: Vec<Entry> = scan_dirs_bottom_up(root, &Config::default())
            .collect::<Result<_, _>>()
            .expect("bottom-up walk");

        let names = relative(root, &dirs);
        assert_eq!(names, vec!["d", "a/b/c", "a/b", "a"]);
        assert!(dirs.iter().all(Entry::is_dir));
    }

    #[test]
    fn test_walk_missing_root_yields_error() {
        let temp = TempDir::new().expect("create temp dir");
        let missing = temp.path().join("missing");

        let results: Vec<_> = TreeWalker::new(&missing, &Config::default()).collect();
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| matches!(r, Err(SyncError::Walk(_)))));
    }
}
