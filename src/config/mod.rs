//! Configuration management
//!
//! Resolution order: built-in defaults, then an optional TOML settings file,
//! then command-line flags.

use crate::types::SyncError;
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory names never descended into nor deleted.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &["System Volume Information"];

/// Timestamps closer than this are treated as equal (FAT stores mtimes at 2s granularity).
pub const DEFAULT_TIME_TOLERANCE: Duration = Duration::from_secs(2);

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(
    name = "treesync",
    version,
    about = "Mirror a source directory tree onto a target tree"
)]
pub struct Cli {
    /// The source directory for the files
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// The target directory for the files
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// TOML settings file with default roots and exclusions
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Additional directory name to skip at any depth (repeatable)
    #[arg(long = "exclude-dir", value_name = "NAME")]
    pub exclude_dirs: Vec<String>,

    /// Show what would change without touching the filesystem
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Proceed with deletions and overwrites without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Never swap source and target based on the working directory
    #[arg(long)]
    pub no_swap: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Settings file contents. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub source: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub exclude_dirs: Option<Vec<String>>,
    pub time_tolerance_secs: Option<f64>,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let text = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!(
                "Cannot read settings file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&text)
            .map_err(|e| SyncError::Config(format!("{} ({})", e, path.display())))
    }

    /// Parse settings from TOML text
    pub fn parse(text: &str) -> Result<Self, SyncError> {
        toml::from_str(text).map_err(|e| SyncError::Config(format!("Invalid settings: {}", e)))
    }
}

/// Resolved configuration for one sync run
#[derive(Debug, Clone)]
pub struct Config {
    /// Source tree root
    pub source: PathBuf,

    /// Target tree root (made to mirror source)
    pub target: PathBuf,

    /// Directory names skipped at any depth
    pub exclude_dirs: Vec<String>,

    /// Window within which two mtimes count as equal
    pub time_tolerance: Duration,

    /// The running executable, never scanned
    pub self_path: Option<PathBuf>,

    /// Dry run (show plan, don't execute)
    pub dry_run: bool,

    /// Confirm destructive changes without prompting
    pub assume_yes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            target: PathBuf::new(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            time_tolerance: DEFAULT_TIME_TOLERANCE,
            self_path: None,
            dry_run: false,
            assume_yes: false,
        }
    }
}

impl Config {
    /// Merge settings and CLI flags on top of the defaults.
    ///
    /// Roots are taken as given; orientation and canonicalization are left
    /// to the caller.
    pub fn from_parts(settings: Settings, cli: &Cli) -> Result<Self, SyncError> {
        let defaults = Config::default();

        let source = cli
            .source
            .clone()
            .or(settings.source)
            .ok_or_else(|| SyncError::Config("No source directory given".to_string()))?;
        let target = cli
            .target
            .clone()
            .or(settings.target)
            .ok_or_else(|| SyncError::Config("No target directory given".to_string()))?;

        let mut exclude_dirs = settings.exclude_dirs.unwrap_or(defaults.exclude_dirs);
        for name in &cli.exclude_dirs {
            if !exclude_dirs.contains(name) {
                exclude_dirs.push(name.clone());
            }
        }

        let time_tolerance = match settings.time_tolerance_secs {
            Some(secs) => Duration::try_from_secs_f64(secs).map_err(|_| {
                SyncError::Config(format!("Invalid time tolerance: {} seconds", secs))
            })?,
            None => defaults.time_tolerance,
        };

        Ok(Self {
            source,
            target,
            exclude_dirs,
            time_tolerance,
            self_path: None,
            dry_run: cli.dry_run,
            assume_yes: cli.yes,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SyncError> {
        for (label, root) in [("Source", &self.source), ("Target", &self.target)] {
            if !root.is_dir() {
                return Err(SyncError::Config(format!(
                    "{} path is not an existing directory: {}",
                    label,
                    root.display()
                )));
            }
        }

        if self.source == self.target {
            return Err(SyncError::Config(
                "Source and target cannot be the same".to_string(),
            ));
        }

        if self.source.starts_with(&self.target) || self.target.starts_with(&self.source) {
            return Err(SyncError::Validation(format!(
                "Source {} and target {} must not contain each other",
                self.source.display(),
                self.target.display()
            )));
        }

        Ok(())
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let settings = match &cli.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        Config::from_parts(settings, &cli)
    }
}

/// Whether `name` is one of the excluded directory names.
///
/// Matching is exact and case-sensitive.
pub fn is_excluded_name(excluded: &[String], name: &str) -> bool {
    excluded.iter().any(|candidate| candidate == name)
}

/// Decide which root is the source from where the tool runs.
///
/// Running from inside the nominal target keeps the roles; running from
/// anywhere else swaps them, so the tree the tool lives in is always the
/// one being updated.
pub fn orient_roots(cwd: &Path, source: PathBuf, target: PathBuf) -> (PathBuf, PathBuf) {
    if cwd.starts_with(&target) {
        (source, target)
    } else {
        (target, source)
    }
}
