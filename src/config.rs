//! Configuration types for bulk-rename
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - The validated, immutable [`RunConfig`] handed to the engine
//! - A builder for constructing a `RunConfig` from code

use crate::error::ConfigError;
use crate::transform::Transformation;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Maximum reasonable worker count
pub const MAX_WORKERS: usize = 512;

/// Batch size limits
pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 100_000;

/// Default rename batch sizes
pub const DEFAULT_FILE_BATCH: usize = 100;
pub const DEFAULT_DIR_BATCH: usize = 100;

/// Recursive bulk renamer
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bulk-rename",
    version,
    about = "Recursively rename files and directories with case, numbering, date and stripping rules",
    after_help = "EXAMPLES:\n    \
        bulk-rename ./photos -m lower\n    \
        bulk-rename ./docs ./notes -m snake --depth 1 --files-only\n    \
        bulk-rename ./album -m sequence --files-only --verbosity all\n    \
        bulk-rename ./Reports -m rdate --include-parent"
)]
pub struct CliArgs {
    /// Paths to rename under
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Transformation to apply
    #[arg(short, long, value_enum, value_name = "MODE")]
    pub mode: Transformation,

    /// Maximum directory depth (-1 for unlimited)
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true, value_name = "NUM")]
    pub depth: i64,

    /// Only rename files (directories are still traversed)
    #[arg(long, conflicts_with = "dirs_only")]
    pub files_only: bool,

    /// Only rename directories
    #[arg(long)]
    pub dirs_only: bool,

    /// Also rename the given paths themselves
    #[arg(short = 'p', long)]
    pub include_parent: bool,

    /// Rename symlink nodes instead of skipping them (targets are never followed)
    #[arg(short = 's', long)]
    pub follow_symlinks: bool,

    /// Number of worker threads, shared by all paths
    #[arg(short = 'w', long, default_value_t = default_workers(), value_name = "NUM")]
    pub workers: usize,

    /// Files per rename batch
    #[arg(long, default_value_t = DEFAULT_FILE_BATCH, value_name = "NUM")]
    pub file_batch: usize,

    /// Directories per rename batch
    #[arg(long, default_value_t = DEFAULT_DIR_BATCH, value_name = "NUM")]
    pub dir_batch: usize,

    /// Which per-item events to print
    #[arg(long, value_enum, default_value_t = Verbosity::Renamed)]
    pub verbosity: Verbosity,

    /// Keep existing numbers and number new entries from the first gap
    #[arg(long)]
    pub sequence_resume: bool,

    /// Quiet mode - no header, spinner or summary
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Debug logging
    #[arg(long)]
    pub debug: bool,
}

fn default_workers() -> usize {
    num_cpus::get().clamp(1, MAX_WORKERS)
}

/// Which entries a run renames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Files,
    Directories,
    Both,
}

impl Scope {
    pub fn files(&self) -> bool {
        matches!(self, Scope::Files | Scope::Both)
    }

    pub fn directories(&self) -> bool {
        matches!(self, Scope::Directories | Scope::Both)
    }
}

/// What to do with symlinks found during traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymlinkPolicy {
    /// Leave the link alone and count it as skipped
    Skip,
    /// Rename the link node itself
    Include,
}

/// Which per-item events are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Verbosity {
    /// Errors only
    Silent,
    /// Renamed items
    Renamed,
    /// Renamed and skipped items
    All,
    /// Skipped items only
    Skipped,
}

impl Verbosity {
    pub fn shows_renamed(&self) -> bool {
        matches!(self, Verbosity::Renamed | Verbosity::All)
    }

    pub fn shows_skipped(&self) -> bool {
        matches!(self, Verbosity::Skipped | Verbosity::All)
    }
}

/// How the `sequence` mode numbers a sibling set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStrategy {
    /// Renumber all siblings 1..N in base-name order
    Renumber,
    /// Keep existing numbers, give unnumbered names the next free number
    Resume,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Absolute root paths, no duplicates, none nested in another
    pub roots: Vec<PathBuf>,

    /// Transformation for the whole run
    pub mode: Transformation,

    /// Files, directories or both
    pub scope: Scope,

    /// Rename the roots themselves
    pub include_parents: bool,

    /// Maximum traversal depth (None = unlimited)
    pub max_depth: Option<usize>,

    /// Symlink handling
    pub symlinks: SymlinkPolicy,

    /// Files per rename batch
    pub file_batch_size: usize,

    /// Directories per rename batch
    pub dir_batch_size: usize,

    /// Worker threads across all roots
    pub worker_count: usize,

    /// Event filter
    pub verbosity: Verbosity,

    /// Sequence numbering strategy
    pub sequence: SequenceStrategy,

    /// Show header, spinner and summary
    pub show_progress: bool,

    /// Debug logging
    pub debug: bool,
}

impl RunConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let scope = match (args.files_only, args.dirs_only) {
            (true, true) => return Err(ConfigError::EmptyScope),
            (true, false) => Scope::Files,
            (false, true) => Scope::Directories,
            (false, false) => Scope::Both,
        };

        RunConfigBuilder::new(args.paths, args.mode)
            .scope(scope)
            .depth(args.depth)
            .include_parents(args.include_parent)
            .symlinks(if args.follow_symlinks {
                SymlinkPolicy::Include
            } else {
                SymlinkPolicy::Skip
            })
            .workers(args.workers)
            .batch_sizes(args.file_batch, args.dir_batch)
            .verbosity(args.verbosity)
            .sequence(if args.sequence_resume {
                SequenceStrategy::Resume
            } else {
                SequenceStrategy::Renumber
            })
            .show_progress(!args.quiet)
            .debug(args.debug)
            .build()
    }

    /// Start building a configuration in code
    pub fn builder<P: Into<PathBuf>>(roots: impl IntoIterator<Item = P>, mode: Transformation) -> RunConfigBuilder {
        RunConfigBuilder::new(roots.into_iter().map(Into::into).collect(), mode)
    }

    /// Whether children of a directory at `depth` are enumerated
    pub fn descends_into(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth <= max)
    }
}

/// Builder for [`RunConfig`]; `build()` performs all validation
#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    roots: Vec<PathBuf>,
    mode: Transformation,
    scope: Scope,
    include_parents: bool,
    depth: i64,
    symlinks: SymlinkPolicy,
    file_batch_size: usize,
    dir_batch_size: usize,
    worker_count: usize,
    verbosity: Verbosity,
    sequence: SequenceStrategy,
    show_progress: bool,
    debug: bool,
}

impl RunConfigBuilder {
    fn new(roots: Vec<PathBuf>, mode: Transformation) -> Self {
        Self {
            roots,
            mode,
            scope: Scope::Both,
            include_parents: false,
            depth: -1,
            symlinks: SymlinkPolicy::Skip,
            file_batch_size: DEFAULT_FILE_BATCH,
            dir_batch_size: DEFAULT_DIR_BATCH,
            worker_count: default_workers(),
            verbosity: Verbosity::Renamed,
            sequence: SequenceStrategy::Renumber,
            show_progress: false,
            debug: false,
        }
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// -1 = unlimited
    pub fn depth(mut self, depth: i64) -> Self {
        self.depth = depth;
        self
    }

    pub fn include_parents(mut self, include: bool) -> Self {
        self.include_parents = include;
        self
    }

    pub fn symlinks(mut self, policy: SymlinkPolicy) -> Self {
        self.symlinks = policy;
        self
    }

    pub fn workers(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    pub fn batch_sizes(mut self, files: usize, dirs: usize) -> Self {
        self.file_batch_size = files;
        self.dir_batch_size = dirs;
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn sequence(mut self, strategy: SequenceStrategy) -> Self {
        self.sequence = strategy;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate everything; nothing on disk is touched
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        if self.worker_count == 0 || self.worker_count > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: self.worker_count,
                max: MAX_WORKERS,
            });
        }

        for (which, size) in [("file", self.file_batch_size), ("directory", self.dir_batch_size)] {
            if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&size) {
                return Err(ConfigError::InvalidBatchSize {
                    which,
                    size,
                    min: MIN_BATCH_SIZE,
                    max: MAX_BATCH_SIZE,
                });
            }
        }

        let max_depth = match self.depth {
            -1 => None,
            d if d >= 0 => Some(d as usize),
            d => return Err(ConfigError::InvalidDepth { depth: d }),
        };

        let roots = resolve_roots(&self.roots)?;

        Ok(RunConfig {
            roots,
            mode: self.mode,
            scope: self.scope,
            include_parents: self.include_parents,
            max_depth,
            symlinks: self.symlinks,
            file_batch_size: self.file_batch_size,
            dir_batch_size: self.dir_batch_size,
            worker_count: self.worker_count,
            verbosity: self.verbosity,
            sequence: self.sequence,
            show_progress: self.show_progress,
            debug: self.debug,
        })
    }
}

/// Make roots absolute, check they exist, drop duplicates and nested roots.
///
/// The parent directory is canonicalized but the final component is kept
/// as given, so a root that is itself a symlink stays the link.
fn resolve_roots(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ConfigError> {
    if paths.is_empty() {
        return Err(ConfigError::NoRoots);
    }

    let mut roots: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for path in paths {
        if std::fs::symlink_metadata(path).is_err() {
            return Err(ConfigError::RootNotFound { path: path.clone() });
        }
        roots.push(resolve_root(path)?);
    }

    roots.sort();
    roots.dedup();

    // After sorting, a nested root follows the root that contains it
    let mut kept: Vec<PathBuf> = Vec::with_capacity(roots.len());
    for root in roots {
        match kept.iter().find(|outer| root.starts_with(outer)) {
            Some(outer) => warn!(
                root = %root.display(),
                inside = %outer.display(),
                "Dropping root nested inside another root"
            ),
            None => kept.push(root),
        }
    }

    Ok(kept)
}

fn resolve_root(path: &Path) -> Result<PathBuf, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidRoot {
        path: path.to_path_buf(),
        reason,
    };

    let absolute = std::path::absolute(path).map_err(|e| invalid(e.to_string()))?;

    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = std::fs::canonicalize(parent).map_err(|e| invalid(e.to_string()))?;
            Ok(parent.join(name))
        }
        // "/", "..", "." and friends
        _ => std::fs::canonicalize(&absolute).map_err(|e| invalid(e.to_string())),
    }
}
