//! Error types for bulk-rename
//!
//! This module defines the error hierarchy for the rename engine:
//! - Configuration errors (fatal, raised before any rename happens)
//! - Worker thread errors
//! - Per-item rename failures (never fatal, converted to counters/events)
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Only configuration and worker setup errors cross the engine boundary
//! - A failed rename is data, not an `Err`

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the rename engine
#[derive(Error, Debug)]
pub enum RenameError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No root path given
    #[error("No paths given: at least one root path is required")]
    NoRoots,

    /// Root path does not exist
    #[error("Path not found: '{path}'")]
    RootNotFound { path: PathBuf },

    /// Root path cannot be resolved
    #[error("Invalid path '{path}': {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid batch size
    #[error("Invalid {which} batch size {size}: must be between {min} and {max}")]
    InvalidBatchSize {
        which: &'static str,
        size: usize,
        min: usize,
        max: usize,
    },

    /// Invalid depth
    #[error("Invalid depth {depth}: use -1 for unlimited or a value >= 0")]
    InvalidDepth { depth: i64 },

    /// Neither files nor directories selected
    #[error("Nothing to rename: --files-only and --dirs-only are mutually exclusive")]
    EmptyScope,
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked: {message}")]
    Panicked { id: usize, message: String },

    /// Worker thread could not be started
    #[error("Failed to initialize worker {id}: {reason}")]
    InitFailed { id: usize, reason: String },
}

/// Why a single rename did not happen
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenameFailure {
    /// Permission denied on source or destination directory
    #[error("permission denied")]
    PermissionDenied,

    /// Something already exists at the destination
    #[error("destination already exists")]
    DestinationExists,

    /// Source disappeared before it could be renamed
    #[error("source no longer exists")]
    SourceMissing,

    /// Any other I/O failure
    #[error("{message}")]
    Io { kind: io::ErrorKind, message: String },
}

impl RenameFailure {
    /// True if the failure is a name collision at the destination
    pub fn is_collision(&self) -> bool {
        matches!(self, RenameFailure::DestinationExists)
    }
}

impl From<io::Error> for RenameFailure {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => RenameFailure::PermissionDenied,
            io::ErrorKind::AlreadyExists => RenameFailure::DestinationExists,
            io::ErrorKind::NotFound => RenameFailure::SourceMissing,
            kind => RenameFailure::Io {
                kind,
                message: err.to_string(),
            },
        }
    }
}

/// Result type alias for RenameError
pub type Result<T> = std::result::Result<T, RenameError>;

/// Represents the outcome of walking a single directory
#[derive(Debug)]
pub enum WalkOutcome {
    /// Listed and processed the directory
    Success {
        path: PathBuf,
        entries: usize,
        subdirs: usize,
    },

    /// Not enumerated (depth limit reached)
    Skipped { path: PathBuf, reason: String },

    /// Could not be read; its subtree is skipped
    Failed { path: PathBuf, reason: String },
}
