//! bulk-rename - Parallel Recursive Rename Engine
//!
//! Renames every file and directory below one or more roots according to a
//! single naming transformation (case changes, word-joining styles,
//! character stripping, sequence numbering, date tagging, extension
//! edits).
//!
//! # Features
//!
//! - **Parallel Walking**: Worker threads share a bounded job queue per
//!   root; file renames are distributed in batches.
//!
//! - **Rename-then-Descend**: A directory is renamed before anything below
//!   it is queued, so no worker ever works on a stale path.
//!
//! - **Never Overwrites**: A rename whose destination already exists is
//!   reported as an error and the entry is left alone.
//!
//! - **Stateful Modes**: Sequence numbering and date tagging keep per-run
//!   state that is consistent across all workers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Renamer                                 │
//! │        RunConfig · RunCounters · NameStateStore                  │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │ one thread per root
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     WalkCoordinator (per root)                   │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐         ┌─────────┐     │
//! │  │Worker 1 │  │Worker 2 │  │Worker 3 │  ...    │Worker N │     │
//! │  └────┬────┘  └────┬────┘  └────┬────┘         └────┬────┘     │
//! │       └────────────┼────────────┼────────────────────┘          │
//! │                    ▼            ▼                               │
//! │            ┌──────────────────────────┐                         │
//! │            │     Work Queue           │                         │
//! │            │  (crossbeam bounded)     │                         │
//! │            │  Directory | Renames     │                         │
//! │            └──────────────────────────┘                         │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │ RenameEvent
//!                               ▼
//!                    ┌──────────────────┐
//!                    │    EventSink     │
//!                    └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```bash
//! # Lowercase everything below ./photos
//! bulk-rename ./photos --mode lower
//!
//! # Number the files of each directory, top level only
//! bulk-rename ./scans --mode sequence --files-only --depth 0
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod progress;
pub mod state;
pub mod transform;
pub mod types;
pub mod walker;

pub use config::{CliArgs, RunConfig, Scope, SequenceStrategy, SymlinkPolicy, Verbosity};
pub use engine::{Renamer, RunSummary};
pub use error::{RenameError, Result};
pub use events::{EventOutcome, EventSink, NullSink, RenameEvent};
pub use state::NameStateStore;
pub use transform::{transform, Transformation};
pub use types::{EntryKind, RenameTask};
