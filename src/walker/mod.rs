//! Parallel rename walker
//!
//! Each root gets its own coordinator and its own share of the worker
//! threads. Workers of one root share a bounded job queue.
//!
//! # Architecture
//!
//! ```text
//!                     ┌─────────────────────────┐
//!                     │     WalkCoordinator     │
//!                     │  - renames the root     │
//!                     │  - seeds the queue      │
//!                     └───────────┬─────────────┘
//!                                 │ DirTask(root)
//!                                 ▼
//!                     ┌─────────────────────────┐
//!                     │       Work Queue        │◄──────────────┐
//!                     │   Directory | Renames   │               │
//!                     └───────────┬─────────────┘               │
//!       ┌─────────────────────────┼─────────────────────────┐   │
//!       │                         │                         │   │
//! ┌─────▼─────┐             ┌─────▼─────┐             ┌─────▼─────┐
//! │  Worker 1 │             │  Worker 2 │             │  Worker N │
//! │  list dir │             │  execute  │             │  rename   │
//! │  plan     │             │  batch    │             │  subdirs  │
//! └───────────┘             └───────────┘             └───────────┘
//!       │                                                   │
//!       └──── file batches, renamed subdirectories ─────────┘
//! ```

pub mod coordinator;
pub mod entry;
pub mod executor;
pub mod plan;
pub mod queue;
pub mod stats;
pub mod worker;

pub use coordinator::{RootResult, WalkCoordinator};
pub use executor::{BatchOutcome, RenameExecutor};
pub use queue::{DirTask, Job, RenameBatch, WorkQueue};
pub use stats::{CountersSnapshot, RunCounters};
pub use worker::WalkContext;
