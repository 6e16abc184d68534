//! Run orchestrator
//!
//! [`Renamer`] owns everything that lives for exactly one run: the
//! validated configuration, the shared counters and the sequence/date
//! state. Each root is walked on its own scoped thread by a
//! [`WalkCoordinator`] with its share of the worker threads.

use crate::config::RunConfig;
use crate::error::{Result, WorkerError};
use crate::events::{EventSink, FilteredSink};
use crate::state::NameStateStore;
use crate::walker::coordinator::reserve_root_numbers;
use crate::walker::{CountersSnapshot, RootResult, RunCounters, WalkContext, WalkCoordinator};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Final result of a run
#[derive(Debug)]
pub struct RunSummary {
    pub files_renamed: u64,
    pub dirs_renamed: u64,
    pub files_skipped: u64,
    pub dirs_skipped: u64,
    pub errors: u64,

    /// Directories listed across all roots
    pub dirs_scanned: u64,

    /// Per-root results, in root order
    pub roots: Vec<RootResult>,

    /// Wall-clock time of the whole run
    pub duration: Duration,
}

impl RunSummary {
    fn new(counters: CountersSnapshot, roots: Vec<RootResult>, duration: Duration) -> Self {
        Self {
            files_renamed: counters.files_renamed,
            dirs_renamed: counters.dirs_renamed,
            files_skipped: counters.files_skipped,
            dirs_skipped: counters.dirs_skipped,
            errors: counters.errors,
            dirs_scanned: counters.dirs_scanned,
            roots,
            duration,
        }
    }

    pub fn renamed(&self) -> u64 {
        self.files_renamed + self.dirs_renamed
    }

    pub fn skipped(&self) -> u64 {
        self.files_skipped + self.dirs_skipped
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Recursive rename engine
pub struct Renamer {
    config: RunConfig,
    store: NameStateStore,
    counters: RunCounters,
}

impl Renamer {
    /// Create a renamer dated today
    pub fn new(config: RunConfig) -> Self {
        Self::with_store(config, NameStateStore::new())
    }

    /// Create a renamer with a prepared state store (e.g. a fixed run date)
    pub fn with_store(config: RunConfig, store: NameStateStore) -> Self {
        Self {
            config,
            store,
            counters: RunCounters::new(),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Live counters, readable while `run` is in progress
    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    /// Rename every root. Per-item failures are counted and reported as
    /// events; only a failure of the machinery itself is an `Err`.
    pub fn run(&self, sink: &dyn EventSink) -> Result<RunSummary> {
        let start_time = Instant::now();
        let config = &self.config;

        info!(
            roots = config.roots.len(),
            mode = %config.mode,
            workers = config.worker_count,
            "Starting rename walk"
        );

        let events = FilteredSink::new(sink, config.verbosity);
        let ctx = WalkContext::new(config, &self.store, &self.counters, &events);
        let shares = split_evenly(config.worker_count, config.roots.len());
        reserve_root_numbers(&config.roots, &ctx);

        let results: Vec<std::result::Result<RootResult, WorkerError>> = thread::scope(|scope| {
            let ctx = &ctx;
            let handles: Vec<_> = config
                .roots
                .iter()
                .zip(shares)
                .enumerate()
                .map(|(id, (root, workers))| {
                    let handle = thread::Builder::new()
                        .name(format!("root-{}", id))
                        .spawn_scoped(scope, move || WalkCoordinator::new(root.clone(), workers, ctx).run());
                    (id, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(id, handle)| -> std::result::Result<RootResult, WorkerError> {
                    let handle = handle.map_err(|e| WorkerError::InitFailed {
                        id,
                        reason: e.to_string(),
                    })?;
                    handle.join().unwrap_or_else(|_| {
                        Err(WorkerError::Panicked {
                            id,
                            message: "Root walker panicked".into(),
                        })
                    })
                })
                .collect()
        });

        let mut roots = Vec::with_capacity(results.len());
        let mut first_error = None;
        for result in results {
            match result {
                Ok(root) => roots.push(root),
                Err(e) => {
                    warn!(error = %e, "Root walk failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e.into());
        }

        let summary = RunSummary::new(self.counters.snapshot(), roots, start_time.elapsed());
        info!(
            renamed = summary.renamed(),
            skipped = summary.skipped(),
            errors = summary.errors,
            duration_ms = summary.duration.as_millis() as u64,
            "Rename walk completed"
        );

        Ok(summary)
    }
}

/// Split `total` into `parts` shares: each gets `total / parts` (at least
/// one) and the last one also gets the remainder.
pub fn split_evenly(total: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }

    let base = (total / parts).max(1);
    let mut shares = vec![base; parts];
    if total > base * parts {
        shares[parts - 1] += total - base * parts;
    }
    shares
}
