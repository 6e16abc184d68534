//! Rename executor
//!
//! Applies batches of [`RenameTask`]s to the filesystem. Each task is
//! attempted exactly once: a failure is recorded and reported, and the
//! rest of the batch carries on.
//!
//! An existing destination is never overwritten. The only exception is a
//! case-only rename on a case-insensitive filesystem, where the
//! "existing" destination is the source itself.

use crate::error::RenameFailure;
use crate::events::{EventSink, RenameEvent};
use crate::types::RenameTask;
use crate::walker::plan::REASON_UNCHANGED;
use crate::walker::stats::RunCounters;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Result of one executed batch, in task order
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<(RenameTask, Result<(), RenameFailure>)>,
}

impl BatchOutcome {
    /// Number of successful renames
    pub fn renamed(&self) -> usize {
        self.results
            .iter()
            .filter(|(task, r)| r.is_ok() && !task.is_noop())
            .count()
    }

    /// Tasks that failed, with the reason
    pub fn failures(&self) -> impl Iterator<Item = (&RenameTask, &RenameFailure)> {
        self.results
            .iter()
            .filter_map(|(task, r)| r.as_ref().err().map(|e| (task, e)))
    }

    /// Path each entry ends up at: the new path when the rename
    /// succeeded, the old one otherwise
    pub fn final_paths(&self) -> Vec<PathBuf> {
        self.results
            .iter()
            .map(|(task, r)| match r {
                Ok(()) => task.new_path.clone(),
                Err(_) => task.old_path.clone(),
            })
            .collect()
    }
}

/// Executes rename batches and reports every outcome
pub struct RenameExecutor<'a> {
    counters: &'a RunCounters,
    events: &'a dyn EventSink,
}

impl<'a> RenameExecutor<'a> {
    pub fn new(counters: &'a RunCounters, events: &'a dyn EventSink) -> Self {
        Self { counters, events }
    }

    /// Execute every task of the batch once, in order
    pub fn execute(&self, batch: Vec<RenameTask>) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            results: Vec::with_capacity(batch.len()),
        };

        for task in batch {
            let result = self.execute_one(&task);
            outcome.results.push((task, result));
        }

        outcome
    }

    /// Execute one task and report it
    ///
    /// A task that would not change the name is reported as skipped and
    /// leaves the filesystem alone.
    pub fn execute_one(&self, task: &RenameTask) -> Result<(), RenameFailure> {
        if task.is_noop() {
            debug!(path = %task.old_path.display(), "No-op rename reached the executor");
            self.counters.record_skipped(task.kind);
            self.events.emit(RenameEvent::skipped(
                task.kind,
                task.old_path.clone(),
                REASON_UNCHANGED,
            ));
            return Ok(());
        }

        match rename_entry(&task.old_path, &task.new_path) {
            Ok(()) => {
                trace!(from = %task.old_path.display(), to = %task.new_path.display(), "Renamed");
                self.counters.record_renamed(task.kind);
                self.events.emit(RenameEvent::renamed(
                    task.kind,
                    task.old_path.clone(),
                    task.new_path.clone(),
                ));
                Ok(())
            }
            Err(failure) => {
                warn!(
                    from = %task.old_path.display(),
                    to = %task.new_path.display(),
                    error = %failure,
                    "Rename failed"
                );
                self.counters.record_error();
                self.events.emit(RenameEvent::error(
                    task.kind,
                    task.old_path.clone(),
                    Some(task.new_path.clone()),
                    failure.to_string(),
                ));
                Err(failure)
            }
        }
    }
}

/// Rename `old` to `new` unless something else already occupies `new`
pub fn rename_entry(old: &Path, new: &Path) -> Result<(), RenameFailure> {
    if old == new {
        return Ok(());
    }

    if let Ok(existing) = fs::symlink_metadata(new) {
        if !is_same_entry(old, new, &existing) {
            return Err(RenameFailure::DestinationExists);
        }
    }

    fs::rename(old, new).map_err(RenameFailure::from)
}

#[cfg(unix)]
fn is_same_entry(old: &Path, _new: &Path, existing: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    fs::symlink_metadata(old)
        .map(|meta| meta.dev() == existing.dev() && meta.ino() == existing.ino())
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_same_entry(old: &Path, new: &Path, _existing: &Metadata) -> bool {
    old.to_string_lossy().to_lowercase() == new.to_string_lossy().to_lowercase()
}
