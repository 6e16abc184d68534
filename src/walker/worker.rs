//! Worker thread logic for the parallel rename walk
//!
//! Each worker:
//! - Pulls jobs from the work queue of its root
//! - Lists directories and plans renames for their entries
//! - Pushes file rename batches back to the queue
//! - Renames subdirectories itself, then queues them under their new path
//!
//! A directory's children are only queued after the directory has been
//! renamed, so no worker ever holds a stale path to a directory.

use crate::config::{RunConfig, SymlinkPolicy};
use crate::error::{WalkOutcome, WorkerError};
use crate::events::{EventSink, RenameEvent};
use crate::state::NameStateStore;
use crate::types::{EntryKind, PathEntry, RenameTask};
use crate::walker::entry::list_directory;
use crate::walker::executor::RenameExecutor;
use crate::walker::plan::{chunk_tasks, plan_entries, Decision};
use crate::walker::queue::{DirTask, Job, WorkGuard, WorkQueueReceiver, WorkQueueSender};
use crate::walker::stats::RunCounters;
use std::path::{Path, PathBuf};
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// How long an idle worker waits before checking for completion
const IDLE_POLL: Duration = Duration::from_millis(10);

/// Reason reported for symlinks under the skip policy
pub const REASON_SYMLINK: &str = "symbolic link";

/// Everything a worker needs that outlives the walk of one root
pub struct WalkContext<'a> {
    pub config: &'a RunConfig,
    pub store: &'a NameStateStore,
    pub counters: &'a RunCounters,
    pub events: &'a dyn EventSink,
}

impl<'a> WalkContext<'a> {
    pub fn new(
        config: &'a RunConfig,
        store: &'a NameStateStore,
        counters: &'a RunCounters,
        events: &'a dyn EventSink,
    ) -> Self {
        Self {
            config,
            store,
            counters,
            events,
        }
    }

    pub fn executor(&self) -> RenameExecutor<'_> {
        RenameExecutor::new(self.counters, self.events)
    }

    /// Count and report an entry that is left alone
    pub fn skip(&self, entry: &PathEntry, reason: &str) {
        trace!(path = %entry.path.display(), reason, "Skipped");
        self.counters.record_skipped(entry.kind);
        self.events
            .emit(RenameEvent::skipped(entry.kind, entry.path.clone(), reason));
    }

    /// Plan renames for one sibling set, reporting skips as they come.
    ///
    /// Returns the tasks to run and the paths of the skipped entries.
    pub fn plan(&self, parent: &Path, set: EntryKind, entries: &[PathEntry]) -> (Vec<RenameTask>, Vec<PathBuf>) {
        let mut tasks = Vec::new();
        let mut kept = Vec::new();

        for decision in plan_entries(self.config, self.store, parent, set, entries) {
            match decision {
                Decision::Rename(task) => tasks.push(task),
                Decision::Skip { entry, reason } => {
                    self.skip(&entry, reason);
                    kept.push(entry.path);
                }
            }
        }

        (tasks, kept)
    }
}

/// A worker thread bound to the walk of one root
pub struct Worker<'scope> {
    /// Worker ID
    id: usize,

    /// Thread handle
    handle: ScopedJoinHandle<'scope, u64>,
}

impl<'scope> Worker<'scope> {
    /// Spawn a new worker thread inside `scope`
    pub fn spawn<'env>(
        scope: &'scope Scope<'scope, 'env>,
        id: usize,
        ctx: &'scope WalkContext<'scope>,
        queue_rx: WorkQueueReceiver,
        queue_tx: WorkQueueSender,
    ) -> Result<Self, WorkerError> {
        let handle = thread::Builder::new()
            .name(format!("renamer-{}", id))
            .spawn_scoped(scope, move || worker_loop(id, ctx, queue_rx, queue_tx))
            .map_err(|e| WorkerError::InitFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self { id, handle })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Wait for the worker to finish; returns the number of jobs it ran
    pub fn join(self) -> Result<u64, WorkerError> {
        self.handle.join().map_err(|payload| WorkerError::Panicked {
            id: self.id,
            message: panic_message(payload.as_ref()),
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Worker thread panicked".into()
    }
}

/// Main worker loop
fn worker_loop(id: usize, ctx: &WalkContext<'_>, queue_rx: WorkQueueReceiver, queue_tx: WorkQueueSender) -> u64 {
    debug!(worker = id, "Worker starting");
    let mut jobs = 0u64;

    loop {
        let job = match queue_rx.recv_timeout(IDLE_POLL) {
            Some(job) => job,
            None if queue_rx.is_complete() => break,
            None => continue,
        };

        // Mark as actively working
        let _guard = WorkGuard::new(&queue_rx);
        run_job(id, ctx, &queue_tx, job);
        jobs += 1;
    }

    debug!(worker = id, jobs, "Worker finished");
    jobs
}

/// Run one job on the current thread
pub fn run_job(worker_id: usize, ctx: &WalkContext<'_>, queue_tx: &WorkQueueSender, job: Job) {
    match job {
        Job::Directory(task) => match process_directory(worker_id, &task, ctx, queue_tx) {
            WalkOutcome::Success { path, entries, subdirs } => {
                trace!(worker = worker_id, path = %path.display(), entries, subdirs, "Directory processed");
            }
            WalkOutcome::Skipped { path, reason } => {
                debug!(worker = worker_id, path = %path.display(), reason = %reason, "Directory skipped");
            }
            WalkOutcome::Failed { path, reason } => {
                warn!(worker = worker_id, path = %path.display(), error = %reason, "Directory failed");
            }
        },
        Job::Renames(batch) => {
            let size = batch.len();
            let outcome = ctx.executor().execute(batch);
            trace!(worker = worker_id, size, renamed = outcome.renamed(), "Batch executed");
        }
    }
}

/// Queue a job, or run it right here when the queue is full
fn dispatch(worker_id: usize, ctx: &WalkContext<'_>, queue_tx: &WorkQueueSender, job: Job) {
    if let Err(job) = queue_tx.try_send(job) {
        queue_tx.record_inline();
        trace!(worker = worker_id, "Backpressure - running job inline");
        run_job(worker_id, ctx, queue_tx, job);
    }
}

/// Process a single directory
pub fn process_directory(
    worker_id: usize,
    task: &DirTask,
    ctx: &WalkContext<'_>,
    queue_tx: &WorkQueueSender,
) -> WalkOutcome {
    let config = ctx.config;

    // The root's own entries are always processed
    if task.depth > 0 && !config.descends_into(task.depth) {
        return WalkOutcome::Skipped {
            path: task.path.clone(),
            reason: format!("Exceeded max depth {}", config.max_depth.unwrap_or_default()),
        };
    }

    let entries = match list_directory(&task.path, task.depth + 1) {
        Ok(entries) => entries,
        Err(e) => {
            ctx.counters.record_error();
            ctx.events.emit(RenameEvent::error(
                EntryKind::Directory,
                task.path.clone(),
                None,
                format!("cannot read directory: {}", e),
            ));
            return WalkOutcome::Failed {
                path: task.path.clone(),
                reason: e.to_string(),
            };
        }
    };

    ctx.counters.record_scanned();
    let entry_count = entries.len();

    let mut leaves = Vec::new();
    let mut dirs = Vec::new();
    for entry in entries {
        match entry.kind {
            EntryKind::Directory => dirs.push(entry),
            EntryKind::File => leaves.push(entry),
            EntryKind::Symlink => match config.symlinks {
                SymlinkPolicy::Include => leaves.push(entry),
                SymlinkPolicy::Skip if config.scope.files() => ctx.skip(&entry, REASON_SYMLINK),
                SymlinkPolicy::Skip => {}
            },
        }
    }
    let subdir_count = dirs.len();

    // Files go back to the queue in batches so idle workers can help
    if config.scope.files() && !leaves.is_empty() {
        let (tasks, _) = ctx.plan(&task.path, EntryKind::File, &leaves);
        for batch in chunk_tasks(tasks, config.file_batch_size) {
            dispatch(worker_id, ctx, queue_tx, Job::Renames(batch));
        }
    }

    // Subdirectories are renamed before anything below them is queued
    let children: Vec<PathBuf> = if config.scope.directories() && !dirs.is_empty() {
        let (tasks, mut children) = ctx.plan(&task.path, EntryKind::Directory, &dirs);
        let executor = ctx.executor();
        for batch in chunk_tasks(tasks, config.dir_batch_size) {
            children.extend(executor.execute(batch).final_paths());
        }
        children
    } else {
        dirs.into_iter().map(|d| d.path).collect()
    };

    let child_depth = task.depth + 1;
    if config.descends_into(child_depth) {
        for path in children {
            dispatch(worker_id, ctx, queue_tx, Job::Directory(DirTask::new(path, child_depth)));
        }
    }

    WalkOutcome::Success {
        path: task.path.clone(),
        entries: entry_count,
        subdirs: subdir_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullSink;
    use crate::transform::Transformation;
    use crate::walker::queue::WorkQueue;
    use std::fs;
    use tempfile::tempdir;

    fn config(root: &Path, mode: Transformation, depth: i64) -> RunConfig {
        RunConfig::builder([root], mode).depth(depth).build().unwrap()
    }

    /// Drain the queue on the current thread
    fn drain(ctx: &WalkContext<'_>, queue: &WorkQueue) {
        let rx = queue.receiver();
        let tx = queue.sender();
        while let Some(job) = rx.try_recv() {
            let _guard = WorkGuard::new(&rx);
            run_job(0, ctx, &tx, job);
        }
    }

    #[test]
    fn test_process_directory_renames_and_recurses() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Photos")).unwrap();
        fs::write(dir.path().join("Photos").join("IMG.JPG"), "").unwrap();
        fs::write(dir.path().join("Notes.TXT"), "").unwrap();

        let config = config(dir.path(), Transformation::Lower, -1);
        let store = NameStateStore::new();
        let counters = RunCounters::new();
        let ctx = WalkContext::new(&config, &store, &counters, &NullSink);

        let queue = WorkQueue::new(16);
        queue.seed(dir.path().to_path_buf());
        drain(&ctx, &queue);

        assert!(queue.is_complete());
        assert!(dir.path().join("notes.txt").exists());
        assert!(dir.path().join("photos").join("img.jpg").exists());

        let snap = counters.snapshot();
        assert_eq!(snap.files_renamed, 2);
        assert_eq!(snap.dirs_renamed, 1);
        assert_eq!(snap.dirs_scanned, 2);
    }

    #[test]
    fn test_depth_zero_stays_at_root() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Sub")).unwrap();
        fs::write(dir.path().join("Sub").join("Deep.TXT"), "").unwrap();

        let config = config(dir.path(), Transformation::Lower, 0);
        let store = NameStateStore::new();
        let counters = RunCounters::new();
        let ctx = WalkContext::new(&config, &store, &counters, &NullSink);

        let queue = WorkQueue::new(16);
        queue.seed(dir.path().to_path_buf());
        drain(&ctx, &queue);

        assert!(dir.path().join("sub").join("Deep.TXT").exists());
        assert_eq!(counters.snapshot().dirs_scanned, 1);
    }

    #[test]
    fn test_backpressure_runs_inline() {
        let dir = tempdir().unwrap();
        for i in 0..5 {
            fs::write(dir.path().join(format!("F{i}")), "").unwrap();
        }

        let config = RunConfig::builder([dir.path()], Transformation::Lower)
            .batch_sizes(1, 1)
            .build()
            .unwrap();
        let store = NameStateStore::new();
        let counters = RunCounters::new();
        let ctx = WalkContext::new(&config, &store, &counters, &NullSink);

        // Capacity 1: the root fills it, every batch afterwards runs inline
        let queue = WorkQueue::new(1);
        queue.seed(dir.path().to_path_buf());
        drain(&ctx, &queue);

        assert_eq!(counters.snapshot().files_renamed, 5);
        assert!(queue.stats().inline_count() >= 1);
    }

    #[test]
    fn test_unreadable_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), Transformation::Lower, -1);
        let store = NameStateStore::new();
        let counters = RunCounters::new();
        let ctx = WalkContext::new(&config, &store, &counters, &NullSink);
        let queue = WorkQueue::new(4);

        let task = DirTask::root(dir.path().join("missing"));
        let outcome = process_directory(0, &task, &ctx, &queue.sender());

        assert!(matches!(outcome, WalkOutcome::Failed { .. }));
        assert_eq!(counters.snapshot().errors, 1);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
    }
}
