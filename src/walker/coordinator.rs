//! Walk coordinator - drives the rename walk of one root
//!
//! The coordinator is responsible for:
//! - Renaming the root itself when requested
//! - Setting up the work queue and its workers
//! - Waiting for the walk to drain and joining the workers

use crate::config::SymlinkPolicy;
use crate::error::WorkerError;
use crate::events::RenameEvent;
use crate::state::sequence;
use crate::transform::Transformation;
use crate::types::{EntryKind, PathEntry, RenameTask};
use crate::walker::entry::{classify, sibling_names};
use crate::walker::plan::REASON_UNCHANGED;
use crate::walker::queue::WorkQueue;
use crate::walker::worker::{WalkContext, Worker, REASON_SYMLINK};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Queue slots per worker
const QUEUE_SLOTS_PER_WORKER: usize = 64;

/// Result of walking one root
#[derive(Debug)]
pub struct RootResult {
    /// Root as configured
    pub root: PathBuf,

    /// Where the root ended up (differs from `root` if it was renamed)
    pub final_root: PathBuf,

    /// Workers used for this root
    pub workers: usize,

    /// Jobs run by the workers (inline jobs are part of their parent's)
    pub jobs: u64,

    /// Time taken for the walk
    pub duration: Duration,
}

/// Coordinates the parallel walk of one root
pub struct WalkCoordinator<'a> {
    root: PathBuf,
    worker_count: usize,
    ctx: &'a WalkContext<'a>,
}

impl<'a> WalkCoordinator<'a> {
    /// Create a coordinator for `root` using `worker_count` threads
    pub fn new(root: PathBuf, worker_count: usize, ctx: &'a WalkContext<'a>) -> Self {
        Self {
            root,
            worker_count: worker_count.max(1),
            ctx,
        }
    }

    /// Run the walk of this root
    pub fn run(self) -> Result<RootResult, WorkerError> {
        let start_time = Instant::now();
        info!(root = %self.root.display(), workers = self.worker_count, "Starting root");

        let kind = match classify(&self.root) {
            Ok(Some(kind)) => kind,
            Ok(None) => {
                warn!(root = %self.root.display(), "Root is neither a file nor a directory");
                return Ok(self.finish(self.root.clone(), 0, start_time));
            }
            Err(e) => {
                self.ctx.counters.record_error();
                self.ctx.events.emit(RenameEvent::error(
                    EntryKind::Directory,
                    self.root.clone(),
                    None,
                    format!("cannot read root: {}", e),
                ));
                return Ok(self.finish(self.root.clone(), 0, start_time));
            }
        };

        let final_root = self.rename_root(kind);

        // Only real directories are traversed, never a symlink root
        if !kind.is_dir() {
            return Ok(self.finish(final_root, 0, start_time));
        }

        let jobs = self.walk(&final_root)?;
        Ok(self.finish(final_root, jobs, start_time))
    }

    fn finish(&self, final_root: PathBuf, jobs: u64, start_time: Instant) -> RootResult {
        let duration = start_time.elapsed();
        info!(
            root = %self.root.display(),
            jobs,
            duration_ms = duration.as_millis() as u64,
            "Root completed"
        );

        RootResult {
            root: self.root.clone(),
            final_root,
            workers: self.worker_count,
            jobs,
            duration,
        }
    }

    /// Rename the root itself if the configuration asks for it.
    ///
    /// A directory root is renamed only with `include_parents`; a file
    /// (or included symlink) root is renamed whenever files are in scope.
    /// Returns the path the root has afterwards.
    fn rename_root(&self, kind: EntryKind) -> PathBuf {
        if !renames_root(self.ctx, kind) {
            return self.root.clone();
        }

        let entry = PathEntry::new(self.root.clone(), kind, 0);
        if kind.is_symlink() && self.ctx.config.symlinks == SymlinkPolicy::Skip {
            self.ctx.skip(&entry, REASON_SYMLINK);
            return self.root.clone();
        }

        let (Some(parent), Some(name)) = (entry.parent(), entry.name()) else {
            debug!(root = %self.root.display(), "Root has no renamable name");
            return self.root.clone();
        };

        let new_name = root_name(self.ctx, parent, kind, name);
        if new_name.is_empty() || new_name == name {
            self.ctx.skip(&entry, REASON_UNCHANGED);
            return self.root.clone();
        }

        let task = RenameTask::sibling(self.root.clone(), &new_name, kind);
        match self.ctx.executor().execute_one(&task) {
            Ok(()) => task.new_path,
            Err(_) => task.old_path,
        }
    }

    /// Walk the directory tree below `root` with this root's workers
    fn walk(&self, root: &Path) -> Result<u64, WorkerError> {
        let queue = WorkQueue::new(self.worker_count * QUEUE_SLOTS_PER_WORKER);
        queue.seed(root.to_path_buf());

        let ctx = self.ctx;
        let (jobs, failures) = thread::scope(|scope| {
            let mut workers = Vec::with_capacity(self.worker_count);
            let mut failures = Vec::new();

            for id in 0..self.worker_count {
                match Worker::spawn(scope, id, ctx, queue.receiver(), queue.sender()) {
                    Ok(worker) => workers.push(worker),
                    Err(e) => failures.push(e),
                }
            }
            debug!(count = workers.len(), "Workers spawned");

            if workers.is_empty() {
                // Nobody is left to drain the queue
                return (0, failures);
            }

            let mut jobs = 0;
            for worker in workers {
                let id = worker.id();
                match worker.join() {
                    Ok(count) => jobs += count,
                    Err(e) => {
                        warn!(worker = id, error = %e, "Worker failed to join cleanly");
                        failures.push(e);
                    }
                }
            }
            (jobs, failures)
        });

        let stats = queue.stats();
        debug!(
            enqueued = stats.enqueued.load(Ordering::Relaxed),
            dequeued = stats.throughput(),
            inline = stats.inline_count(),
            backpressure = stats.backpressure_count(),
            "Queue drained"
        );

        match failures.into_iter().next() {
            Some(e) if jobs == 0 => Err(e),
            Some(e) => {
                warn!(error = %e, "Walk finished with a failed worker");
                Ok(jobs)
            }
            None => Ok(jobs),
        }
    }
}

/// Whether a root of this kind is renamed itself.
///
/// A directory root is renamed only with `include_parents`; a file
/// (or symlink) root whenever files are in scope.
fn renames_root(ctx: &WalkContext<'_>, kind: EntryKind) -> bool {
    match kind {
        EntryKind::Directory => ctx.config.include_parents,
        EntryKind::File | EntryKind::Symlink => ctx.config.scope.files(),
    }
}

/// New name for a root, numbered among its own siblings in sequence mode
fn root_name(ctx: &WalkContext<'_>, parent: &Path, kind: EntryKind, name: &str) -> String {
    let set = if kind.is_dir() { EntryKind::Directory } else { EntryKind::File };

    match ctx.config.mode {
        Transformation::Sequence if sequence::is_numbered(name) => name.to_string(),
        Transformation::Sequence => {
            let siblings = sibling_names(parent, set);
            ctx.store.assign_sequence(parent, set, name, &siblings)
        }
        mode => ctx.store.resolve(name, kind, mode),
    }
}

/// Number the renamed roots in sequence mode before any root walk starts.
///
/// Roots are walked concurrently, so roots sharing a parent would
/// otherwise be numbered in whatever order their threads get there.
/// Assignments are remembered per name, so each coordinator later gets
/// the number reserved here. `roots` is expected in path order.
pub fn reserve_root_numbers(roots: &[PathBuf], ctx: &WalkContext<'_>) {
    if ctx.config.mode != Transformation::Sequence {
        return;
    }

    for root in roots {
        let Ok(Some(kind)) = classify(root) else {
            continue;
        };
        if !renames_root(ctx, kind) || (kind.is_symlink() && ctx.config.symlinks == SymlinkPolicy::Skip) {
            continue;
        }

        let entry = PathEntry::new(root.clone(), kind, 0);
        if let (Some(parent), Some(name)) = (entry.parent(), entry.name()) {
            let reserved = root_name(ctx, parent, kind, name);
            debug!(root = %root.display(), name = %reserved, "Reserved root number");
        }
    }
}
