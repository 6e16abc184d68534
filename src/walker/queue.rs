//! Work queue with backpressure support
//!
//! This module provides a bounded queue shared by the workers of one root.
//! It carries two kinds of jobs: directories waiting to be listed, and
//! batches of file renames. When the queue is full, backpressure is
//! applied by running the job inline rather than blocking.
//!
//! Completion is tracked with a pending-job counter: a job counts as
//! pending from the moment it is queued until the worker that took it has
//! finished, including everything it queued in turn.

use crate::types::RenameTask;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A directory whose entries still have to be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirTask {
    /// Current path of the directory (after it was renamed, if it was)
    pub path: PathBuf,

    /// Depth from the root (0 = root)
    pub depth: usize,
}

impl DirTask {
    pub fn new(path: PathBuf, depth: usize) -> Self {
        Self { path, depth }
    }

    /// Create the root task
    pub fn root(path: PathBuf) -> Self {
        Self::new(path, 0)
    }
}

/// Sibling file renames executed together by one worker
pub type RenameBatch = Vec<RenameTask>;

/// A unit of work for a worker
#[derive(Debug)]
pub enum Job {
    /// List and process a directory
    Directory(DirTask),

    /// Execute a batch of sibling file renames
    Renames(RenameBatch),
}

/// Statistics for the work queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total jobs enqueued
    pub enqueued: AtomicU64,

    /// Total jobs dequeued
    pub dequeued: AtomicU64,

    /// Jobs processed inline due to backpressure
    pub inline_processed: AtomicU64,

    /// Number of times backpressure was applied
    pub backpressure_events: AtomicU64,
}

impl QueueStats {
    /// Get queue throughput (dequeued jobs)
    pub fn throughput(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }

    /// Get number of inline-processed jobs
    pub fn inline_count(&self) -> u64 {
        self.inline_processed.load(Ordering::Relaxed)
    }

    /// Get backpressure event count
    pub fn backpressure_count(&self) -> u64 {
        self.backpressure_events.load(Ordering::Relaxed)
    }
}

/// Work queue with backpressure support
pub struct WorkQueue {
    sender: Sender<Job>,
    receiver: Receiver<Job>,

    /// Jobs queued or in progress
    pending: Arc<AtomicUsize>,

    /// Number of workers currently running a job
    active_workers: Arc<AtomicUsize>,

    stats: Arc<QueueStats>,
}

impl WorkQueue {
    /// Create a new work queue with the specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));

        Self {
            sender,
            receiver,
            pending: Arc::new(AtomicUsize::new(0)),
            active_workers: Arc::new(AtomicUsize::new(0)),
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Get a sender for this queue
    pub fn sender(&self) -> WorkQueueSender {
        WorkQueueSender {
            sender: self.sender.clone(),
            pending: Arc::clone(&self.pending),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get a receiver for this queue (clone for each worker)
    pub fn receiver(&self) -> WorkQueueReceiver {
        WorkQueueReceiver {
            receiver: self.receiver.clone(),
            pending: Arc::clone(&self.pending),
            active_workers: Arc::clone(&self.active_workers),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    /// Seed the queue with the root directory
    pub fn seed(&self, root: PathBuf) -> bool {
        self.sender().try_send(Job::Directory(DirTask::root(root))).is_ok()
    }

    /// Check if all work is complete: nothing queued and nothing running
    pub fn is_complete(&self) -> bool {
        self.pending.load(Ordering::SeqCst) == 0
    }
}

/// Handle for sending jobs to the queue
#[derive(Clone)]
pub struct WorkQueueSender {
    sender: Sender<Job>,
    pending: Arc<AtomicUsize>,
    stats: Arc<QueueStats>,
}

impl WorkQueueSender {
    /// Try to queue a job.
    ///
    /// On backpressure (or a disconnected queue) the job is handed back
    /// so the caller can run it inline.
    pub fn try_send(&self, job: Job) -> Result<(), Job> {
        // Counted before the send so a worker finishing the job cannot
        // observe the counter at zero in between
        self.pending.fetch_add(1, Ordering::SeqCst);

        match self.sender.try_send(job) {
            Ok(()) => {
                self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(job)) => {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                self.stats.backpressure_events.fetch_add(1, Ordering::Relaxed);
                Err(job)
            }
            Err(TrySendError::Disconnected(job)) => {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                Err(job)
            }
        }
    }

    /// Record that a job was processed inline (for stats)
    pub fn record_inline(&self) {
        self.stats.inline_processed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Handle for receiving jobs from the queue
#[derive(Clone)]
pub struct WorkQueueReceiver {
    receiver: Receiver<Job>,
    pending: Arc<AtomicUsize>,
    active_workers: Arc<AtomicUsize>,
    stats: Arc<QueueStats>,
}

impl WorkQueueReceiver {
    /// Try to receive a job without blocking
    pub fn try_recv(&self) -> Option<Job> {
        match self.receiver.try_recv() {
            Ok(job) => {
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(job)
            }
            Err(_) => None,
        }
    }

    /// Receive with timeout
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Job> {
        match self.receiver.recv_timeout(timeout) {
            Ok(job) => {
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(job)
            }
            Err(_) => None,
        }
    }

    /// True once nothing is queued or running
    pub fn is_complete(&self) -> bool {
        self.pending.load(Ordering::SeqCst) == 0
    }

    /// Number of workers currently running a job
    pub fn active_workers(&self) -> usize {
        self.active_workers.load(Ordering::SeqCst)
    }

    fn begin_work(&self) {
        self.active_workers.fetch_add(1, Ordering::SeqCst);
    }

    fn end_work(&self) {
        self.active_workers.fetch_sub(1, Ordering::SeqCst);
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

/// RAII guard held while a dequeued job runs.
///
/// Dropping it (also while unwinding from a panic) marks the job as
/// finished, so the other workers can still detect completion.
pub struct WorkGuard<'a> {
    receiver: &'a WorkQueueReceiver,
}

impl<'a> WorkGuard<'a> {
    /// Create a new work guard (marks worker as active)
    pub fn new(receiver: &'a WorkQueueReceiver) -> Self {
        receiver.begin_work();
        Self { receiver }
    }
}

impl Drop for WorkGuard<'_> {
    fn drop(&mut self) {
        self.receiver.end_work();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir_job(path: &str) -> Job {
        Job::Directory(DirTask::new(path.into(), 1))
    }

    #[test]
    fn test_queue_basic() {
        let queue = WorkQueue::new(10);

        assert!(queue.seed("/test".into()));
        assert!(!queue.is_complete());

        let receiver = queue.receiver();
        match receiver.try_recv() {
            Some(Job::Directory(task)) => {
                assert_eq!(task.path, PathBuf::from("/test"));
                assert_eq!(task.depth, 0);
            }
            other => panic!("unexpected job: {:?}", other),
        }
    }

    #[test]
    fn test_queue_backpressure() {
        let queue = WorkQueue::new(2);
        let sender = queue.sender();

        assert!(sender.try_send(dir_job("/a")).is_ok());
        assert!(sender.try_send(dir_job("/b")).is_ok());

        // Full: the job comes back to be run inline
        match sender.try_send(dir_job("/c")) {
            Err(Job::Directory(task)) => assert_eq!(task.path, PathBuf::from("/c")),
            other => panic!("expected backpressure, got {:?}", other.is_ok()),
        }

        assert_eq!(queue.stats().backpressure_count(), 1);
        assert_eq!(queue.stats().enqueued.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_queue_completion() {
        let queue = WorkQueue::new(10);
        let receiver = queue.receiver();
        let sender = queue.sender();

        assert!(queue.is_complete());

        queue.seed("/test".into());
        assert!(!queue.is_complete());

        let _job = receiver.try_recv().unwrap();
        let guard = WorkGuard::new(&receiver);

        // Queue empty but the job is still running
        assert!(receiver.try_recv().is_none());
        assert!(!queue.is_complete());
        assert_eq!(receiver.active_workers(), 1);

        // Work queued by a running job keeps the queue open
        sender.try_send(dir_job("/test/sub")).unwrap();
        drop(guard);
        assert!(!queue.is_complete());

        let _child = receiver.try_recv().unwrap();
        drop(WorkGuard::new(&receiver));
        assert!(queue.is_complete());
        assert_eq!(receiver.active_workers(), 0);
    }

    #[test]
    fn test_queue_stats() {
        let queue = WorkQueue::new(10);
        let sender = queue.sender();
        let receiver = queue.receiver();

        sender.try_send(dir_job("/a")).unwrap();
        sender.try_send(Job::Renames(Vec::new())).unwrap();

        receiver.try_recv().unwrap();
        receiver.recv_timeout(Duration::from_millis(10)).unwrap();

        let stats = queue.stats();
        assert_eq!(stats.enqueued.load(Ordering::Relaxed), 2);
        assert_eq!(stats.throughput(), 2);
    }
}
