//! Run counters shared by every worker
//!
//! Workers only ever increment; the orchestrator reads a snapshot after
//! all workers have joined (or periodically for the progress display).

use crate::types::EntryKind;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for one run
#[derive(Debug, Default)]
pub struct RunCounters {
    /// Files (and symlinks) renamed
    pub files_renamed: AtomicU64,

    /// Directories renamed
    pub dirs_renamed: AtomicU64,

    /// Files (and symlinks) left as they were
    pub files_skipped: AtomicU64,

    /// Directories left as they were
    pub dirs_skipped: AtomicU64,

    /// Failed renames and unreadable directories
    pub errors: AtomicU64,

    /// Directories whose entries were listed
    pub dirs_scanned: AtomicU64,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_renamed(&self, kind: EntryKind) {
        if kind.is_leaf() {
            self.files_renamed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.dirs_renamed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_skipped(&self, kind: EntryKind) {
        if kind.is_leaf() {
            self.files_skipped.fetch_add(1, Ordering::Relaxed);
        } else {
            self.dirs_skipped.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scanned(&self) {
        self.dirs_scanned.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            files_renamed: self.files_renamed.load(Ordering::Relaxed),
            dirs_renamed: self.dirs_renamed.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            dirs_skipped: self.dirs_skipped.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            dirs_scanned: self.dirs_scanned.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`RunCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountersSnapshot {
    pub files_renamed: u64,
    pub dirs_renamed: u64,
    pub files_skipped: u64,
    pub dirs_skipped: u64,
    pub errors: u64,
    pub dirs_scanned: u64,
}

impl CountersSnapshot {
    pub fn renamed(&self) -> u64 {
        self.files_renamed + self.dirs_renamed
    }

    pub fn skipped(&self) -> u64 {
        self.files_skipped + self.dirs_skipped
    }
}
