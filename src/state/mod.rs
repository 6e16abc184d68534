//! Sequence/date state for stateful transformations
//!
//! Sequence numbering depends on a directory's whole sibling set, and date
//! tagging on a date that must not change halfway through a run. The
//! [`NameStateStore`] owns both for the lifetime of one run:
//!
//! - one [`DirectoryCounterState`] per (parent directory, entry kind),
//!   created on first use and guarded by its own lock
//! - the run date, captured once when the store is created
//!
//! Nothing is persisted; dropping the store ends the state.

pub mod date;
pub mod sequence;

use crate::transform::{transform, Transformation};
use crate::types::EntryKind;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

pub use sequence::DirectoryCounterState;

/// Files and directories of one parent are numbered independently
type DirKey = (PathBuf, EntryKind);

/// Per-run state store for stateful transformations
pub struct NameStateStore {
    /// Registry of per-directory counter state
    directories: Mutex<HashMap<DirKey, Arc<Mutex<DirectoryCounterState>>>>,

    /// Date used by `date` for the whole run
    run_date: NaiveDate,
}

impl NameStateStore {
    /// Create a store dated today
    pub fn new() -> Self {
        Self::with_date(date::today())
    }

    /// Create a store with a fixed run date
    pub fn with_date(run_date: NaiveDate) -> Self {
        Self {
            directories: Mutex::new(HashMap::new()),
            run_date,
        }
    }

    /// Date appended by the `date` mode
    pub fn run_date(&self) -> NaiveDate {
        self.run_date
    }

    /// Number of sibling sets tracked so far
    pub fn tracked_directories(&self) -> usize {
        self.directories.lock().len()
    }

    /// Counter state for one sibling set, created from `siblings` on first use.
    ///
    /// The registry lock is held only for the lookup; callers lock the
    /// returned state themselves.
    fn directory(&self, parent: &Path, kind: EntryKind, siblings: &[String]) -> Arc<Mutex<DirectoryCounterState>> {
        let mut directories = self.directories.lock();
        let state = directories
            .entry((parent.to_path_buf(), kind))
            .or_insert_with(|| {
                trace!(parent = %parent.display(), kind = kind.label(), "Tracking sibling set");
                Arc::new(Mutex::new(DirectoryCounterState::from_siblings(
                    siblings.iter().map(String::as_str),
                )))
            });
        Arc::clone(state)
    }

    /// Give `raw_name` the next free sequence number in `parent`.
    ///
    /// The first call for a parent scans `siblings` for numbers already in
    /// use. Concurrent callers for the same parent are serialized on that
    /// parent's lock, so every caller gets a distinct number.
    pub fn assign_sequence(&self, parent: &Path, kind: EntryKind, raw_name: &str, siblings: &[String]) -> String {
        if sequence::is_numbered(raw_name) {
            return raw_name.to_string();
        }

        let state = self.directory(parent, kind, siblings);
        let mut state = state.lock();
        state.assign(raw_name)
    }

    /// Plan the renumbering of a whole sibling set, once per parent and kind.
    ///
    /// Returns `(old_name, new_name)` pairs; a repeated call for the same
    /// parent and kind returns an empty plan.
    pub fn plan_renumber(&self, parent: &Path, kind: EntryKind, names: &[String]) -> Vec<(String, String)> {
        let state = self.directory(parent, kind, names);
        let mut state = state.lock();
        if !state.claim_renumber() {
            return Vec::new();
        }
        sequence::plan_renumber(names)
    }

    /// Remove a leading sequence number
    pub fn strip_sequence<'a>(&self, raw_name: &'a str) -> &'a str {
        sequence::strip_sequence(raw_name)
    }

    /// Append the run date
    pub fn append_date(&self, raw_name: &str, kind: EntryKind) -> String {
        date::append_date_on(raw_name, kind, self.run_date)
    }

    /// Remove a trailing date token
    pub fn strip_date(&self, raw_name: &str, kind: EntryKind) -> String {
        date::strip_date(raw_name, kind)
    }

    /// Resolve a single name for every mode that does not need the
    /// sibling set (everything except `sequence`).
    pub fn resolve(&self, raw_name: &str, kind: EntryKind, mode: Transformation) -> String {
        match mode {
            Transformation::DateAppend => self.append_date(raw_name, kind),
            _ => transform(raw_name, kind, mode),
        }
    }
}

impl Default for NameStateStore {
    fn default() -> Self {
        Self::new()
    }
}
