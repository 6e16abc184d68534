//! Per-item events produced by the engine
//!
//! The engine never prints. Every rename decision becomes a
//! [`RenameEvent`] handed to an [`EventSink`]; the CLI drains them on its
//! own thread and formats them.

use crate::config::Verbosity;
use crate::types::EntryKind;
use crossbeam_channel::Sender;
use std::path::PathBuf;

/// What happened to an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Renamed,
    Skipped,
    Error,
}

/// One per-item notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEvent {
    pub outcome: EventOutcome,
    pub kind: EntryKind,
    pub old_path: PathBuf,
    pub new_path: Option<PathBuf>,
    pub reason: Option<String>,
}

impl RenameEvent {
    pub fn renamed(kind: EntryKind, old_path: PathBuf, new_path: PathBuf) -> Self {
        Self {
            outcome: EventOutcome::Renamed,
            kind,
            old_path,
            new_path: Some(new_path),
            reason: None,
        }
    }

    pub fn skipped(kind: EntryKind, path: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            outcome: EventOutcome::Skipped,
            kind,
            old_path: path,
            new_path: None,
            reason: Some(reason.into()),
        }
    }

    pub fn error(kind: EntryKind, old_path: PathBuf, new_path: Option<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            outcome: EventOutcome::Error,
            kind,
            old_path,
            new_path,
            reason: Some(reason.into()),
        }
    }

    /// Whether this event passes the verbosity filter. Errors always do.
    pub fn is_visible(&self, verbosity: Verbosity) -> bool {
        match self.outcome {
            EventOutcome::Renamed => verbosity.shows_renamed(),
            EventOutcome::Skipped => verbosity.shows_skipped(),
            EventOutcome::Error => true,
        }
    }
}

/// Receiver of engine events; called concurrently from worker threads
pub trait EventSink: Send + Sync {
    fn emit(&self, event: RenameEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: RenameEvent) {}
}

impl EventSink for Sender<RenameEvent> {
    fn emit(&self, event: RenameEvent) {
        // A dropped receiver only means nobody is listening any more
        let _ = self.send(event);
    }
}

/// Applies the verbosity filter in front of another sink
pub struct FilteredSink<'a> {
    inner: &'a dyn EventSink,
    verbosity: Verbosity,
}

impl<'a> FilteredSink<'a> {
    pub fn new(inner: &'a dyn EventSink, verbosity: Verbosity) -> Self {
        Self { inner, verbosity }
    }
}

impl EventSink for FilteredSink<'_> {
    fn emit(&self, event: RenameEvent) {
        if event.is_visible(self.verbosity) {
            self.inner.emit(event);
        }
    }
}
