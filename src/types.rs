//! Entry types shared by the walker, transformer and executor
//!
//! These types carry a filesystem entry from enumeration to a rename
//! decision and are cheap to move between worker threads.

use std::fs::FileType;
use std::path::{Path, PathBuf};

/// Type of filesystem entry the engine cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link (the link node itself, never its target)
    Symlink,
}

impl EntryKind {
    /// Classify a `FileType` obtained without following symlinks.
    ///
    /// Returns `None` for sockets, fifos, devices and anything else
    /// the engine ignores.
    pub fn from_file_type(file_type: FileType) -> Option<Self> {
        if file_type.is_symlink() {
            Some(EntryKind::Symlink)
        } else if file_type.is_dir() {
            Some(EntryKind::Directory)
        } else if file_type.is_file() {
            Some(EntryKind::File)
        } else {
            None
        }
    }

    /// Check if this is a regular file
    pub fn is_file(&self) -> bool {
        *self == EntryKind::File
    }

    /// Check if this is a directory
    pub fn is_dir(&self) -> bool {
        *self == EntryKind::Directory
    }

    /// Check if this is a symbolic link
    pub fn is_symlink(&self) -> bool {
        *self == EntryKind::Symlink
    }

    /// Files and symlinks are leaves: renamed, never descended into.
    /// They are also counted under the file counters.
    pub fn is_leaf(&self) -> bool {
        !self.is_dir()
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink => "symlink",
        }
    }
}

/// A filesystem entry found by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    /// Absolute path of the entry
    pub path: PathBuf,

    /// What kind of node it is
    pub kind: EntryKind,

    /// Depth from its root (root = 0)
    pub depth: usize,
}

impl PathEntry {
    pub fn new(path: PathBuf, kind: EntryKind, depth: usize) -> Self {
        Self { path, kind, depth }
    }

    /// Final path component as UTF-8, if it has one
    pub fn name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Parent directory of the entry
    pub fn parent(&self) -> Option<&Path> {
        self.path.parent()
    }
}

/// A single rename decision produced by the transformer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameTask {
    /// Current path
    pub old_path: PathBuf,

    /// Target path (same parent directory)
    pub new_path: PathBuf,

    /// Kind of the entry being renamed
    pub kind: EntryKind,
}

impl RenameTask {
    pub fn new(old_path: PathBuf, new_path: PathBuf, kind: EntryKind) -> Self {
        Self {
            old_path,
            new_path,
            kind,
        }
    }

    /// Build a task that keeps the parent directory and swaps the name
    pub fn sibling(old_path: PathBuf, new_name: &str, kind: EntryKind) -> Self {
        let new_path = old_path.with_file_name(new_name);
        Self::new(old_path, new_path, kind)
    }

    /// A task whose target equals its source must be skipped, not executed
    pub fn is_noop(&self) -> bool {
        self.old_path == self.new_path
    }
}
