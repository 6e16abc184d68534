//! Directory enumeration and entry classification
//!
//! Entries are classified without following symlinks. Anything that is not
//! a regular file, a directory or a symlink is dropped here.

use crate::types::{EntryKind, PathEntry};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{trace, warn};

/// Classify a single path without following it
pub fn classify(path: &Path) -> io::Result<Option<EntryKind>> {
    let meta = fs::symlink_metadata(path)?;
    Ok(EntryKind::from_file_type(meta.file_type()))
}

/// List a directory, sorted by name.
///
/// Failing to open the directory is an error; a single unreadable entry
/// is logged and left out.
pub fn list_directory(dir: &Path, depth: usize) -> io::Result<Vec<PathEntry>> {
    let mut entries = Vec::new();

    for item in fs::read_dir(dir)? {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Unreadable directory entry");
                continue;
            }
        };

        let file_type = match item.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                warn!(path = %item.path().display(), error = %e, "Cannot determine entry type");
                continue;
            }
        };

        match EntryKind::from_file_type(file_type) {
            Some(kind) => entries.push(PathEntry::new(item.path(), kind, depth)),
            None => trace!(path = %item.path().display(), "Ignoring special file"),
        }
    }

    entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(entries)
}

/// UTF-8 names in `dir` that belong to the same sibling set as `kind`
/// (leaves or directories). Used when a root is numbered on its own.
pub fn sibling_names(dir: &Path, kind: EntryKind) -> Vec<String> {
    let entries = match list_directory(dir, 0) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Cannot list siblings");
            return Vec::new();
        }
    };

    entries
        .iter()
        .filter(|e| e.kind.is_leaf() == kind.is_leaf())
        .filter_map(|e| e.name().map(str::to_string))
        .collect()
}
