//! Rename planning for one sibling set
//!
//! Turns the entries of a directory into rename decisions. Sequence mode is
//! planned over the whole set at once; every other mode is decided per
//! entry.

use crate::config::{RunConfig, SequenceStrategy};
use crate::state::NameStateStore;
use crate::transform::Transformation;
use crate::types::{EntryKind, PathEntry, RenameTask};
use std::collections::HashMap;
use std::path::Path;

/// Reason reported for entries the transformation leaves unchanged
pub const REASON_UNCHANGED: &str = "name unchanged";

/// Reason reported for names that are not valid UTF-8
pub const REASON_NOT_UTF8: &str = "name is not valid UTF-8";

/// What to do with one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Rename(RenameTask),
    Skip { entry: PathEntry, reason: &'static str },
}

/// Plan renames for `entries`, all children of `parent` and all members
/// of the same sibling set.
///
/// Decisions are returned in the order of `entries`.
pub fn plan_entries(
    config: &RunConfig,
    store: &NameStateStore,
    parent: &Path,
    set: EntryKind,
    entries: &[PathEntry],
) -> Vec<Decision> {
    let names: Vec<String> = entries
        .iter()
        .filter_map(|e| e.name().map(str::to_string))
        .collect();

    let renumbered: HashMap<String, String> = match (config.mode, config.sequence) {
        (Transformation::Sequence, SequenceStrategy::Renumber) => {
            store.plan_renumber(parent, set, &names).into_iter().collect()
        }
        _ => HashMap::new(),
    };

    entries
        .iter()
        .map(|entry| {
            let Some(name) = entry.name() else {
                return Decision::Skip {
                    entry: entry.clone(),
                    reason: REASON_NOT_UTF8,
                };
            };

            let new_name = match (config.mode, config.sequence) {
                (Transformation::Sequence, SequenceStrategy::Renumber) => renumbered
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| name.to_string()),
                (Transformation::Sequence, SequenceStrategy::Resume) => {
                    store.assign_sequence(parent, set, name, &names)
                }
                (mode, _) => store.resolve(name, entry.kind, mode),
            };

            decide(entry, name, &new_name)
        })
        .collect()
}

fn decide(entry: &PathEntry, name: &str, new_name: &str) -> Decision {
    if new_name.is_empty() || new_name == name {
        Decision::Skip {
            entry: entry.clone(),
            reason: REASON_UNCHANGED,
        }
    } else {
        Decision::Rename(RenameTask::sibling(entry.path.clone(), new_name, entry.kind))
    }
}

/// Split tasks into batches of `size`; the last batch takes the remainder
pub fn chunk_tasks(tasks: Vec<RenameTask>, size: usize) -> Vec<Vec<RenameTask>> {
    let size = size.max(1);
    let mut batches = Vec::with_capacity(tasks.len().div_ceil(size));
    let mut current = Vec::with_capacity(size.min(tasks.len()));

    for task in tasks {
        current.push(task);
        if current.len() == size {
            batches.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn config(mode: Transformation) -> RunConfig {
        RunConfig::builder([std::env::temp_dir()], mode).build().unwrap()
    }

    fn files(parent: &str, names: &[&str]) -> Vec<PathEntry> {
        names
            .iter()
            .map(|n| PathEntry::new(Path::new(parent).join(n), EntryKind::File, 1))
            .collect()
    }

    fn new_names(decisions: &[Decision]) -> Vec<Option<String>> {
        decisions
            .iter()
            .map(|d| match d {
                Decision::Rename(task) => task.new_path.file_name().map(|n| n.to_string_lossy().into_owned()),
                Decision::Skip { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_plan_per_entry_mode() {
        let store = NameStateStore::new();
        let entries = files("/p", &["Hello World.TXT", "already_lower.txt"]);

        let decisions = plan_entries(&config(Transformation::Lower), &store, Path::new("/p"), EntryKind::File, &entries);
        assert_eq!(
            new_names(&decisions),
            vec![Some("hello world.txt".to_string()), None]
        );
        assert!(matches!(
            &decisions[1],
            Decision::Skip { reason, .. } if *reason == REASON_UNCHANGED
        ));
    }

    #[test]
    fn test_plan_sequence_renumber() {
        let store = NameStateStore::new();
        let entries = files("/p", &["a.txt", "b.txt", "c.txt"]);

        let decisions = plan_entries(&config(Transformation::Sequence), &store, Path::new("/p"), EntryKind::File, &entries);
        assert_eq!(
            new_names(&decisions),
            vec![
                Some("001_a.txt".to_string()),
                Some("002_b.txt".to_string()),
                Some("003_c.txt".to_string())
            ]
        );
    }

    #[test]
    fn test_plan_sequence_resume_keeps_numbered() {
        let store = NameStateStore::new();
        let entries = files("/p", &["001_a.txt", "b.txt"]);
        let mut cfg = config(Transformation::Sequence);
        cfg.sequence = SequenceStrategy::Resume;

        let decisions = plan_entries(&cfg, &store, Path::new("/p"), EntryKind::File, &entries);
        assert_eq!(new_names(&decisions), vec![None, Some("002_b.txt".to_string())]);
    }

    #[test]
    fn test_plan_date_uses_store_date() {
        let store = NameStateStore::with_date(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        let entries = files("/p", &["Report.txt"]);

        let decisions = plan_entries(&config(Transformation::DateAppend), &store, Path::new("/p"), EntryKind::File, &entries);
        assert_eq!(new_names(&decisions), vec![Some("Report_20230101.txt".to_string())]);
    }

    #[test]
    fn test_chunk_tasks_remainder_in_last() {
        let tasks: Vec<_> = (0..7)
            .map(|i| RenameTask::sibling(PathBuf::from(format!("/p/{i}")), "x", EntryKind::File))
            .collect();

        let sizes: Vec<_> = chunk_tasks(tasks.clone(), 3).iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);

        assert_eq!(chunk_tasks(tasks.clone(), 100).len(), 1);
        assert_eq!(chunk_tasks(tasks, 0).len(), 7);
        assert!(chunk_tasks(Vec::new(), 3).is_empty());
    }
}
