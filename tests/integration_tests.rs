//! Integration tests for bulk-rename
//!
//! Every test builds a real tree under a temporary directory and runs the
//! public engine against it.

use bulk_rename::config::{RunConfig, Scope, SequenceStrategy, SymlinkPolicy, Verbosity};
use bulk_rename::engine::{Renamer, RunSummary};
use bulk_rename::events::{EventOutcome, NullSink, RenameEvent};
use bulk_rename::state::sequence::sequence_prefix;
use bulk_rename::state::NameStateStore;
use bulk_rename::transform::Transformation;
use bulk_rename::RenameError;
use chrono::NaiveDate;
use crossbeam_channel::unbounded;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "").unwrap();
}

fn names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn run(config: RunConfig) -> RunSummary {
    Renamer::new(config).run(&NullSink).unwrap()
}

#[test]
fn test_lowercase_single_file() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("Test File.txt"));

    let summary = run(RunConfig::builder([dir.path()], Transformation::Lower).build().unwrap());

    assert_eq!(names(dir.path()), vec!["test file.txt"]);
    assert_eq!(summary.files_renamed, 1);
    assert_eq!(summary.errors, 0);
}

#[test]
fn test_sequence_numbers_in_name_order() {
    let dir = tempdir().unwrap();
    for name in ["c.txt", "a.txt", "b.txt"] {
        touch(&dir.path().join(name));
    }

    let summary = run(RunConfig::builder([dir.path()], Transformation::Sequence).build().unwrap());

    assert_eq!(names(dir.path()), vec!["001_a.txt", "002_b.txt", "003_c.txt"]);
    assert_eq!(summary.files_renamed, 3);
    assert_eq!(summary.dirs_renamed, 0);
}

#[test]
fn test_remove_date_suffix() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("Report_20230101.txt"));

    let summary = run(RunConfig::builder([dir.path()], Transformation::DateRemove).build().unwrap());

    assert_eq!(names(dir.path()), vec!["Report.txt"]);
    assert_eq!(summary.files_renamed, 1);
}

#[cfg(unix)]
#[test]
fn test_symlink_skipped_directory_renamed() {
    let dir = tempdir().unwrap();
    let photos = dir.path().join("Photos");
    fs::create_dir(&photos).unwrap();
    std::os::unix::fs::symlink("/etc", photos.join("link")).unwrap();

    let summary = run(RunConfig::builder([dir.path()], Transformation::Upper).build().unwrap());

    assert_eq!(names(dir.path()), vec!["PHOTOS"]);
    assert_eq!(names(&dir.path().join("PHOTOS")), vec!["link"]);
    assert_eq!(summary.dirs_renamed, 1);
    assert_eq!(summary.files_skipped, 1);
    assert_eq!(summary.files_renamed, 0);
}

#[cfg(unix)]
#[test]
fn test_symlink_included_renames_link_only() {
    let dir = tempdir().unwrap();
    let target = tempdir().unwrap();
    touch(&target.path().join("Inside.TXT"));
    std::os::unix::fs::symlink(target.path(), dir.path().join("Link")).unwrap();

    let summary = run(
        RunConfig::builder([dir.path()], Transformation::Lower)
            .symlinks(SymlinkPolicy::Include)
            .build()
            .unwrap(),
    );

    assert_eq!(names(dir.path()), vec!["link"]);
    // The target is never traversed
    assert_eq!(names(target.path()), vec!["Inside.TXT"]);
    assert_eq!(summary.files_renamed, 1);
}

#[test]
fn test_already_lowercase_is_skipped() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("test.txt"));

    let summary = run(RunConfig::builder([dir.path()], Transformation::Lower).build().unwrap());

    assert_eq!(names(dir.path()), vec!["test.txt"]);
    assert_eq!(summary.files_renamed, 0);
    assert_eq!(summary.files_skipped, 1);
}

#[test]
fn test_nested_directories_renamed_then_descended() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("Level One/Level Two/Level Three/Deep File.TXT"));
    touch(&dir.path().join("Level One/Sibling.TXT"));

    let summary = run(
        RunConfig::builder([dir.path()], Transformation::Snake)
            .workers(4)
            .batch_sizes(1, 1)
            .build()
            .unwrap(),
    );

    assert!(dir
        .path()
        .join("level_one/level_two/level_three/deep_file.TXT")
        .exists());
    assert!(dir.path().join("level_one/sibling.TXT").exists());
    assert_eq!(summary.dirs_renamed, 3);
    assert_eq!(summary.files_renamed, 2);
    assert_eq!(summary.errors, 0);
}

#[test]
fn test_depth_limits() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("A.TXT"));
    touch(&dir.path().join("D1/B.TXT"));
    touch(&dir.path().join("D1/D2/C.TXT"));

    let summary = run(
        RunConfig::builder([dir.path()], Transformation::Lower)
            .depth(0)
            .build()
            .unwrap(),
    );
    assert_eq!(names(dir.path()), vec!["a.txt", "d1"]);
    assert_eq!(names(&dir.path().join("d1")), vec!["B.TXT", "D2"]);
    assert_eq!(summary.files_renamed + summary.dirs_renamed, 2);

    let summary = run(
        RunConfig::builder([dir.path()], Transformation::Lower)
            .depth(1)
            .build()
            .unwrap(),
    );
    assert_eq!(names(&dir.path().join("d1")), vec!["b.txt", "d2"]);
    assert_eq!(names(&dir.path().join("d1/d2")), vec!["C.TXT"]);
    assert_eq!(summary.renamed(), 2);
}

#[test]
fn test_scope_files_only_and_dirs_only() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("Docs/Readme.MD"));

    run(
        RunConfig::builder([dir.path()], Transformation::Upper)
            .scope(Scope::Files)
            .build()
            .unwrap(),
    );
    assert_eq!(names(dir.path()), vec!["Docs"]);
    assert_eq!(names(&dir.path().join("Docs")), vec!["README.MD"]);

    let summary = run(
        RunConfig::builder([dir.path()], Transformation::Lower)
            .scope(Scope::Directories)
            .build()
            .unwrap(),
    );
    assert_eq!(names(dir.path()), vec!["docs"]);
    assert_eq!(names(&dir.path().join("docs")), vec!["README.MD"]);
    assert_eq!(summary.files_skipped, 0);
    assert_eq!(summary.files_renamed, 0);
}

#[test]
fn test_include_parents_renames_root() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("My Project");
    touch(&root.join("Main File.rs"));

    let summary = run(
        RunConfig::builder([&root], Transformation::Kebab)
            .include_parents(true)
            .build()
            .unwrap(),
    );

    assert_eq!(names(dir.path()), vec!["my-project"]);
    assert_eq!(names(&dir.path().join("my-project")), vec!["main-file.rs"]);
    assert_eq!(summary.dirs_renamed, 1);
    assert_eq!(summary.files_renamed, 1);
}

#[test]
fn test_multiple_roots_share_one_run() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    touch(&first.join("One.TXT"));
    touch(&second.join("Two.TXT"));
    touch(&second.join("Sub/Three.TXT"));

    let summary = run(
        RunConfig::builder([&first, &second], Transformation::Lower)
            .workers(2)
            .build()
            .unwrap(),
    );

    assert_eq!(names(&first), vec!["one.txt"]);
    assert_eq!(names(&second), vec!["sub", "two.txt"]);
    assert_eq!(names(&second.join("sub")), vec!["three.txt"]);
    assert_eq!(summary.roots.len(), 2);
    assert_eq!(summary.files_renamed, 3);
}

#[test]
fn test_collision_is_reported_not_overwritten() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("NOTES.txt"), "upper").unwrap();
    fs::write(dir.path().join("notes.txt"), "lower").unwrap();

    // A case-insensitive filesystem cannot hold both names
    if names(dir.path()).len() != 2 {
        return;
    }

    let (tx, rx) = unbounded::<RenameEvent>();
    let summary = Renamer::new(RunConfig::builder([dir.path()], Transformation::Lower).build().unwrap())
        .run(&tx)
        .unwrap();
    drop(tx);

    assert_eq!(summary.errors, 1);
    assert_eq!(summary.files_skipped, 1);
    assert_eq!(fs::read_to_string(dir.path().join("NOTES.txt")).unwrap(), "upper");
    assert_eq!(fs::read_to_string(dir.path().join("notes.txt")).unwrap(), "lower");

    let errors: Vec<_> = rx.iter().filter(|e| e.outcome == EventOutcome::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].old_path.file_name().unwrap(), "NOTES.txt");
}

#[test]
fn test_sequence_is_a_permutation_across_workers() {
    let dir = tempdir().unwrap();
    for i in 0..250 {
        touch(&dir.path().join(format!("file-{i:03}.dat")));
    }

    let summary = run(
        RunConfig::builder([dir.path()], Transformation::Sequence)
            .workers(8)
            .batch_sizes(7, 100)
            .sequence(SequenceStrategy::Resume)
            .build()
            .unwrap(),
    );

    let numbers: BTreeSet<u64> = names(dir.path())
        .iter()
        .map(|n| sequence_prefix(n).unwrap())
        .collect();
    assert_eq!(numbers, (1..=250).collect::<BTreeSet<u64>>());
    assert_eq!(summary.files_renamed, 250);
}

#[test]
fn test_renumber_across_workers_with_existing_prefixes() {
    let dir = tempdir().unwrap();
    for name in ["005_c.txt", "a.txt", "002_b.txt", "d.txt"] {
        touch(&dir.path().join(name));
    }
    for i in 0..40 {
        touch(&dir.path().join(format!("sub/{:03}_f{i:02}.dat", 40 - i)));
    }

    let summary = run(
        RunConfig::builder([dir.path()], Transformation::Sequence)
            .workers(8)
            .batch_sizes(1, 1)
            .build()
            .unwrap(),
    );

    assert_eq!(summary.errors, 0);
    assert_eq!(
        names(dir.path()),
        vec!["001_a.txt", "001_sub", "002_b.txt", "003_c.txt", "004_d.txt"]
    );

    let sub = names(&dir.path().join("001_sub"));
    let numbers: BTreeSet<u64> = sub.iter().map(|n| sequence_prefix(n).unwrap()).collect();
    assert_eq!(numbers, (1..=40).collect::<BTreeSet<u64>>());
    assert!(sub.iter().all(|n| n.ends_with(".dat")));
    assert_eq!(sub[0], "001_f00.dat");
    assert_eq!(sub[39], "040_f39.dat");
}

#[test]
fn test_sequence_twice_is_a_no_op() {
    let dir = tempdir().unwrap();
    for name in ["x", "y", "z"] {
        touch(&dir.path().join(name));
    }

    let config = RunConfig::builder([dir.path()], Transformation::Sequence).build().unwrap();
    run(config.clone());
    let summary = run(config);

    assert_eq!(names(dir.path()), vec!["001_x", "002_y", "003_z"]);
    assert_eq!(summary.files_renamed, 0);
    assert_eq!(summary.files_skipped, 3);
}

#[test]
fn test_date_mode_uses_one_run_date() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("Report.txt"));
    touch(&dir.path().join("Album/cover.png"));

    let store = NameStateStore::with_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    let config = RunConfig::builder([dir.path()], Transformation::DateAppend).build().unwrap();
    let summary = Renamer::with_store(config, store).run(&NullSink).unwrap();

    assert_eq!(names(dir.path()), vec!["Album_20240229", "Report_20240229.txt"]);
    assert_eq!(names(&dir.path().join("Album_20240229")), vec!["cover_20240229.png"]);
    assert_eq!(summary.renamed(), 3);
}

#[test]
fn test_verbosity_filters_events() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("keep.txt"));
    touch(&dir.path().join("Change.txt"));

    let (tx, rx) = unbounded::<RenameEvent>();
    let config = RunConfig::builder([dir.path()], Transformation::Lower)
        .verbosity(Verbosity::Skipped)
        .build()
        .unwrap();
    Renamer::new(config).run(&tx).unwrap();
    drop(tx);

    let events: Vec<_> = rx.iter().collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, EventOutcome::Skipped);
    assert_eq!(events[0].old_path.file_name().unwrap(), "keep.txt");
}

#[test]
fn test_missing_root_is_a_config_error() {
    let dir = tempdir().unwrap();
    let result = RunConfig::builder([dir.path().join("absent")], Transformation::Lower).build();

    assert!(result.is_err());
    let error: RenameError = result.unwrap_err().into();
    assert!(error.to_string().contains("absent"));
}
