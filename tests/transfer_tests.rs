//! Integration tests for copying and moving source trees
//!
//! These tests verify:
//! - Progress is reported once per file with a strictly increasing count
//! - Copies merge into existing destinations, overwriting files
//! - Moves refuse an existing destination without touching the source

use camino::{Utf8Path, Utf8PathBuf};
use proptest::prelude::*;
use remake_init::TransferProgress;
use remake_init::services::{TransferError, copy_tree, move_tree};
use std::fs;
use tempfile::TempDir;

fn temp_base() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let base = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, base)
}

/// Lay out `count` files spread over a few nested directories.
fn populate(root: &Utf8Path, count: usize) {
    fs::create_dir_all(root).unwrap();
    for i in 0..count {
        let dir = root.join(format!("d{}", i % 3)).join(format!("s{}", i % 2));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("file{}.bin", i)), format!("payload {}", i)).unwrap();
    }
}

fn file_count(root: &Utf8Path) -> usize {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .count()
}

#[test]
fn test_copy_reports_progress_per_file() {
    let (_temp_dir, base) = temp_base();
    let src = base.join("src");
    let dst = base.join("dst");
    populate(&src, 7);

    let mut seen = Vec::new();
    let summary = copy_tree(&src, &dst, |p| seen.push(p)).unwrap();

    assert_eq!(summary.files, 7);
    assert_eq!(seen.len(), 7);
    for (i, progress) in seen.iter().enumerate() {
        assert_eq!(
            *progress,
            TransferProgress {
                completed: i + 1,
                total: 7
            }
        );
    }
    assert_eq!(file_count(&dst), 7);
    assert_eq!(file_count(&src), 7);
}

#[test]
fn test_copy_merges_and_overwrites() {
    let (_temp_dir, base) = temp_base();
    let src = base.join("src");
    let dst = base.join("dst");
    fs::create_dir_all(src.join("GRAPHICS")).unwrap();
    fs::write(src.join("GRAPHICS/tex.bin"), b"new").unwrap();

    fs::create_dir_all(dst.join("GRAPHICS")).unwrap();
    fs::write(dst.join("GRAPHICS/tex.bin"), b"old").unwrap();
    fs::write(dst.join("keep.txt"), b"keep").unwrap();

    copy_tree(&src, &dst, |_| {}).unwrap();

    assert_eq!(fs::read(dst.join("GRAPHICS/tex.bin")).unwrap(), b"new");
    assert_eq!(fs::read(dst.join("keep.txt")).unwrap(), b"keep");
}

#[test]
fn test_copy_recreates_empty_directories() {
    let (_temp_dir, base) = temp_base();
    let src = base.join("src");
    fs::create_dir_all(src.join("IRX/empty")).unwrap();

    let dst = base.join("dst");
    let summary = copy_tree(&src, &dst, |_| {}).unwrap();

    assert_eq!(summary.files, 0);
    assert_eq!(summary.dirs, 2);
    assert!(dst.join("IRX/empty").is_dir());
}

#[test]
fn test_move_refuses_existing_destination() {
    let (_temp_dir, base) = temp_base();
    let src = base.join("src");
    let dst = base.join("dst");
    populate(&src, 4);
    fs::create_dir_all(&dst).unwrap();

    let mut calls = 0;
    let result = move_tree(&src, &dst, |_| calls += 1);

    assert!(matches!(result, Err(TransferError::DestinationExists(_))));
    assert_eq!(calls, 0);
    assert_eq!(file_count(&src), 4);
    assert_eq!(file_count(&dst), 0);
}

#[test]
fn test_move_relocates_tree() {
    let (_temp_dir, base) = temp_base();
    let src = base.join("src");
    let dst = base.join("project/Source/GameFiles/SimpGamePS2");
    populate(&src, 5);

    let mut last = None;
    let summary = move_tree(&src, &dst, |p| last = Some(p)).unwrap();

    assert_eq!(summary.files, 5);
    assert_eq!(
        last,
        Some(TransferProgress {
            completed: 5,
            total: 5
        })
    );
    assert!(!src.exists());
    assert_eq!(file_count(&dst), 5);
}

#[test]
fn test_move_missing_source() {
    let (_temp_dir, base) = temp_base();
    let result = move_tree(&base.join("gone"), &base.join("dst"), |_| {});

    assert!(matches!(result, Err(TransferError::SourceNotDirectory(_))));
    assert!(!base.join("dst").exists());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_copy_progress_reaches_file_count(count in 0usize..24) {
        let (_temp_dir, base) = temp_base();
        let src = base.join("src");
        populate(&src, count);

        let mut completed = Vec::new();
        copy_tree(&src, &base.join("dst"), |p| {
            completed.push(p.completed);
            assert_eq!(p.total, count);
        })
        .unwrap();

        prop_assert_eq!(completed, (1..=count).collect::<Vec<_>>());
    }
}
