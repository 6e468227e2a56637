//! End-to-end ledger lifecycle: add, compute, check, mutate, recompute.

use super::test_utils::{open_ledger, reopen, test_config, write_file};
use fict::types::{EntryKind, EntryStatus, DIRECTORY_FINGERPRINT, PRIMARY_TOOL};
use fict::verify::Verdict;
use std::fs;

#[tokio::test]
async fn test_single_file_lifecycle() {
    let (temp_dir, ledger) = open_ledger(test_config());
    let file = write_file(temp_dir.path(), "a.txt", "hello\n");

    let added = ledger.add(&file, None).unwrap();
    assert_eq!(added.added, 1);

    let entries = ledger.list();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status(), &EntryStatus::Pending);
    assert_eq!(entries[0].primary_tool(), PRIMARY_TOOL);
    assert!(entries[0].primary_fingerprint().is_none());

    let summary = ledger.compute(false).await.unwrap();
    assert_eq!(summary.scheduled, 1);
    assert_eq!(summary.computed, 1);
    assert_eq!(summary.failed, 0);

    let entry = &ledger.list()[0];
    let expected = blake3::hash(b"hello\n").to_hex().to_string();
    assert_eq!(entry.status(), &EntryStatus::Computed);
    assert_eq!(entry.primary_fingerprint(), Some(expected.as_str()));

    let report = ledger.check("").await;
    assert_eq!(report.passed, 1);
    assert!(report.is_clean());

    fs::write(&file, "hello, changed\n").unwrap();
    let report = ledger.check("").await;
    assert_eq!(report.failed, 1);
    assert_eq!(report.results[0].verdict, Verdict::Fail);

    // Verification never mutates: the stale fingerprint is still stored.
    assert_eq!(
        ledger.list()[0].primary_fingerprint(),
        Some(expected.as_str())
    );

    let summary = ledger.compute(true).await.unwrap();
    assert_eq!(summary.computed, 1);
    let report = ledger.check("").await;
    assert_eq!(report.passed, 1);
}

#[tokio::test]
async fn test_second_compute_without_force_does_nothing() {
    let (temp_dir, ledger) = open_ledger(test_config());
    write_file(temp_dir.path(), "a.txt", "a");
    write_file(temp_dir.path(), "b.txt", "b");
    ledger.add(temp_dir.path(), None).unwrap();

    assert_eq!(ledger.compute(false).await.unwrap().computed, 2);
    let again = ledger.compute(false).await.unwrap();
    assert_eq!(again.scheduled, 0);
    assert_eq!(again.computed, 0);
}

#[tokio::test]
async fn test_directory_entries_get_sentinel() {
    let (temp_dir, ledger) = open_ledger(test_config());
    write_file(temp_dir.path(), "photos/2024/img.jpg", "jpeg");
    ledger.add(temp_dir.path(), None).unwrap();
    ledger.compute(false).await.unwrap();

    let directories: Vec<_> = ledger
        .list()
        .into_iter()
        .filter(|e| e.kind() == Some(EntryKind::Directory))
        .collect();
    assert_eq!(directories.len(), 2);
    for entry in directories {
        assert_eq!(entry.primary_fingerprint(), Some(DIRECTORY_FINGERPRINT));
        assert_eq!(entry.secondary_fingerprint(), Some(DIRECTORY_FINGERPRINT));
        assert_eq!(entry.status(), &EntryStatus::Computed);
    }
}

#[tokio::test]
async fn test_check_prefix_filters_and_falls_back_to_all() {
    let (temp_dir, ledger) = open_ledger(test_config());
    write_file(temp_dir.path(), "keep/a.txt", "a");
    write_file(temp_dir.path(), "other/b.txt", "b");
    ledger.add(temp_dir.path(), None).unwrap();
    ledger.compute(false).await.unwrap();

    let prefix = temp_dir.path().join("keep");
    let report = ledger.check(&prefix.to_string_lossy()).await;
    assert_eq!(report.results.len(), 2);
    assert!(report
        .results
        .iter()
        .all(|r| r.path.starts_with(&*prefix.to_string_lossy())));

    let report = ledger.check("/definitely/not/tracked").await;
    assert_eq!(report.results.len(), 4);
}

#[tokio::test]
async fn test_compute_survives_deleted_file() {
    let (temp_dir, ledger) = open_ledger(test_config());
    let gone = write_file(temp_dir.path(), "gone.txt", "x");
    write_file(temp_dir.path(), "kept.txt", "y");
    ledger.add(temp_dir.path(), None).unwrap();
    fs::remove_file(&gone).unwrap();

    let summary = ledger.compute(false).await.unwrap();
    assert_eq!(summary.computed, 1);
    assert_eq!(summary.failed, 1);

    let status = ledger.status();
    assert_eq!(status.pending, 1);
    assert_eq!(status.computed, 1);
    assert_eq!(status.percent_computed, 50.0);

    let reopened = reopen(temp_dir.path(), test_config());
    assert_eq!(reopened.status(), status);
}
