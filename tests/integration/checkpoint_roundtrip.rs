//! Checkpoint artifact persistence and restoration.

use super::test_utils::{open_ledger, reopen, test_config, write_file};
use fict::checkpoint::Checkpointer;
use fict::error::{LedgerError, StorageError};
use fict::ledger::Ledger;
use fict::types::EntryStatus;
use serde_json::Value;
use std::fs;

#[tokio::test]
async fn test_flush_and_reload_preserves_every_field() {
    let (temp_dir, ledger) = open_ledger(test_config());
    write_file(temp_dir.path(), "dir/a.txt", "alpha");
    write_file(temp_dir.path(), "b.txt", "beta");
    ledger.add(temp_dir.path(), None).unwrap();
    ledger.compute(false).await.unwrap();

    let before = ledger.list();
    let after = reopen(temp_dir.path(), test_config()).list();

    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(after.iter()) {
        assert_eq!(a.to_record(), b.to_record());
    }
}

#[test]
fn test_artifact_is_a_json_array_of_records() {
    let (temp_dir, ledger) = open_ledger(test_config());
    let file = write_file(temp_dir.path(), "a.txt", "alpha");
    ledger.add(&file, Some("md5sum")).unwrap();

    let contents = fs::read_to_string(&ledger.paths().db_file).unwrap();
    let value: Value = serde_json::from_str(&contents).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    for field in fict::entry::RECORD_FIELDS {
        assert!(record.get(*field).is_some(), "missing field {}", field);
    }
    assert_eq!(record["status"], "pending");
    assert_eq!(record["kind"], "file");
    assert_eq!(record["primary_tool"], "blake3");
    assert_eq!(record["secondary_tool"], "md5sum");
    assert!(record["primary_fingerprint"].is_null());
}

#[test]
fn test_missing_artifact_opens_empty() {
    let (temp_dir, ledger) = open_ledger(test_config());
    fs::remove_file(&ledger.paths().db_file).unwrap();

    let reopened = reopen(temp_dir.path(), test_config());
    assert!(reopened.list().is_empty());
}

#[test]
fn test_corrupt_artifact_opens_empty() {
    let (temp_dir, ledger) = open_ledger(test_config());
    fs::write(&ledger.paths().db_file, "{ not json").unwrap();

    let reopened = reopen(temp_dir.path(), test_config());
    assert!(reopened.list().is_empty());
}

#[test]
fn test_non_utf8_artifact_opens_empty() {
    let (temp_dir, ledger) = open_ledger(test_config());
    fs::write(&ledger.paths().db_file, [0xff, 0xfe, b'[', b']']).unwrap();

    let reopened = reopen(temp_dir.path(), test_config());
    assert!(reopened.list().is_empty());
}

#[cfg(unix)]
#[test]
fn test_loaded_paths_use_registry_key_form() {
    let (temp_dir, ledger) = open_ledger(test_config());
    fs::write(
        &ledger.paths().db_file,
        r#"[{
            "path": "/data/./photos/../a.txt/",
            "kind": "file",
            "identity": "4c1d7f0e-0000-4000-8000-000000000001",
            "status": "pending",
            "created_at": "None",
            "primary_fingerprint": null,
            "primary_tool": "blake3",
            "secondary_fingerprint": null,
            "secondary_tool": "blake3"
        }]"#,
    )
    .unwrap();

    let reopened = reopen(temp_dir.path(), test_config());
    assert_eq!(reopened.list()[0].path(), "/data/a.txt");
    assert!(reopened.registry().get(std::path::Path::new("/data/a.txt")).is_some());
}

#[test]
fn test_record_missing_field_aborts_open() {
    let (temp_dir, ledger) = open_ledger(test_config());
    fs::write(
        &ledger.paths().db_file,
        r#"[{"path": "/data/a", "kind": "file", "status": "pending"}]"#,
    )
    .unwrap();

    match Ledger::open(temp_dir.path(), test_config()) {
        Err(LedgerError::Storage(StorageError::Schema { index, .. })) => assert_eq!(index, 0),
        Err(other) => panic!("expected schema error, got {}", other),
        Ok(_) => panic!("expected schema error"),
    }
}

#[test]
fn test_unknown_status_survives_round_trip() {
    let (temp_dir, ledger) = open_ledger(test_config());
    fs::write(
        &ledger.paths().db_file,
        r#"[{
            "path": "/data/a",
            "kind": "file",
            "identity": "4c1d7f0e-0000-4000-8000-000000000000",
            "status": "quarantined",
            "created_at": "None",
            "primary_fingerprint": null,
            "primary_tool": "blake3",
            "secondary_fingerprint": null,
            "secondary_tool": "sha256sum"
        }]"#,
    )
    .unwrap();

    let reopened = reopen(temp_dir.path(), test_config());
    let entries = reopened.list();
    assert_eq!(
        entries[0].status(),
        &EntryStatus::Invalid {
            raw: "quarantined".to_string()
        }
    );
    assert_eq!(reopened.status().invalid, 1);

    reopened.flush().unwrap();
    let records = Checkpointer::new(reopened.paths().db_file.clone())
        .read()
        .unwrap();
    assert_eq!(records[0].status, "quarantined");
    assert_eq!(records[0].created_at, None);
}

#[test]
fn test_failed_flush_keeps_memory_state() {
    let (temp_dir, ledger) = open_ledger(test_config());
    let file = write_file(temp_dir.path(), "a.txt", "alpha");
    fs::remove_dir_all(&ledger.paths().dir).unwrap();

    let result = ledger.add(&file, None);
    assert!(matches!(
        result,
        Err(LedgerError::Storage(StorageError::Persistence { .. }))
    ));
    assert_eq!(ledger.list().len(), 1);
}
