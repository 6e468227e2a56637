//! Approval gate behaviour.

use super::test_utils::{open_ledger, reopen, test_config, write_file};
use fict::error::LedgerError;
use fict::types::EntryStatus;

#[tokio::test]
async fn test_refused_approval_changes_nothing() {
    let (temp_dir, ledger) = open_ledger(test_config());
    for name in ["a", "b", "c", "d"] {
        write_file(temp_dir.path(), name, name);
    }
    ledger.add(temp_dir.path(), None).unwrap();
    ledger.compute(false).await.unwrap();

    let err = ledger.approve(false).unwrap_err();
    assert!(matches!(err, LedgerError::ApprovalNotConfirmed { awaiting: 4 }));
    assert!(ledger
        .list()
        .iter()
        .all(|e| e.status() == &EntryStatus::Computed));

    let reopened = reopen(temp_dir.path(), test_config());
    assert_eq!(reopened.status().computed, 4);
    assert_eq!(reopened.status().approved, 0);
}

#[tokio::test]
async fn test_confirmed_approval_persists_and_skips_pending() {
    let (temp_dir, ledger) = open_ledger(test_config());
    let a = write_file(temp_dir.path(), "a", "a");
    ledger.add(&a, None).unwrap();
    ledger.compute(false).await.unwrap();

    let b = write_file(temp_dir.path(), "b", "b");
    ledger.add(&b, None).unwrap();

    assert_eq!(ledger.approve(true).unwrap(), 1);

    let reopened = reopen(temp_dir.path(), test_config());
    let status = reopened.status();
    assert_eq!(status.approved, 1);
    assert_eq!(status.pending, 1);
    assert_eq!(status.computed, 0);
}

#[tokio::test]
async fn test_approved_entries_are_still_checked() {
    let (temp_dir, ledger) = open_ledger(test_config());
    let a = write_file(temp_dir.path(), "a", "a");
    ledger.add(&a, None).unwrap();
    ledger.compute(false).await.unwrap();
    ledger.approve(true).unwrap();

    let report = ledger.check("").await;
    assert_eq!(report.passed, 1);
    assert_eq!(report.skipped, 0);
}

#[tokio::test]
async fn test_force_recompute_resets_approved() {
    let (temp_dir, ledger) = open_ledger(test_config());
    let a = write_file(temp_dir.path(), "a", "a");
    ledger.add(&a, None).unwrap();
    ledger.compute(false).await.unwrap();
    ledger.approve(true).unwrap();

    ledger.compute(true).await.unwrap();
    assert_eq!(ledger.list()[0].status(), &EntryStatus::Computed);
}
