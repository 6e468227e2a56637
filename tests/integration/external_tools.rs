//! Secondary fingerprints from system checksum tools.

use super::test_utils::{open_ledger, test_config, tool_available, write_file};
use fict::hash::{ExternalTool, HashComputer, Toolbox};
use fict::types::EntryStatus;
use fict::verify::Verdict;
use std::fs;
use std::time::Duration;

const HELLO_SHA256: &str = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03";
const HELLO_MD5: &str = "b1946ac92492d2347c6235b4d2611184";

#[tokio::test]
async fn test_sha256sum_first_token() {
    if !tool_available("sha256sum") {
        return;
    }
    let temp_dir = tempfile::TempDir::new().unwrap();
    let file = write_file(temp_dir.path(), "hello.txt", "hello\n");

    let tool = ExternalTool::new("sha256sum", Some(Duration::from_secs(30)));
    assert_eq!(tool.compute(&file).await.unwrap(), HELLO_SHA256);
}

#[tokio::test]
async fn test_md5sum_through_toolbox() {
    if !tool_available("md5sum") {
        return;
    }
    let temp_dir = tempfile::TempDir::new().unwrap();
    let file = write_file(temp_dir.path(), "hello.txt", "hello\n");

    let toolbox = Toolbox::new(Some(Duration::from_secs(30)));
    assert_eq!(toolbox.fingerprint("md5sum", &file).await.unwrap(), HELLO_MD5);
}

#[tokio::test]
async fn test_ledger_with_sha256_secondary() {
    if !tool_available("sha256sum") {
        return;
    }
    let (temp_dir, ledger) = open_ledger(test_config());
    let file = write_file(temp_dir.path(), "hello.txt", "hello\n");
    ledger.add(&file, Some("sha256sum")).unwrap();
    ledger.compute(false).await.unwrap();

    let entry = &ledger.list()[0];
    assert_eq!(entry.status(), &EntryStatus::Computed);
    assert_eq!(entry.secondary_tool(), "sha256sum");
    assert_eq!(entry.secondary_fingerprint(), Some(HELLO_SHA256));

    let report = ledger.check("").await;
    assert_eq!(report.results[0].verdict, Verdict::Pass);
}

#[tokio::test]
async fn test_missing_secondary_tool_leaves_entry_pending() {
    let (temp_dir, ledger) = open_ledger(test_config());
    let file = write_file(temp_dir.path(), "a.txt", "a");
    ledger.add(&file, Some("fict-no-such-checksum-tool")).unwrap();

    let summary = ledger.compute(false).await.unwrap();
    assert_eq!(summary.failed, 1);

    let entry = &ledger.list()[0];
    assert_eq!(entry.status(), &EntryStatus::Pending);
    assert!(entry.primary_fingerprint().is_none());
    assert!(entry.secondary_fingerprint().is_none());

    // Still eligible: the next run tries again.
    fs::write(&file, "b").unwrap();
    assert_eq!(ledger.compute(false).await.unwrap().scheduled, 1);
}
