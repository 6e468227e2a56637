//! Integration tests for the configuration system

use super::test_utils::write_file;
use fict::config::ConfigLoader;
use fict::ledger::Ledger;
use tempfile::TempDir;

#[test]
fn test_workspace_config_drives_ledger_location() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        temp_dir.path(),
        ".fict/config.toml",
        r#"
[ledger]
db_name = "ledger.json"
extra_ignore = ["node_modules"]

[compute]
secondary_tool = "blake3"
workers = 1
"#,
    );

    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert_eq!(config.ledger.db_name, "ledger.json");
    assert_eq!(config.compute.workers, Some(1));

    let paths = Ledger::init(temp_dir.path(), &config).unwrap();
    assert!(paths.db_file.ends_with(".fict/ledger.json"));
    assert!(paths.db_file.is_file());

    write_file(temp_dir.path(), "node_modules/pkg/index.js", "x");
    write_file(temp_dir.path(), "src/main.rs", "fn main() {}");
    let ledger = Ledger::open(temp_dir.path(), config).unwrap();
    let summary = ledger.add(temp_dir.path(), None).unwrap();
    assert_eq!(summary.added, 2);
    assert!(ledger
        .list()
        .iter()
        .all(|e| !e.path().contains("node_modules") && !e.path().contains(".fict")));
}

#[test]
fn test_explicit_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(
        temp_dir.path(),
        "custom.toml",
        "[logging]\nlevel = \"debug\"\nformat = \"json\"\n",
    );

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.compute.checkpoint_interval, 1000);
}

#[test]
fn test_invalid_logging_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "bad.toml", "[logging]\noutput = \"printer\"\n");
    assert!(ConfigLoader::load_from_file(&path).is_err());
}
