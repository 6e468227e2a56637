//! CLI presentation: text and json formatters per command.
//!
//! Text formatters take a `color` flag; without it no escape codes are emitted.

use crate::config::LedgerPaths;
use crate::engine::ComputeSummary;
use crate::entry::{Entry, EntryRecord};
use crate::error::{LedgerError, StorageError};
use crate::ledger::{AddSummary, CheckReport};
use crate::status::StatusSummary;
use crate::verify::Verdict;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::{OwoColorize, Style};
use std::fmt::Display;
use serde::Serialize;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, LedgerError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| LedgerError::Storage(StorageError::Serialize(e.to_string())))
}

fn paint<T: Display>(value: T, style: Style, color: bool) -> String {
    if color {
        value.style(style).to_string()
    } else {
        value.to_string()
    }
}

pub fn format_init_summary(paths: &LedgerPaths) -> String {
    format!(
        "Initialized empty ledger in {}\nLedger file: {}",
        paths.dir.display(),
        paths.db_file.display()
    )
}

pub fn format_add_summary(summary: &AddSummary) -> String {
    format!(
        "Added {} entries ({} ignored or already tracked)",
        summary.added, summary.skipped
    )
}

pub fn format_compute_summary(summary: &ComputeSummary, color: bool) -> String {
    let mut out = format!(
        "Computed {} of {} scheduled entries",
        summary.computed, summary.scheduled
    );
    if summary.failed > 0 {
        out.push_str(&format!(
            "\n{} entries could not be hashed and remain pending",
            paint(summary.failed, Style::new().red(), color)
        ));
    }
    if summary.checkpoints > 0 {
        out.push_str(&format!("\n{} intermediate checkpoints written", summary.checkpoints));
    }
    out
}

pub fn format_approved(count: usize) -> String {
    format!("Approved {} entries", count)
}

/// Entry table: path, kind, status, then the secondary tool and fingerprint.
pub fn format_entry_list(entries: &[Entry], format: &str) -> Result<String, LedgerError> {
    if format == "json" {
        let records: Vec<EntryRecord> = entries.iter().map(Entry::to_record).collect();
        return to_json(&records);
    }
    if entries.is_empty() {
        return Ok("No entries tracked.".to_string());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Kind", "Status", "Secondary Tool", "Secondary Fingerprint"]);
    for entry in entries {
        table.add_row(vec![
            entry.path().to_string(),
            entry.kind().map(|k| k.as_str()).unwrap_or("?").to_string(),
            entry.status().to_string(),
            entry.secondary_tool().to_string(),
            entry.secondary_fingerprint().unwrap_or("-").to_string(),
        ]);
    }
    Ok(table.to_string())
}

fn verdict_label(verdict: Verdict, color: bool) -> String {
    match verdict {
        Verdict::Pass => paint("PASS", Style::new().green(), color),
        Verdict::SecondaryPass => paint("SECONDARY", Style::new().yellow(), color),
        Verdict::Fail => paint("FAIL", Style::new().red().bold(), color),
    }
}

pub fn format_check_report(
    report: &CheckReport,
    format: &str,
    color: bool,
) -> Result<String, LedgerError> {
    if format == "json" {
        return to_json(report);
    }

    let mut out = String::new();
    if !report.results.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Result", "Path"]);
        for result in &report.results {
            table.add_row(vec![verdict_label(result.verdict, color), result.path.clone()]);
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }
    out.push_str(&format!(
        "{} passed, {} passed on secondary only, {} failed, {} not yet computed",
        report.passed, report.secondary_passed, report.failed, report.skipped
    ));
    Ok(out)
}

pub fn format_status(
    summary: &StatusSummary,
    format: &str,
    color: bool,
) -> Result<String, LedgerError> {
    if format == "json" {
        return to_json(summary);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["State", "Entries"]);
    table.add_row(vec!["pending".to_string(), summary.pending.to_string()]);
    table.add_row(vec!["computed".to_string(), summary.computed.to_string()]);
    table.add_row(vec!["approved".to_string(), summary.approved.to_string()]);
    let invalid = if summary.invalid > 0 {
        paint(summary.invalid, Style::new().red(), color)
    } else {
        summary.invalid.to_string()
    };
    table.add_row(vec!["invalid".to_string(), invalid]);
    table.add_row(vec!["total".to_string(), summary.total.to_string()]);

    Ok(format!(
        "{}\n{}% computed",
        table,
        paint(format!("{:.2}", summary.percent_computed), Style::new().bold(), color)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CheckResult;
    use crate::types::EntryKind;

    #[test]
    fn test_entry_list_json_uses_record_fields() {
        let entry = Entry::new(EntryKind::File, "/data/a".to_string(), "sha256sum");
        let out = format_entry_list(&[entry], "json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["path"], "/data/a");
        assert_eq!(value[0]["status"], "pending");
        assert_eq!(value[0]["secondary_tool"], "sha256sum");
    }

    #[test]
    fn test_empty_list_text() {
        assert_eq!(format_entry_list(&[], "text").unwrap(), "No entries tracked.");
    }

    #[test]
    fn test_check_report_json() {
        let report = CheckReport {
            results: vec![CheckResult {
                path: "/data/a".to_string(),
                verdict: Verdict::SecondaryPass,
            }],
            secondary_passed: 1,
            ..CheckReport::default()
        };
        let out = format_check_report(&report, "json", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["results"][0]["verdict"], "secondary_pass");
        assert_eq!(value["secondary_passed"], 1);
    }

    #[test]
    fn test_status_text_mentions_percent() {
        let summary = StatusSummary {
            total: 4,
            pending: 1,
            computed: 3,
            percent_computed: 75.0,
            ..StatusSummary::default()
        };
        let out = format_status(&summary, "text", false).unwrap();
        assert!(out.contains("75.00% computed"));
        assert!(out.contains("pending"));
    }

    #[test]
    fn test_plain_text_has_no_escape_codes() {
        let report = CheckReport {
            results: vec![
                CheckResult {
                    path: "/data/a".to_string(),
                    verdict: Verdict::Pass,
                },
                CheckResult {
                    path: "/data/b".to_string(),
                    verdict: Verdict::Fail,
                },
            ],
            passed: 1,
            failed: 1,
            ..CheckReport::default()
        };
        let summary = StatusSummary {
            total: 1,
            invalid: 1,
            ..StatusSummary::default()
        };
        let compute = ComputeSummary {
            scheduled: 2,
            computed: 1,
            failed: 1,
            ..ComputeSummary::default()
        };

        let check = format_check_report(&report, "text", false).unwrap();
        assert!(check.contains("FAIL"));
        assert!(!check.contains('\x1b'));
        assert!(!format_status(&summary, "text", false).unwrap().contains('\x1b'));
        assert!(!format_compute_summary(&compute, false).contains('\x1b'));
    }

    #[test]
    fn test_colored_text_styles_failures() {
        let report = CheckReport {
            results: vec![CheckResult {
                path: "/data/b".to_string(),
                verdict: Verdict::Fail,
            }],
            failed: 1,
            ..CheckReport::default()
        };
        assert!(format_check_report(&report, "text", true).unwrap().contains('\x1b'));
    }
}
