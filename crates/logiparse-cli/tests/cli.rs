//! End-to-end tests for the logiparse binary.

use assert_cmd::Command;
use predicates::prelude::*;

const SAMPLE_INVOICE: &str = "\
LOGISTICS INVOICE
Invoice No: INV-2024-00892
Date: February 20, 2024
Tracking No: TRK-PH-44821

From: ABC Warehousing Corp., Mandaue City, Cebu
To: XYZ Retail Store, Makati City, Metro Manila

Items:
Industrial Fan Motor     2    1500.00    3000.00
Conveyor Belt Segment    5     800.00    4000.00
Safety Gloves (box)     10     250.00    2500.00

Total Weight: 45.5 kg
Total Amount: PHP 9,500.00";

fn logiparse() -> Command {
    Command::cargo_bin("logiparse").unwrap()
}

#[test]
fn extracts_fields_from_stdin() {
    logiparse()
        .arg("extract")
        .write_stdin(SAMPLE_INVOICE)
        .assert()
        .success()
        .stdout(predicate::str::contains("INV-2024-00892"))
        .stdout(predicate::str::contains("TRK-PH-44821"))
        .stdout(predicate::str::contains("9500.00"))
        .stdout(predicate::str::contains("\"PASS\""))
        .stdout(predicate::str::contains("5/5 key fields extracted"));
}

#[test]
fn json_export_omits_raw_preview() {
    logiparse()
        .arg("extract")
        .write_stdin(SAMPLE_INVOICE)
        .assert()
        .success()
        .stdout(predicate::str::contains("raw_text_preview").not());
}

#[test]
fn text_format_shows_summary() {
    logiparse()
        .args(["extract", "--format", "text"])
        .write_stdin(SAMPLE_INVOICE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation: PASS"))
        .stdout(predicate::str::contains("Safety Gloves (box)"));
}

#[test]
fn missing_amount_fails_validation() {
    logiparse()
        .arg("extract")
        .write_stdin("Invoice No: INV-1\nsome text without totals")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"FAIL\""))
        .stdout(predicate::str::contains("Total amount not found"));
}

#[test]
fn rejects_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("invoice.docx");
    std::fs::write(&path, "not a supported format").unwrap();

    logiparse()
        .arg("extract")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file format"));
}

#[test]
fn rejects_empty_stdin() {
    logiparse()
        .arg("extract")
        .write_stdin("   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No input"));
}

#[test]
fn writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("result.json");

    logiparse()
        .args(["extract", "--output"])
        .arg(&out)
        .write_stdin(SAMPLE_INVOICE)
        .assert()
        .success();

    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.contains("INV-2024-00892"));
}

#[test]
fn config_show_prints_defaults() {
    logiparse()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"default_currency\": \"PHP\""));
}

#[test]
fn batch_requires_matching_files() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = dir.path().join("*.pdf");

    logiparse()
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}
