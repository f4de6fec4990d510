//! Integration tests for the moim-ledger CLI.
//!
//! These tests run the actual binary and verify output against expected files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

fn ledger() -> Command {
    let mut cmd = Command::cargo_bin("moim-ledger").unwrap();
    cmd.env_remove("MOIM_MEMBERS").env_remove("MOIM_FORMAT");
    cmd
}

/// Run the binary with the given arguments and return stdout
fn run_ledger(args: &[&str]) -> String {
    let assert = ledger().args(args).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn test_scenario_a_csv_output() {
    let output = run_ledger(&[
        "--members",
        "Alice,Bob,Carol",
        "--format",
        "csv",
        &test_data_path("scenario_a.csv"),
    ]);
    let expected = fs::read_to_string(test_data_path("expected_a.csv")).unwrap();

    assert_eq!(output, expected);
}

#[test]
fn test_trip_with_provenance_columns() {
    let output = run_ledger(&[
        "-m",
        "Alice, Bob, Carol, Dan",
        "-f",
        "csv",
        &test_data_path("trip.csv"),
    ]);
    let expected = fs::read_to_string(test_data_path("expected_trip.csv")).unwrap();

    assert_eq!(output, expected);
}

#[test]
fn test_statement_adds_withdrawals_for_payer() {
    let output = run_ledger(&[
        "-m",
        "Alice,Bob,Carol,Dan",
        "-f",
        "json",
        "--statement",
        &test_data_path("dan_statement.txt"),
        "--payer",
        "Dan",
        &test_data_path("trip.csv"),
    ]);

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["total_amount"], "380000.00");
    assert_eq!(value["per_person_share"], "95000.00");
    assert_eq!(value["balances"][3]["paid"], "48000.00");

    let transfers = value["transfers"].as_array().unwrap();
    let pairs: Vec<(&str, &str, &str)> = transfers
        .iter()
        .map(|t| {
            (
                t["from"].as_str().unwrap(),
                t["to"].as_str().unwrap(),
                t["amount"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Bob", "Alice", "23000.00"),
            ("Carol", "Alice", "75000.00"),
            ("Dan", "Alice", "47000.00"),
        ]
    );
}

#[test]
fn test_default_report_output() {
    let output = run_ledger(&["--members", "Alice,Bob,Carol", &test_data_path("scenario_a.csv")]);

    assert!(output.starts_with("Moim Ledger settlement report"));
    assert!(output.contains("Document ML-"));
    assert!(output.contains("Participants 3"));
    assert!(output
        .lines()
        .any(|l| l.split_whitespace().collect::<Vec<_>>() == ["Bob", "Alice", "100"]));
}

#[test]
fn test_everyone_paid_evenly() {
    let output = run_ledger(&["-m", "Alice,Bob,Carol", &test_data_path("even.csv")]);
    assert!(output.contains("No further transfers needed."));
}

#[test]
fn test_members_from_environment() {
    let mut cmd = ledger();
    cmd.env("MOIM_MEMBERS", "Alice,Bob,Carol")
        .env("MOIM_FORMAT", "csv")
        .arg(test_data_path("scenario_a.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Carol,Alice,100.00"));
}

#[test]
fn test_generated_upload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("upload.csv");
    fs::write(&path, "payer,amount\nA,100\n").unwrap();

    let output = run_ledger(&["-m", "A,B,C", "-f", "csv", path.to_str().unwrap()]);
    assert!(output.contains("A,100.00,66.67\n"));
    assert!(output.contains("B,0.00,-33.33\n"));
    assert!(output.contains("B,A,33.33\nC,A,33.33\n"));
}

#[test]
fn test_missing_file_error() {
    ledger()
        .args(["-m", "Alice", "nonexistent.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_missing_members_argument() {
    ledger()
        .arg(test_data_path("scenario_a.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--members"));
}

#[test]
fn test_missing_columns_rejected() {
    ledger()
        .args(["-m", "Alice"])
        .arg(test_data_path("missing_columns.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required column(s): payer, amount"));
}

#[test]
fn test_invalid_row_rejected() {
    ledger()
        .args(["-m", "Alice,Bob"])
        .arg(test_data_path("bad_amount.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("row 3"));
}

#[test]
fn test_duplicate_members_rejected() {
    ledger()
        .args(["-m", "Alice,Bob,Alice"])
        .arg(test_data_path("scenario_a.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate member: Alice"));
}

#[test]
fn test_unknown_payer_rejected_by_default() {
    ledger()
        .args(["-m", "Alice,Bob,Carol"])
        .arg(test_data_path("unknown_payer.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mallory is not a session member"));
}

#[test]
fn test_unknown_payer_allowed() {
    let output = run_ledger(&[
        "-m",
        "Alice,Bob,Carol",
        "-f",
        "csv",
        "--allow-unknown-payers",
        &test_data_path("unknown_payer.csv"),
    ]);

    assert!(output.starts_with("total_amount,90.00\nper_person,30.00\n"));
    assert!(!output.contains("Mallory"));
}

#[test]
fn test_statement_without_payer() {
    ledger()
        .args(["-m", "Alice", "--statement"])
        .arg(test_data_path("dan_statement.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 statement file(s) but 0 payer(s)"));
}

#[test]
fn test_oversized_amounts_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("huge.csv");
    fs::write(
        &path,
        "payer,amount\nA,50000000000000000000000000000\nB,50000000000000000000000000000\n",
    )
    .unwrap();

    ledger()
        .args(["-m", "A,B"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("row 2: amount 50000000000000000000000000000 is too large"));
}

#[test]
fn test_expenses_without_members_warns() {
    ledger()
        .args(["--members", "", "--allow-unknown-payers"])
        .arg(test_data_path("scenario_a.csv"))
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Warning: expenses were recorded but no members",
        ))
        .stdout(predicate::str::contains("No participants yet"));
}
