//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `cropcast` binary to verify that
//! argument parsing, the JSON envelope contract, and error handling work
//! end-to-end.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("cropcast").unwrap()
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("train"))
        .stdout(predicate::str::contains("predict"))
        .stdout(predicate::str::contains("recommend"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cropcast"));
}

// ---------------------------------------------------------------------------
// predict envelope contract
// ---------------------------------------------------------------------------

#[test]
fn predict_with_six_args_emits_failure_envelope() {
    cmd()
        .args(["predict", "90", "40", "40", "25.5", "75", "6.8"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\":false"))
        .stdout(predicate::str::contains("Expected 7 features"))
        .stdout(predicate::str::contains("\"success\":true").not());
}

#[test]
fn predict_with_non_numeric_arg_emits_failure_envelope() {
    cmd()
        .args(["predict", "90", "40", "abc", "25.5", "75", "6.8", "180"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\":false"))
        .stdout(predicate::str::contains("abc"));
}

#[test]
fn predict_with_missing_model_emits_failure_envelope() {
    cmd()
        .args([
            "predict",
            "--model",
            "/nonexistent/crop_model.json",
            "90",
            "40",
            "40",
            "25.5",
            "75",
            "6.8",
            "180",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\":false"))
        .stdout(predicate::str::contains("Failed to load model"));
}

#[test]
fn predict_failure_output_is_valid_json() {
    let output = cmd()
        .args(["predict", "1", "2", "3"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed["success"], false);
    assert!(parsed["error"].is_string());
}

// ---------------------------------------------------------------------------
// train
// ---------------------------------------------------------------------------

#[test]
fn train_no_data_errors() {
    cmd().arg("train").assert().failure();
}

#[test]
fn train_nonexistent_data_errors() {
    cmd()
        .args(["train", "/nonexistent/crops.csv"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// recommend
// ---------------------------------------------------------------------------

#[test]
fn recommend_without_model_errors() {
    cmd()
        .args(["recommend", "--model", "/nonexistent/crop_model.json"])
        .assert()
        .failure();
}
