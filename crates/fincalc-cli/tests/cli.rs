//! Command-line tests for the `fincalc` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command pinned to a config file with a fixed reference year.
fn fincalc(dir: &TempDir) -> Command {
    let path = dir.path().join("config.toml");
    fs::write(&path, "current_year = 2025\n").unwrap();

    let mut cmd = Command::cargo_bin("fincalc").unwrap();
    cmd.env_remove("RUST_LOG").arg("--config").arg(path);
    cmd
}

#[test]
fn test_list() {
    let dir = TempDir::new().unwrap();
    fincalc(&dir)
        .args(["--format", "minimal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("roi/general"))
        .stdout(predicate::str::contains("investment/risk-assessment"));
}

#[test]
fn test_list_by_category() {
    let dir = TempDir::new().unwrap();
    fincalc(&dir)
        .args(["--format", "minimal", "list", "--category", "Debt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("debt/payoff"))
        .stdout(predicate::str::contains("credit-card/payoff"))
        .stdout(predicate::str::contains("roi/general").not());
}

#[test]
fn test_describe() {
    let dir = TempDir::new().unwrap();
    fincalc(&dir)
        .args(["--format", "csv", "describe", "mortgage/basic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pmi_rate"))
        .stdout(predicate::str::contains("include_pmi"));
}

#[test]
fn test_describe_unknown() {
    let dir = TempDir::new().unwrap();
    fincalc(&dir)
        .args(["describe", "nope/missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown formula"));
}

#[test]
fn test_eval_minimal() {
    let dir = TempDir::new().unwrap();
    fincalc(&dir)
        .args([
            "--format",
            "minimal",
            "eval",
            "roi/general",
            "-i",
            "initial_investment=1000",
            "-i",
            "final_value=1500",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("roi_percent=50\n"))
        .stdout(predicate::str::contains("profit=500\n"));
}

#[test]
fn test_eval_table_uses_formatter() {
    let dir = TempDir::new().unwrap();
    fincalc(&dir)
        .args(["eval", "roi/general", "-i", "initial_investment=$1,000", "-i", "final_value=1500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$500.00"))
        .stdout(predicate::str::contains("50.00%"));
}

#[test]
fn test_eval_json() {
    let dir = TempDir::new().unwrap();
    let output = fincalc(&dir)
        .args(["--format", "json", "eval", "tax/inheritance", "-i", "relationship=3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "accepted");
    assert_eq!(json["data"]["values"]["tax_class"], "Class B");
}

#[test]
fn test_eval_rejected() {
    let dir = TempDir::new().unwrap();
    fincalc(&dir)
        .args(["eval", "mortgage/basic", "-i", "annual_rate=45", "-i", "home_price=abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("annual_rate"))
        .stderr(predicate::str::contains("home_price"))
        .stderr(predicate::str::contains("2 input(s) rejected"));
}

#[test]
fn test_eval_payoff_not_achieved() {
    let dir = TempDir::new().unwrap();
    fincalc(&dir)
        .args([
            "eval",
            "debt/payoff",
            "-i",
            "balance=10000",
            "-i",
            "annual_rate=24",
            "-i",
            "monthly_payment=150",
            "-i",
            "extra_payment=0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Payoff not achieved"));
}

#[test]
fn test_eval_malformed_input() {
    let dir = TempDir::new().unwrap();
    fincalc(&dir)
        .args(["eval", "roi/general", "-i", "final_value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Use key=value"));
}

#[test]
fn test_config_show_uses_file() {
    let dir = TempDir::new().unwrap();
    fincalc(&dir)
        .args(["--format", "minimal", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("current_year=2025"))
        .stdout(predicate::str::contains("payoff.debt_max_years=50"));
}

#[test]
fn test_config_init() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("fincalc.toml");

    Command::cargo_bin("fincalc")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("max_iterations"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[payoff]\ndebt_max_years = 0\n").unwrap();

    Command::cargo_bin("fincalc")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("debt_max_years"));
}
