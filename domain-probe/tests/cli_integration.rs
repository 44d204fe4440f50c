// domain-probe/tests/cli_integration.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::NamedTempFile;

/// Helper to create a test CSV file
fn create_csv_file(content: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Failed to create temp file");
    fs::write(file.path(), content).expect("Failed to write to temp file");
    file
}

#[test]
fn test_help_shows_flags() {
    let mut cmd = Command::cargo_bin("domain-probe").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--concurrency"))
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("--delay-ms"))
        .stdout(predicate::str::contains("--limit"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_missing_file_argument_fails() {
    let mut cmd = Command::cargo_bin("domain-probe").unwrap();
    cmd.env_remove("DP_FILE");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("input CSV file"));
}

#[test]
fn test_nonexistent_file_fails() {
    let mut cmd = Command::cargo_bin("domain-probe").unwrap();
    cmd.arg("/nonexistent/domains.csv");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("File error"));
}

#[test]
fn test_malformed_csv_fails() {
    // Second data row has an inconsistent field count
    let file = create_csv_file("domain,category\nexample.com,tech\nexample.org,news,extra\n");

    let mut cmd = Command::cargo_bin("domain-probe").unwrap();
    cmd.arg(file.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("parse error"));
}

#[test]
fn test_header_only_file_prints_empty_summary() {
    let file = create_csv_file("domain,category\n");

    let mut cmd = Command::cargo_bin("domain-probe").unwrap();
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Total domains checked: 0"))
        .stdout(predicate::str::contains("Successful: 0"))
        .stdout(predicate::str::contains("Failed: 0"));
}

#[test]
fn test_unprobeable_domain_counts_as_failed() {
    // A name with spaces fails at request construction, so this runs offline
    let file = create_csv_file("domain,category\nbad host,tech\n");

    let mut cmd = Command::cargo_bin("domain-probe").unwrap();
    cmd.args([file.path().to_str().unwrap(), "--timeout", "3s"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Error:"))
        .stdout(predicate::str::contains("Total domains checked: 1"))
        .stdout(predicate::str::contains("Failed: 1"))
        .stdout(predicate::str::contains("tech: Total=1, Success=0, Failed=1"));
}

#[test]
fn test_limit_flag_caps_batch() {
    let file = create_csv_file("domain,category\nbad one,tech\nbad two,tech\nbad three,tech\n");

    let mut cmd = Command::cargo_bin("domain-probe").unwrap();
    cmd.args([
        file.path().to_str().unwrap(),
        "--limit",
        "2",
        "--timeout",
        "3s",
        "--delay-ms",
        "0",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Total domains checked: 2"));
}

#[test]
fn test_json_output_mode() {
    let file = create_csv_file("domain,category\nbad host,tech\n");

    let mut cmd = Command::cargo_bin("domain-probe").unwrap();
    cmd.args([file.path().to_str().unwrap(), "--json", "--timeout", "3s"]);

    let output = cmd.assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();

    let document: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(document["summary"]["total"], 1);
    assert_eq!(document["summary"]["failed"], 1);
    assert_eq!(document["results"][0]["domain"]["name"], "bad host");
}

#[test]
fn test_invalid_concurrency_rejected() {
    let file = create_csv_file("domain,category\n");

    let mut cmd = Command::cargo_bin("domain-probe").unwrap();
    cmd.args([file.path().to_str().unwrap(), "--concurrency", "0"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Concurrency must be between"));
}

#[test]
fn test_invalid_timeout_rejected() {
    let file = create_csv_file("domain,category\n");

    let mut cmd = Command::cargo_bin("domain-probe").unwrap();
    cmd.args([file.path().to_str().unwrap(), "--timeout", "soon"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timeout"));
}

#[test]
fn test_dp_file_env_var_supplies_input() {
    let file = create_csv_file("domain,category\n");

    let mut cmd = Command::cargo_bin("domain-probe").unwrap();
    cmd.env("DP_FILE", file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Total domains checked: 0"));
}

#[test]
fn test_config_file_flag() {
    let csv = create_csv_file("domain,category\n");
    let config = NamedTempFile::new().unwrap();
    fs::write(config.path(), "[defaults]\nconcurrency = 5\ndelay_ms = 0\n").unwrap();

    let mut cmd = Command::cargo_bin("domain-probe").unwrap();
    cmd.args([
        csv.path().to_str().unwrap(),
        "--config",
        config.path().to_str().unwrap(),
    ]);

    cmd.assert().success();
}

#[test]
fn test_bad_config_file_fails() {
    let csv = create_csv_file("domain,category\n");
    let config = NamedTempFile::new().unwrap();
    fs::write(config.path(), "[defaults]\nconcurrency = 0\n").unwrap();

    let mut cmd = Command::cargo_bin("domain-probe").unwrap();
    cmd.args([
        csv.path().to_str().unwrap(),
        "--config",
        config.path().to_str().unwrap(),
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}
