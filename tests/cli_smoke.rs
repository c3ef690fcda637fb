#![allow(missing_docs)]
//! Surface-level CLI checks: help text, exit codes, local scanning, and the
//! JSON output contract.

mod common;

use predicates::prelude::*;

#[test]
fn help_lists_every_subcommand() {
    common::ssw()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: ssw"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("scan-device"))
        .stdout(predicate::str::contains("clean-device"))
        .stdout(predicate::str::contains("delete-device"))
        .stdout(predicate::str::contains("snapshot"))
        .stdout(predicate::str::contains("config-path"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_prints_the_package_version() {
    common::ssw()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn bare_invocation_shows_help_and_fails() {
    common::ssw().assert().failure().code(2);
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    common::ssw().arg("frobnicate").assert().failure().code(2);
}

#[test]
fn config_path_echoes_the_override() {
    common::ssw()
        .args(["--config", "/tmp/custom-sweeper.toml", "config-path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom-sweeper.toml"));
}

#[test]
fn config_path_reports_a_default_location() {
    common::ssw()
        .arg("config-path")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn missing_explicit_config_is_a_runtime_error() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("nope.toml");
    common::ssw()
        .args(["--config", gone.to_str().unwrap(), "scan", "/tmp"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("SSW-1002"));
}

#[test]
fn local_scan_reports_files_over_the_floor() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::write_default_config(dir.path());
    let target = dir.path().join("data");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("big.mp4"), vec![0u8; 500_000]).unwrap();
    std::fs::write(target.join("small.txt"), b"tiny").unwrap();

    common::ssw()
        .args([
            "--config",
            config.to_str().unwrap(),
            "scan",
            target.to_str().unwrap(),
            "--min-size",
            "100K",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Top 1 files:"))
        .stdout(predicate::str::contains("big.mp4"))
        .stdout(predicate::str::contains("small.txt").not());
}

#[test]
fn local_scan_with_no_matches_says_so() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::write_default_config(dir.path());
    let target = dir.path().join("empty");
    std::fs::create_dir(&target).unwrap();

    common::ssw()
        .args([
            "--config",
            config.to_str().unwrap(),
            "scan",
            target.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No files found matching criteria."));
}

#[test]
fn local_scan_json_mode_emits_one_parseable_object() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::write_default_config(dir.path());
    let target = dir.path().join("data");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("clip.mkv"), vec![0u8; 250_000]).unwrap();

    let output = common::ssw()
        .args([
            "--config",
            config.to_str().unwrap(),
            "--json",
            "scan",
            target.to_str().unwrap(),
            "--min-size",
            "100K",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let payload: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(payload["command"], "scan");
    assert_eq!(payload["total_matches"], 1);
    assert!(
        payload["candidates"][0]["path"]
            .as_str()
            .unwrap()
            .ends_with("clip.mkv")
    );
}

#[test]
fn local_scan_exports_the_full_report_to_a_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::write_default_config(dir.path());
    let target = dir.path().join("data");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("a.iso"), vec![0u8; 400_000]).unwrap();
    std::fs::write(target.join("b.iso"), vec![0u8; 300_000]).unwrap();
    let report = dir.path().join("report.json");

    common::ssw()
        .args([
            "--config",
            config.to_str().unwrap(),
            "scan",
            target.to_str().unwrap(),
            "--min-size",
            "100K",
            "--top",
            "1",
            "--json-file",
            report.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Top 1 files:"));

    // The export carries the whole filtered set, not just the shown slice.
    let body: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(report).unwrap()).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[test]
fn invalid_size_values_are_user_errors() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::write_default_config(dir.path());

    common::ssw()
        .args([
            "--config",
            config.to_str().unwrap(),
            "scan",
            "/tmp",
            "--min-size",
            "lots",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid size value"));
}

#[test]
fn completions_generate_for_bash() {
    common::ssw()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ssw"));
}
