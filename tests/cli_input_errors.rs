use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn missing_report_exits_with_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.txt");

    let mut cmd = Command::cargo_bin("amass-mapper").unwrap();
    cmd.arg("list").arg(&missing);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("not found"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn directory_as_report_is_unreadable() {
    let dir = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("amass-mapper").unwrap();
    cmd.arg("query").arg("stats").arg(dir.path());
    cmd.assert().code(1).stderr(predicate::str::contains("Error while reading file"));
}

#[test]
fn report_without_relations_is_not_an_error() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("empty.txt");
    fs::write(&report, "# nothing here\n\nrandom noise\n").unwrap();

    let mut cmd = Command::cargo_bin("amass-mapper").unwrap();
    cmd.arg("list").arg(&report);
    cmd.assert().success().stdout(predicate::str::contains("No domains found in the file"));

    let mut cmd = Command::cargo_bin("amass-mapper").unwrap();
    cmd.arg("map").arg(&report).arg("--renderer").arg("dot");
    cmd.assert().success().stdout(predicate::str::contains("No domains found in the file"));
    assert!(!dir.path().join("domain_map_.dot").exists());
}

#[test]
fn export_to_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("amass.txt");
    fs::write(&report, "corp.com (FQDN) --> node --> www.corp.com (FQDN)\n").unwrap();

    let mut cmd = Command::cargo_bin("amass-mapper").unwrap();
    cmd.arg("-q")
        .arg("list")
        .arg(&report)
        .arg("--export-clean")
        .arg(dir.path().join("missing").join("out.txt"));
    cmd.assert().code(1).stderr(predicate::str::contains("Export to"));
}
