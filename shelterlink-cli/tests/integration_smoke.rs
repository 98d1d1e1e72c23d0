//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_top_level_help_lists_commands() {
    let mut cmd = Command::cargo_bin("shelterlink").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("shelterlink").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--bind"))
        .stdout(predicate::str::contains("--pages-dir"))
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_migrate_help() {
    let mut cmd = Command::cargo_bin("shelterlink").unwrap();
    cmd.arg("migrate").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--max-connections"));
}

#[test]
fn test_invalid_bind_address_fails() {
    let mut cmd = Command::cargo_bin("shelterlink").unwrap();
    cmd.args(["serve", "--bind", "not-an-address"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("shelterlink").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
