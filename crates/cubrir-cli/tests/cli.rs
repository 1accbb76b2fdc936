//! Binary-level smoke tests

use assert_cmd::Command;
use predicates::prelude::*;

fn cubridor() -> Command {
    Command::cargo_bin("cubridor").unwrap()
}

#[test]
fn help_lists_subcommands() {
    cubridor()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn malformed_test_args_fail_before_running_anything() {
    cubridor()
        .args(["check", "--test-args", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("{not json"));
}

#[test]
fn history_outside_a_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    cubridor()
        .args(["history"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
