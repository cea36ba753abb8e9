use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("pageforge")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compress"))
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("split"));
}

#[test]
fn split_rejects_missing_input() {
    Command::cargo_bin("pageforge")
        .unwrap()
        .args(["split", "does-not-exist.pdf", "--pages", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn merge_requires_two_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("one.pdf");
    std::fs::write(&input, b"%PDF-").unwrap();

    Command::cargo_bin("pageforge")
        .unwrap()
        .args(["merge", input.to_str().unwrap()])
        .assert()
        .failure();
}
