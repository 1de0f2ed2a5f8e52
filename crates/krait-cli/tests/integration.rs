use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_demos() {
    Command::cargo_bin("krait")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("delegation bridge"))
        .stdout(predicate::str::contains("--kwargs"));
}

#[test]
fn no_flags_is_a_friendly_no_op() {
    Command::cargo_bin("krait")
        .unwrap()
        .assert()
        .success()
        .stderr(predicate::str::contains("nothing to do"));
}
