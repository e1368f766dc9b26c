//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PROBLEM: &str = r#"
[problem]
id = "abc"
display_name = "Letters"
question_text = "Sort the letters"
items = ["A", "B", "C"]
max_attempts = 2
weight = 2.0
"#;

/// A `sortable` command isolated in `dir`, with no user config in reach.
fn sortable(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("sortable").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("SORTABLE_GRADE_URL")
        .env_remove("SORTABLE_GRADE_TOKEN");
    cmd
}

fn imported() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("abc.toml"), PROBLEM).unwrap();
    sortable(dir.path())
        .args(["import", "--problem", "abc.toml", "--state-dir", "state"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported abc (3 items)"));
    dir
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    sortable(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created sortable.toml"))
        .stdout(predicate::str::contains("Created problems/example.toml"));

    assert!(dir.path().join("sortable.toml").exists());
    assert!(dir.path().join("problems/example.toml").exists());

    sortable(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_example_problem() {
    let dir = TempDir::new().unwrap();
    sortable(dir.path()).arg("init").assert().success();

    sortable(dir.path())
        .args(["validate", "--problem", "problems/example.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("countries (5 items)"))
        .stdout(predicate::str::contains("All problems valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("dupes.toml"),
        "[problem]\nid = \"dupes\"\nitems = [\"a\", \"a\"]\n",
    )
    .unwrap();

    sortable(dir.path())
        .args(["validate", "--problem", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate item: a"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    sortable(dir.path())
        .args(["validate", "--problem", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn submit_then_show() {
    let dir = imported();

    sortable(dir.path())
        .args([
            "submit",
            "--problem-id",
            "abc",
            "--learner",
            "alice",
            "--order",
            "A, C, B",
            "--state-dir",
            "state",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Incorrect (0.6666666666666666/2.0)"))
        .stdout(predicate::str::contains("1 remaining"));

    sortable(dir.path())
        .args([
            "show",
            "--problem-id",
            "abc",
            "--learner",
            "alice",
            "--json",
            "--state-dir",
            "state",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"attempts\": 1"))
        .stdout(predicate::str::contains("\"error_indicator\": true"));

    sortable(dir.path())
        .args([
            "show",
            "--problem-id",
            "abc",
            "--learner",
            "alice",
            "--state-dir",
            "state",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Letters"))
        .stdout(predicate::str::contains("incorrect"))
        .stdout(predicate::str::contains("Attempts: 1/2"));
}

#[test]
fn submit_json_feedback() {
    let dir = imported();

    sortable(dir.path())
        .args([
            "submit",
            "--problem-id",
            "abc",
            "--learner",
            "bob",
            "--order",
            "A,B,C",
            "--json",
            "--state-dir",
            "state",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"correct\": true"))
        .stdout(predicate::str::contains("\"grade\": 2.0"))
        .stdout(predicate::str::contains("\"state\""));
}

#[test]
fn attempts_run_out() {
    let dir = imported();
    let submit = |order: &str| {
        sortable(dir.path())
            .args([
                "submit",
                "--problem-id",
                "abc",
                "--learner",
                "carol",
                "--order",
                order,
                "--state-dir",
                "state",
            ])
            .assert()
    };

    submit("C,B,A").success();
    submit("B,A,C").success().stdout(predicate::str::contains("0 remaining"));
    submit("A,B,C")
        .failure()
        .stderr(predicate::str::contains("Max number of attempts reached"))
        .stderr(predicate::str::contains("status 409"));
}

#[test]
fn malformed_submission_fails() {
    let dir = imported();

    sortable(dir.path())
        .args([
            "submit",
            "--problem-id",
            "abc",
            "--learner",
            "dave",
            "--order",
            "A,B",
            "--state-dir",
            "state",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed submission"));
}

#[test]
fn edit_changes_items() {
    let dir = imported();

    sortable(dir.path())
        .args([
            "edit",
            "--problem-id",
            "abc",
            "--items",
            "X,Y",
            "--max-attempts",
            "0",
            "--state-dir",
            "state",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated abc"));

    sortable(dir.path())
        .args([
            "submit",
            "--problem-id",
            "abc",
            "--learner",
            "erin",
            "--order",
            "X,Y",
            "--state-dir",
            "state",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Correct (2.0/2.0)"));
}

#[test]
fn edit_rejects_negative_weight() {
    let dir = imported();

    sortable(dir.path())
        .args([
            "edit",
            "--problem-id",
            "abc",
            "--weight=-1",
            "--state-dir",
            "state",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("weight"));
}

#[test]
fn import_rejects_ungradable_problems() {
    let dir = TempDir::new().unwrap();
    for (file, body) in [
        ("negative.toml", "weight = -3.0\nitems = [\"A\", \"B\"]"),
        ("nan.toml", "weight = nan\nitems = [\"A\", \"B\"]"),
        ("empty.toml", "items = []"),
    ] {
        std::fs::write(
            dir.path().join(file),
            format!("[problem]\nid = \"bad\"\n{body}\n"),
        )
        .unwrap();

        sortable(dir.path())
            .args(["import", "--problem", file, "--state-dir", "state"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid problem"));
    }
    assert!(!dir.path().join("state/problems/bad.json").exists());

    // Nothing was stored, so the learner gets the default problem.
    sortable(dir.path())
        .args([
            "submit",
            "--problem-id",
            "bad",
            "--learner",
            "alice",
            "--order",
            "A,B",
            "--state-dir",
            "state",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed submission"));
}
