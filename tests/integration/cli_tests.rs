//! Integration tests for the CLI binary.
//!
//! Verifies that the `aplus` binary responds to basic flags and drives a
//! full learner workflow against a temporary data directory.
//!
//! This test is registered as a [[test]] in the aplus-lms-cli crate
//! so that CARGO_BIN_EXE_aplus is available.

use std::path::Path;
use std::process::{Command, Output};

/// Get a Command pointing to the `aplus` binary.
fn aplus_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_aplus"))
}

/// Run `aplus --data-dir DIR ARGS...`.
fn aplus(dir: &Path, args: &[&str]) -> Output {
    aplus_binary()
        .arg("--data-dir")
        .arg(dir)
        .args(args)
        .output()
        .expect("failed to execute aplus")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_ok(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{what} should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

const COURSE_JSON: &str = r#"{
    "id": "rust-101",
    "title": "Intro to Rust",
    "instructor": "Edna Mode",
    "modules": [
        {
            "id": "m1",
            "title": "Basics",
            "lessons": [
                { "id": "l1", "title": "Hello" },
                { "id": "l2", "title": "Ownership" }
            ],
            "quiz": {
                "id": "qz1",
                "title": "Checkpoint",
                "maxAttempts": 2,
                "questions": [
                    { "id": "q1", "question": "1 + 1?", "options": ["1", "2"], "correctAnswer": 1 },
                    { "id": "q2", "question": "Rust?", "options": ["yes", "no"], "correctAnswer": 0 }
                ]
            }
        }
    ]
}"#;

#[test]
fn cli_responds_to_help() {
    let output = aplus_binary()
        .arg("--help")
        .output()
        .expect("failed to execute aplus --help");

    assert_ok(&output, "aplus --help");
    let out = stdout(&output);
    assert!(
        out.contains("aplus") || out.contains("Usage"),
        "aplus --help output should contain usage information, got: {out}"
    );
}

#[test]
fn cli_responds_to_version() {
    let output = aplus_binary()
        .arg("--version")
        .output()
        .expect("failed to execute aplus --version");

    assert_ok(&output, "aplus --version");
    let out = stdout(&output);
    assert!(
        out.contains("0.1") || out.contains("aplus"),
        "aplus --version should contain version info, got: {out}"
    );
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = aplus_binary()
        .arg("--nonexistent-flag")
        .output()
        .expect("failed to execute aplus");

    assert!(
        !output.status.success(),
        "aplus with unknown flag should exit with error"
    );
}

#[test]
fn cli_reports_unknown_course() {
    let tmp = tempfile::tempdir().unwrap();
    let output = aplus(tmp.path(), &["course", "show", "missing"]);

    assert_eq!(output.status.code(), Some(1));
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("missing"), "stderr should name the course: {err}");
}

#[test]
fn cli_full_learner_workflow() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("data");
    let course_file = tmp.path().join("course.json");
    std::fs::write(&course_file, COURSE_JSON).unwrap();
    let course_path = course_file.to_str().unwrap();

    assert_ok(
        &aplus(&dir, &["user", "add", "--email", "edna@x.io", "--name", "Edna Mode", "--role", "educator"]),
        "user add educator",
    );
    assert_ok(
        &aplus(&dir, &["user", "add", "--email", "ann@x.io", "--name", "Ann"]),
        "user add learner",
    );
    assert_ok(
        &aplus(&dir, &["course", "import", "--educator", "edna@x.io", course_path]),
        "course import",
    );

    let list = aplus(&dir, &["course", "list", "--search", "rust"]);
    assert_ok(&list, "course list");
    assert!(stdout(&list).contains("rust-101"));

    assert_ok(&aplus(&dir, &["enroll", "--user", "ann@x.io", "rust-101"]), "enroll");

    for lesson in ["l1", "l2"] {
        assert_ok(
            &aplus(
                &dir,
                &["lesson", "complete", "--user", "ann@x.io", "--course", "rust-101", "--module", "m1", "--lesson", lesson],
            ),
            "lesson complete",
        );
    }

    // Not eligible yet
    let early = aplus(&dir, &["certificate", "issue", "--user", "ann@x.io", "--course", "rust-101"]);
    assert_eq!(early.status.code(), Some(1));

    // Incomplete answer sheet is rejected
    let partial = aplus(
        &dir,
        &["quiz", "submit", "--user", "ann@x.io", "--course", "rust-101", "--quiz", "qz1", "--answers", "1"],
    );
    assert!(!partial.status.success());

    let submit = aplus(
        &dir,
        &["quiz", "submit", "--user", "ann@x.io", "--course", "rust-101", "--quiz", "qz1", "--answers", "1,0"],
    );
    assert_ok(&submit, "quiz submit");
    assert!(stdout(&submit).contains("100%"));

    let progress = aplus(&dir, &["progress", "--user", "ann@x.io", "--course", "rust-101"]);
    assert_ok(&progress, "progress");
    assert!(stdout(&progress).contains("100%"));

    let issue = aplus(&dir, &["certificate", "issue", "--user", "ann@x.io", "--course", "rust-101"]);
    assert_ok(&issue, "certificate issue");
    assert!(stdout(&issue).contains("Certificate issued"));

    let again = aplus(&dir, &["certificate", "issue", "--user", "ann@x.io", "--course", "rust-101"]);
    assert_ok(&again, "second certificate issue");
    assert!(stdout(&again).contains("already issued"));

    let metrics = aplus(&dir, &["metrics"]);
    assert_ok(&metrics, "metrics");
    assert!(stdout(&metrics).contains("Certificates: 1"));
}

#[test]
fn cli_enforces_attempt_limit() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("data");
    let course_file = tmp.path().join("course.json");
    std::fs::write(&course_file, COURSE_JSON).unwrap();

    assert_ok(
        &aplus(&dir, &["user", "add", "--email", "edna@x.io", "--name", "Edna", "--role", "educator"]),
        "user add",
    );
    assert_ok(
        &aplus(&dir, &["course", "import", "--educator", "edna@x.io", course_file.to_str().unwrap()]),
        "course import",
    );

    let submit_args = [
        "quiz", "submit", "--user", "bob@x.io", "--course", "rust-101", "--quiz", "qz1", "--answers", "0,1",
    ];
    assert_ok(&aplus(&dir, &submit_args), "first attempt");
    assert_ok(&aplus(&dir, &submit_args), "second attempt");

    let third = aplus(&dir, &submit_args);
    assert_eq!(third.status.code(), Some(1));
    let err = String::from_utf8_lossy(&third.stderr);
    assert!(err.contains("Attempt limit"), "stderr: {err}");

    let attempts = aplus(&dir, &["quiz", "attempts", "--user", "bob@x.io", "--quiz", "qz1"]);
    assert_ok(&attempts, "quiz attempts");
    assert!(stdout(&attempts).contains("Best score: 0%"));
}

#[test]
fn cli_metrics_as_json() {
    let tmp = tempfile::tempdir().unwrap();
    assert_ok(
        &aplus(tmp.path(), &["user", "add", "--email", "root@x.io", "--name", "Root", "--role", "admin"]),
        "user add",
    );

    let output = aplus(tmp.path(), &["--json", "metrics"]);
    assert_ok(&output, "metrics --json");
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["totalUsers"], 1);
    assert_eq!(value["admins"], 1);
    assert_eq!(value["certificationRate"], 0);
}
