use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn walnut_runs_quickstart_demo() {
    let mut cmd = Command::cargo_bin("walnut").expect("binary exists");
    cmd.arg("run").arg("demos/quickstart.wal");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(55 120 15)"));
}

#[test]
fn walnut_eval_snippet() {
    let mut cmd = Command::cargo_bin("walnut").expect("binary exists");
    cmd.arg("eval").arg("(+ 1 2 3)");
    cmd.assert().success().stdout(predicate::str::diff("6\n"));
}

#[test]
fn walnut_eval_reports_diagnostics() {
    let mut cmd = Command::cargo_bin("walnut").expect("binary exists");
    cmd.arg("eval").arg("(undefined_name 1)");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("UnboundSymbolError"))
        .stderr(predicate::str::contains("undefined_name"));
}

#[test]
fn walnut_run_script_from_temp_dir() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("script.wal");
    fs::write(
        &script,
        "; square a number\n(def! square (fn* (x) (* x x)))\n(square 12)\n",
    )
    .expect("write script");

    let mut cmd = Command::cargo_bin("walnut").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert().success().stdout(predicate::str::diff("144\n"));
}

#[test]
fn walnut_run_reports_parse_position() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("broken.wal");
    fs::write(&script, "(def! a 1)\n(+ a").expect("write script");

    let mut cmd = Command::cargo_bin("walnut").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("ParseError"))
        .stderr(predicate::str::contains("(2:4)"));
}

#[test]
fn walnut_run_missing_file_fails() {
    let mut cmd = Command::cargo_bin("walnut").expect("binary exists");
    cmd.arg("run").arg("demos/does-not-exist.wal");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn walnut_repl_keeps_going_after_errors() {
    let mut cmd = Command::cargo_bin("walnut").expect("binary exists");
    cmd.arg("repl").write_stdin("(undefined_x 1)\n(+ 1 2)\n(1 2\n(* 2 3)\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("3\n6\n"))
        .stderr(predicate::str::contains("UnboundSymbolError"))
        .stderr(predicate::str::contains("undefined_x"))
        .stderr(predicate::str::contains("ParseError"));
}

#[test]
fn walnut_repl_stops_at_quit_command() {
    let mut cmd = Command::cargo_bin("walnut").expect("binary exists");
    cmd.arg("repl").write_stdin("(+ 1 2)\n:quit\n(* 2 3)\n");
    cmd.assert().success().stdout(predicate::str::diff("3\n"));
}

#[test]
fn walnut_repl_accepts_prompt_and_saves_history() {
    let dir = tempdir().expect("create temp dir");
    let history = dir.path().join("history.txt");

    let mut cmd = Command::cargo_bin("walnut").expect("binary exists");
    cmd.arg("--prompt")
        .arg("walnut> ")
        .arg("--history")
        .arg(&history)
        .arg("repl")
        .write_stdin("(def! x 40)\n(+ x 2)\n");
    cmd.assert().success().stdout(predicate::str::contains("42"));

    let saved = fs::read_to_string(&history).expect("history file written");
    assert!(saved.contains("(+ x 2)"));
}
