//! Integration tests driving the `fern` binary against fixture scripts and
//! piped stdin.

use assert_cmd::Command;
use predicates::prelude::*;

fn fern() -> Command {
    Command::cargo_bin("fern").unwrap()
}

fn fixture(name: &str) -> String {
    format!("{}/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

// ============================================================================
// Script mode
// ============================================================================

#[test]
fn script_prints_final_value() {
    fern()
        .arg(fixture("script.fern"))
        .assert()
        .success()
        .stdout("10\n");
}

#[test]
fn script_with_closures() {
    fern()
        .arg(fixture("closures.fern"))
        .assert()
        .success()
        .stdout("15\n");
}

#[test]
fn script_println_output_suppresses_void_result() {
    fern()
        .arg(fixture("loop.fern"))
        .assert()
        .success()
        .stdout("i=0\ni=1\ni=2\n");
}

#[test]
fn missing_file_exits_one() {
    fern()
        .arg(fixture("does_not_exist.fern"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error reading file"));
}

#[test]
fn parse_errors_are_tab_prefixed_and_exit_one() {
    fern()
        .arg(fixture("syntax_error.fern"))
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("\tno prefix parse function"));
}

// ============================================================================
// Piped stdin
// ============================================================================

#[test]
fn stdin_simple_expression() {
    fern().write_stdin("1 + 2").assert().success().stdout("3\n");
}

#[test]
fn stdin_empty() {
    fern().write_stdin("").assert().success().stdout("");
}

#[test]
fn stdin_environment_persists_across_lines() {
    fern()
        .write_stdin("let x = 5\nx + 10\n")
        .assert()
        .success()
        .stdout("15\n");
}

#[test]
fn stdin_fstring() {
    fern()
        .write_stdin("f\"sum={1+2}\"\n")
        .assert()
        .success()
        .stdout("sum=3\n");
}

#[test]
fn stdin_absent_hash_key_prints_null() {
    fern()
        .write_stdin("let h = {\"k\": 7}; h[\"m\"]\n")
        .assert()
        .success()
        .stdout("null\n");
}

#[test]
fn stdin_runtime_errors_print_and_continue() {
    fern()
        .write_stdin("missing\n42\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("ERROR: [1:1] identifier not found: missing").and(
            predicate::str::contains("42"),
        ));
}

#[test]
fn stdin_parse_errors_print_and_continue() {
    fern()
        .write_stdin("let x = ;\n5\n")
        .assert()
        .success()
        .stdout("5\n")
        .stderr(predicate::str::contains("\tno prefix parse function"));
}
