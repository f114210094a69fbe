use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env("BF_CONFIG", "/nonexistent/bf.toml")
        .env_remove("BF_MAX_STEPS")
        .env_remove("BF_MEMORY_SIZE")
        .env_remove("BF_LOG");
    cmd
}

#[test]
fn invalid_character_reports_position() {
    cargo_bin()
        .timeout(Duration::from_secs(2)).arg("+a+").arg("")
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("Invalid program")
                .and(predicate::str::contains("invalid character 'a' at instruction 1"))
                .and(predicate::str::contains("  +a+\n   ^")),
        );
}

#[test]
fn unmatched_bracket_is_invalid_program() {
    cargo_bin()
        .timeout(Duration::from_secs(2)).arg("+.]").arg("")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Invalid program").and(predicate::str::contains("unmatched bracket ']'")));
}

#[test]
fn newline_in_program_is_shown_escaped() {
    cargo_bin()
        .arg("+\n+").arg("")
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("invalid character '\\n' at instruction 1")
                .and(predicate::str::contains("  +·+\n   ^")),
        );
}

#[test]
fn oversized_memory_is_allocation_error() {
    cargo_bin()
        .arg("--memory").arg(usize::MAX.to_string()).arg("+").arg("")
        .assert()
        .code(1)
        .stdout("")
        .stderr(
            predicate::str::contains("Allocation error")
                .and(predicate::str::contains("cannot allocate a tape")),
        );
}

#[test]
fn moving_left_of_cell_zero() {
    cargo_bin()
        .arg("<").arg("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Memory bounds error").and(predicate::str::contains("jump on a negative index")));
}

#[test]
fn moving_past_last_cell() {
    cargo_bin()
        .arg("--memory").arg("2").arg(">>").arg("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("out of bounds of memory array"));
}

#[test]
fn reading_empty_input_is_input_exhausted() {
    cargo_bin()
        .arg(",").arg("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input exhausted"));
}

#[test]
fn step_limit_aborts_run() {
    cargo_bin()
        .arg("--max-steps").arg("3").arg("+++++").arg("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Action limit exceeded").and(predicate::str::contains("step limit of 3")));
}

#[test]
fn step_limit_stops_infinite_loop() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .arg("--max-steps").arg("50").arg("+[]").arg("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step limit of 50"))
        .stdout(predicate::str::contains("limit").not());
}

#[test]
fn missing_program_is_invalid_arguments() {
    cargo_bin()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid arguments: Program is missing"));
}

#[test]
fn missing_input_is_invalid_arguments() {
    cargo_bin()
        .arg("+.")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid arguments: Input is missing"));
}

#[test]
fn zero_memory_is_invalid_arguments() {
    cargo_bin()
        .arg("--memory").arg("0").arg("+").arg("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("memory size must be at least 1"));
}

#[test]
fn non_numeric_limit_is_rejected_by_parser() {
    cargo_bin()
        .arg("--max-steps").arg("many").arg("+").arg("")
        .assert()
        .code(2);
}
