use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env("BF_CONFIG", "/nonexistent/bf.toml")
        .env_remove("BF_MAX_STEPS")
        .env_remove("BF_MEMORY_SIZE")
        .env_remove("BF_LOG");
    cmd
}

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn step_limit_from_env() {
    cargo_bin()
        .env("BF_MAX_STEPS", "4")
        .arg("+++++").arg("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step limit of 4"));
}

#[test]
fn flag_overrides_env() {
    cargo_bin()
        .env("BF_MAX_STEPS", "4")
        .arg("--max-steps").arg("5").arg("+++++").arg("")
        .assert()
        .success();
}

#[test]
fn memory_size_from_env() {
    cargo_bin()
        .env("BF_MEMORY_SIZE", "1")
        .arg(">").arg("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("out of bounds of memory array"));
}

#[test]
fn limits_from_config_file() {
    let cfg = config_file("[limits]\nmax_steps = 2\nmemory_size = 8\n");
    cargo_bin()
        .env("BF_CONFIG", cfg.path())
        .arg("+++").arg("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step limit of 2"));
}

#[test]
fn env_overrides_config_file() {
    let cfg = config_file("[limits]\nmax_steps = 2\n");
    cargo_bin()
        .env("BF_CONFIG", cfg.path())
        .env("BF_MAX_STEPS", "3")
        .arg("+++").arg("")
        .assert()
        .success();
}

#[test]
fn interactive_prompt_sets_limits() {
    cargo_bin()
        .arg("--interactive").arg("+++++").arg("")
        .write_stdin("y\n3\nn\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Want to limit").not())
        .stderr(
            predicate::str::contains("Want to limit the number of actions? y/n")
                .and(predicate::str::contains("Want to limit the memory array ? y/n"))
                .and(predicate::str::contains("step limit of 3")),
        );
}

#[test]
fn interactive_prompt_repeats_on_bad_answers() {
    cargo_bin()
        .arg("-i").arg(">>").arg("")
        .write_stdin("n\nsure\ny\nzero\n0\n2\n")
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("Please y or n")
                .and(predicate::str::contains("Please enter a non-negative number"))
                .and(predicate::str::contains("Please enter a positive number"))
                .and(predicate::str::contains("out of bounds of memory array")),
        );
}

#[test]
fn interactive_prompt_on_closed_stdin_is_invalid_arguments() {
    cargo_bin()
        .arg("-i").arg("+").arg("")
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("stdin closed"));
}
