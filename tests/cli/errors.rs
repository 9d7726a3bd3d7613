//! Configuration error handling.

use crate::support::*;

#[test]
fn test_missing_master_key() {
    let t = Test::new();
    for args in [
        vec!["encrypt", "x"],
        vec!["decrypt", "00"],
        vec!["set", "--user", "alice", "sk-abc"],
        vec!["status", "--user", "alice"],
    ] {
        let output = t.run(&args);
        assert_failure(&output);
        assert_stderr_contains(&output, "no master key configured");
        assert_stderr_contains(&output, "keyseal keygen --save");
    }
    assert!(!t.store_path().exists());
}

#[test]
fn test_short_master_key() {
    let t = Test::with_master_key(SHORT_KEY);
    let output = t.run(&["encrypt", "x"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "exactly 32 bytes, got 16");
    assert!(stdout(&output).trim().is_empty());
}

#[test]
fn test_malformed_master_key() {
    let t = Test::with_master_key("not-a-key");
    let output = t.run(&["encrypt", "x"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not valid hex");
}

#[test]
fn test_base64_master_key() {
    let t = Test::new();
    let key = stdout(&t.run(&["keygen", "--base64"])).trim().to_string();

    let t = Test::with_master_key(&key);
    assert_success(&t.set("alice", "sk-abc123"));
    assert_eq!(stdout(&t.get("alice")).trim(), "sk-abc123");
}

#[test]
fn test_malformed_config_file() {
    let t = Test::with_key();
    std::fs::create_dir_all(t.keyseal_home()).unwrap();
    std::fs::write(t.keyseal_home().join("keyseal.toml"), "[codec\n").unwrap();

    let output = t.run(&["status", "--user", "alice"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config");
}

#[test]
fn test_verbose_logs_to_stderr() {
    let t = Test::with_key();
    let output = t.run(&["--verbose", "status", "--user", "alice"]);
    assert_success(&output);
    assert_stderr_contains(&output, "DEBUG");
    assert_output_excludes(&output, MASTER_KEY_A);
}

#[test]
fn test_default_no_debug_output() {
    let t = Test::with_key();
    let output = t.run(&["status", "--user", "alice"]);
    assert_success(&output);
    let err = stderr(&output);
    assert!(!err.contains("DEBUG") && !err.contains("TRACE"));
}

#[test]
fn test_completions() {
    let t = Test::new();
    let output = t.run(&["completions", "bash"]);
    assert_success(&output);
    assert_stdout_contains(&output, "keyseal");
}

#[test]
fn test_error_exit_code_and_hint() {
    use predicates::prelude::*;

    let t = Test::new();
    t.cmd()
        .args(["get", "--user", "alice"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no master key configured"))
        .stderr(predicate::str::contains("keygen --save"));
}

#[test]
fn test_help_lists_commands() {
    use predicates::prelude::*;

    let t = Test::new();
    t.cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("encrypt")
            .and(predicate::str::contains("decrypt"))
            .and(predicate::str::contains("rotate")),
    );
}
