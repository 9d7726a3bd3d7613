//! Tests for set, get, status, rm and list.

use crate::support::*;

#[test]
fn test_set_get_roundtrip() {
    let t = Test::with_key();
    for (user, key) in API_KEYS {
        assert_success(&t.set(user, key));
    }
    for (user, key) in API_KEYS {
        let output = t.get(user);
        assert_success(&output);
        assert_eq!(stdout(&output).trim(), *key);
    }
}

#[test]
fn test_set_reports_replacement() {
    let t = Test::with_key();
    let output = t.set("alice", "sk-one");
    assert_success(&output);
    assert_stdout_contains(&output, "saved API key for alice");

    let output = t.set("alice", "sk-two");
    assert_success(&output);
    assert_stdout_contains(&output, "replaced API key for alice");
    assert_eq!(stdout(&t.get("alice")).trim(), "sk-two");
}

#[test]
fn test_set_from_stdin() {
    let t = Test::with_key();
    let output = t
        .cmd()
        .args(["set", "--user", "alice"])
        .write_stdin("sk-piped\n")
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&t.get("alice")).trim(), "sk-piped");
}

#[test]
fn test_set_empty_stdin_rejected() {
    let t = Test::with_key();
    let output = t.run(&["set", "--user", "alice"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "API key cannot be empty");
}

#[test]
fn test_set_invalid_user() {
    let t = Test::with_key();
    let output = t.set("bad user", "sk-abc");
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid user id");
}

#[test]
fn test_store_file_holds_no_plaintext() {
    let t = Test::with_key();
    assert_success(&t.set("alice", "sk-abc123"));

    let contents = std::fs::read_to_string(t.store_path()).unwrap();
    assert!(contents.contains("alice"));
    assert!(!contents.contains("sk-abc123"));
    assert!(!contents.contains(MASTER_KEY_A));
}

#[test]
fn test_get_missing() {
    let t = Test::with_key();
    let output = t.get("nobody");
    assert_failure(&output);
    assert_stderr_contains(&output, "no API key stored for nobody");
    assert_stderr_contains(&output, "keyseal set");
}

#[test]
fn test_status_never_reveals_key() {
    let t = Test::with_key();
    assert_success(&t.set("alice", "sk-abc123"));

    let output = t.run(&["status", "--user", "alice"]);
    assert_success(&output);
    assert_stdout_contains(&output, "configured");
    assert_output_excludes(&output, "sk-abc123");

    let json = t.status_json("alice");
    assert_eq!(json["user"], "alice");
    assert_eq!(json["state"]["status"], "configured");
    assert!(json["state"]["updated_at"].is_string());
    assert!(!json.to_string().contains("sk-abc123"));
}

#[test]
fn test_status_missing() {
    let t = Test::with_key();
    let json = t.status_json("alice");
    assert_eq!(json["state"]["status"], "missing");
}

#[test]
fn test_status_corrupted_record() {
    let t = Test::with_key();
    assert_success(&t.set("alice", "sk-abc123"));

    let path = t.store_path();
    let contents = std::fs::read_to_string(&path).unwrap();
    let envelope_line = contents
        .lines()
        .find(|l| l.starts_with("envelope"))
        .unwrap()
        .to_string();
    let mut damaged = envelope_line.trim_end_matches('"').to_string();
    let last = damaged.pop().unwrap();
    damaged.push(if last == '0' { '1' } else { '0' });
    damaged.push('"');
    std::fs::write(&path, contents.replace(&envelope_line, &damaged)).unwrap();

    let json = t.status_json("alice");
    assert_eq!(json["state"]["status"], "unusable");
    assert_eq!(json["state"]["reason"], "corrupted");

    let output = t.get("alice");
    assert_failure(&output);
    assert_stderr_contains(&output, "re-enter");
    assert_output_excludes(&output, "sk-abc123");
}

#[test]
fn test_rm() {
    let t = Test::with_key();
    assert_success(&t.set("alice", "sk-abc123"));

    let output = t.rm("alice");
    assert_success(&output);
    assert_stdout_contains(&output, "removed API key for alice");
    assert_eq!(t.status_json("alice")["state"]["status"], "missing");

    let output = t.rm("alice");
    assert_success(&output);
    assert_stdout_contains(&output, "no API key stored");
}

#[test]
fn test_list() {
    let t = Test::with_key();
    let output = t.run(&["list"]);
    assert_success(&output);
    assert_stdout_contains(&output, "no API keys stored");

    assert_success(&t.set("bob", "sk-bob"));
    assert_success(&t.set("alice", "sk-alice"));

    let output = t.run(&["list", "--json"]);
    assert_success(&output);
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["count"], 2);
    assert_eq!(json["users"][0]["user"], "alice");
    assert_eq!(json["users"][1]["user"], "bob");
    assert_eq!(json["users"][0]["state"]["status"], "configured");
}

#[test]
fn test_default_user_is_os_user() {
    let t = Test::with_key();
    let output = t.run(&["set", "sk-mine"]);
    // OS usernames outside the user id alphabet are rejected, not mangled
    if output.status.success() {
        let output = t.run(&["get"]);
        assert_success(&output);
        assert_eq!(stdout(&output).trim(), "sk-mine");
    } else {
        assert_stderr_contains(&output, "invalid user id");
    }
}
