//! Tests for keygen, encrypt and decrypt.

use crate::support::*;

#[test]
fn test_keygen_prints_hex_key() {
    let t = Test::new();
    let output = t.run(&["keygen"]);
    assert_success(&output);

    let key = stdout(&output);
    let key = key.trim();
    assert_eq!(key.len(), 64);
    assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_keygen_base64() {
    let t = Test::new();
    let output = t.run(&["keygen", "--base64"]);
    assert_success(&output);
    assert!(stdout(&output).starts_with("base64:"));
}

#[test]
fn test_keygen_keys_differ() {
    let t = Test::new();
    let a = stdout(&t.run(&["keygen"]));
    let b = stdout(&t.run(&["keygen"]));
    assert_ne!(a, b);
}

#[test]
fn test_keygen_save_enables_vault() {
    let t = Test::new();
    let output = t.run(&["keygen", "--save"]);
    assert_success(&output);
    assert!(t.keyseal_home().join("keyseal.toml").exists());

    assert_success(&t.set("alice", "sk-abc123"));
    let output = t.get("alice");
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "sk-abc123");
}

#[test]
fn test_keygen_save_refuses_overwrite() {
    let t = Test::new();
    assert_success(&t.run(&["keygen", "--save"]));

    let output = t.run(&["keygen", "--save"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "--force");

    assert_success(&t.run(&["keygen", "--save", "--force"]));
}

#[test]
fn test_encrypt_decrypt_roundtrip() {
    let t = Test::with_key();
    let output = t.run(&["encrypt", "sk-abc123"]);
    assert_success(&output);

    let envelope = stdout(&output).trim().to_string();
    assert_eq!(envelope.len(), (16 + 16 + 9) * 2);
    assert!(!envelope.contains("sk-abc123"));

    let output = t.run(&["decrypt", &envelope]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim_end_matches('\n'), "sk-abc123");
}

#[test]
fn test_encrypt_reads_stdin() {
    let t = Test::with_key();
    let output = t
        .cmd()
        .arg("encrypt")
        .write_stdin("from-stdin\n")
        .output()
        .unwrap();
    assert_success(&output);

    let envelope = stdout(&output).trim().to_string();
    let output = t
        .cmd()
        .arg("decrypt")
        .write_stdin(envelope)
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).trim_end(), "from-stdin");
}

#[test]
fn test_encrypt_is_not_deterministic() {
    let t = Test::with_key();
    let a = stdout(&t.run(&["encrypt", "same"]));
    let b = stdout(&t.run(&["encrypt", "same"]));
    assert_ne!(a, b);
}

#[test]
fn test_decrypt_with_other_key_fails() {
    let t = Test::with_key();
    let envelope = stdout(&t.run(&["encrypt", "sk-abc123"])).trim().to_string();

    let other = Test::with_master_key(MASTER_KEY_B);
    let output = other.run(&["decrypt", &envelope]);
    assert_failure(&output);
    assert_stderr_contains(&output, "integrity check failed");
    assert_output_excludes(&output, "sk-abc123");
}

#[test]
fn test_decrypt_tampered_last_char() {
    let t = Test::with_key();
    let mut envelope = stdout(&t.run(&["encrypt", "sk-abc123"])).trim().to_string();
    let last = envelope.pop().unwrap();
    envelope.push(if last == 'a' { 'b' } else { 'a' });

    let output = t.run(&["decrypt", &envelope]);
    assert_failure(&output);
    assert_stderr_contains(&output, "integrity check failed");
}

#[test]
fn test_decrypt_malformed() {
    let t = Test::with_key();

    let output = t.run(&["decrypt", "not-hex"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not valid hex");

    let output = t.run(&["decrypt", "abcd"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "too short");
}

#[cfg(unix)]
#[test]
fn test_keygen_save_writes_owner_only_config() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::new();
    assert_success(&t.run(&["keygen", "--save"]));

    let path = t.keyseal_home().join("keyseal.toml");
    let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    assert!(!t.keyseal_home().join("keyseal.toml.tmp").exists());
}
