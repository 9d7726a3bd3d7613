//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a keyseal command with an isolated environment.
    ///
    /// - HOME set to the temporary home directory
    /// - KEYSEAL_MASTER_KEY set only if the test configured one
    /// - NO_COLOR so output can be matched literally
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("keyseal").expect("failed to find keyseal binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("KEYSEAL_HOME");
        cmd.env_remove("KEYSEAL_LOG");
        cmd.env_remove("KEYSEAL_NEW_MASTER_KEY");
        match &self.master_key {
            Some(key) => cmd.env("KEYSEAL_MASTER_KEY", key),
            None => cmd.env_remove("KEYSEAL_MASTER_KEY"),
        };
        cmd
    }

    /// Run keyseal with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run keyseal")
    }

    /// Shortcut for `keyseal set --user <user> <key>`.
    pub fn set(&self, user: &str, api_key: &str) -> Output {
        self.run(&["set", "--user", user, api_key])
    }

    /// Shortcut for `keyseal get --user <user>`.
    pub fn get(&self, user: &str) -> Output {
        self.run(&["get", "--user", user])
    }

    /// Shortcut for `keyseal status --user <user> --json`, parsed.
    pub fn status_json(&self, user: &str) -> serde_json::Value {
        let output = self.run(&["status", "--user", user, "--json"]);
        assert!(
            output.status.success(),
            "status failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("status output is not JSON")
    }

    /// Shortcut for `keyseal rm --user <user>`.
    pub fn rm(&self, user: &str) -> Output {
        self.run(&["rm", "--user", user])
    }
}
