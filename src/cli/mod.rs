//! Command-line interface.

pub mod completions;
pub mod keys;
pub mod output;
pub mod rotate;
pub mod secrets;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use zeroize::Zeroizing;

use crate::core::config::Config;
use crate::error::Result;

/// Keyseal - authenticated envelope encryption for per-user API keys.
#[derive(Parser)]
#[command(
    name = "keyseal",
    about = "Authenticated envelope encryption for per-user API keys",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Keyseal home directory (default: ~/.keyseal)
    #[arg(long, global = true, env = "KEYSEAL_HOME")]
    pub home: Option<PathBuf>,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Generate a new random master key
    Keygen {
        /// Print in base64 form instead of hex
        #[arg(long)]
        base64: bool,
        /// Write the key into keyseal.toml
        #[arg(long)]
        save: bool,
        /// Overwrite a key already present in keyseal.toml
        #[arg(short, long)]
        force: bool,
    },

    /// Encrypt a string into an envelope (reads stdin if omitted)
    Encrypt {
        /// Plaintext to encrypt
        plaintext: Option<String>,
    },

    /// Decrypt an envelope (reads stdin if omitted)
    Decrypt {
        /// Hex-encoded envelope
        envelope: Option<String>,
    },

    /// Save an API key for a user
    Set {
        /// API key (prompted, or read from stdin, if omitted)
        api_key: Option<String>,
        /// User id (default: current OS user)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Print a user's decrypted API key
    Get {
        /// User id (default: current OS user)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show whether a user has a usable API key
    Status {
        /// User id (default: current OS user)
        #[arg(short, long)]
        user: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a user's API key
    Rm {
        /// User id (default: current OS user)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// List users with a stored API key
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-encrypt every stored key under a new master key
    Rotate {
        /// New master key (hex or base64:...)
        #[arg(long, env = "KEYSEAL_NEW_MASTER_KEY", hide_env_values = true)]
        new_key: String,
        /// Write the new key into keyseal.toml
        #[arg(long)]
        save: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Execute a command.
pub fn execute(command: Command, home: Option<PathBuf>) -> Result<()> {
    use Command::*;

    let home = home.as_deref();
    match command {
        Keygen {
            base64,
            save,
            force,
        } => keys::keygen(home, base64, save, force),
        Encrypt { plaintext } => keys::encrypt(&Config::load(home)?, plaintext),
        Decrypt { envelope } => keys::decrypt(&Config::load(home)?, envelope),
        Set { api_key, user } => secrets::set(&Config::load(home)?, &resolve_user(user), api_key),
        Get { user } => secrets::get(&Config::load(home)?, &resolve_user(user)),
        Status { user, json } => secrets::status(&Config::load(home)?, &resolve_user(user), json),
        Rm { user } => secrets::rm(&Config::load(home)?, &resolve_user(user)),
        List { json } => secrets::list(&Config::load(home)?, json),
        Rotate {
            new_key,
            save,
            json,
        } => rotate::execute(&Config::load(home)?, &new_key, save, json),
        Completions { shell } => completions::execute(shell),
    }
}

/// User id from the flag, or the current OS user.
fn resolve_user(user: Option<String>) -> String {
    user.unwrap_or_else(whoami::username)
}

/// Read a value from stdin, dropping one trailing newline.
pub(crate) fn read_stdin() -> Result<Zeroizing<String>> {
    let mut input = Zeroizing::new(String::new());
    io::stdin().read_to_string(&mut input)?;
    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
    Ok(input)
}

/// Use `arg` if given, otherwise stdin when piped, otherwise `prompt`.
pub(crate) fn arg_or_input<F>(arg: Option<String>, prompt: F) -> Result<Zeroizing<String>>
where
    F: FnOnce() -> Result<String>,
{
    match arg {
        Some(value) => Ok(Zeroizing::new(value)),
        None if !io::stdin().is_terminal() => read_stdin(),
        None => Ok(Zeroizing::new(prompt()?)),
    }
}
