//! Keyseal - authenticated envelope encryption for per-user API keys.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use keyseal::cli::output;
use keyseal::cli::{execute, Cli};
use keyseal::core::constants::LOG_ENV;
use keyseal::error::{ConfigError, Error, ErrorKind, StoreError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("keyseal=debug")
        } else {
            EnvFilter::new("keyseal=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli.command, cli.home) {
        let suggestion = match &e {
            Error::Config(ConfigError::MissingKey) => Some("run: keyseal keygen --save"),
            Error::Store(StoreError::NotFound(_)) => Some("run: keyseal set"),
            _ => match e.kind() {
                ErrorKind::Integrity | ErrorKind::Format => {
                    Some("the stored key cannot be used; re-enter it with: keyseal set")
                }
                _ => None,
            },
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
