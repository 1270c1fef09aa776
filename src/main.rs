//! Mirrorer - provision mirror repositories and their CI credentials.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mirrorer::cli::output;
use mirrorer::cli::{execute, Cli};
use mirrorer::core::constants;
use mirrorer::error::{ConfigError, Error, KeygenError};

fn main() {
    // Values in .env feed the env-backed CLI options
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("mirrorer=debug")
        } else {
            EnvFilter::new("mirrorer=warn")
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

    if let Err(e) = execute(cli.command) {
        // Format error with suggestion if available
        let suggestion = match e.root() {
            Error::Config(ConfigError::MissingToken) => {
                Some("export GITHUB_TOKEN=<token> or add it to .env")
            }
            Error::Config(ConfigError::NotFound(_)) => {
                Some("create repos.json mapping repository names to source URLs, or pass --repos")
            }
            Error::Keygen(KeygenError::ToolMissing(_)) => Some("install OpenSSH to get ssh-keygen"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
