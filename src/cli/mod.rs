//! Command-line interface.

pub mod completions;
pub mod matrix;
pub mod output;
pub mod setup;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::constants;

/// Mirrorer - provision mirror repositories and their CI credentials.
#[derive(Parser)]
#[command(
    name = "mirrorer",
    about = "Provision mirror repositories, deploy keys and CI secrets",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create missing mirrors, register deploy keys and publish secrets
    Setup(SetupArgs),

    /// Print the CI job matrix for the repository list
    Matrix {
        /// Repository list (JSON object of name -> source URL)
        #[arg(long, default_value = constants::REPOS_FILE)]
        repos: PathBuf,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options for `mirrorer setup`.
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Repository list (JSON object of name -> source URL)
    #[arg(long, default_value = constants::REPOS_FILE)]
    pub repos: PathBuf,

    /// API token with repository administration rights
    #[arg(long, env = constants::TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Organization that owns the mirrors
    #[arg(long, env = "MIRRORER_ORG", default_value = constants::ORGANIZATION)]
    pub org: String,

    /// Repository (owner/name) that receives the SSH_KEY_* secrets
    #[arg(long, env = "MIRRORER_COORDINATOR", default_value = constants::COORDINATOR)]
    pub coordinator: String,

    /// API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = constants::API_URL)]
    pub api_url: String,

    /// Title of the deploy key registered on each mirror
    #[arg(long, default_value = constants::DEPLOY_KEY_TITLE)]
    pub key_title: String,

    /// Skip repositories that already have a deploy key and a secret
    #[arg(long)]
    pub skip_provisioned: bool,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(command: Command) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Setup(args) => setup::execute(args),
        Matrix { repos, pretty } => matrix::execute(&repos, pretty),
        Completions { shell } => completions::execute(shell),
    }
}
