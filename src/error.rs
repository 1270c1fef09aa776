//! Error types.
//!
//! Each concern has its own enum; [`Error`] wraps them so every fallible
//! function in the crate can return the shared [`Result`] alias.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::provision::Stage;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Keygen(#[from] KeygenError),

    #[error(transparent)]
    Forge(#[from] ForgeError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// A provisioning stage failed for one repository.
    #[error("{repo}: {stage} failed: {source}")]
    Stage {
        repo: String,
        stage: Stage,
        #[source]
        source: Box<Error>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("repository list not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read repository list: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("invalid repository list: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("invalid repository name '{name}': {reason}")]
    InvalidRepoName { name: String, reason: String },

    #[error("no API token: set GITHUB_TOKEN or pass --token")]
    MissingToken,

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Key pair generation errors.
#[derive(Error, Debug)]
pub enum KeygenError {
    #[error("{0} not found on PATH")]
    ToolMissing(String),

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("failed to read generated key: {0}")]
    ReadKey(#[source] std::io::Error),

    #[error("failed to create working directory: {0}")]
    Workdir(#[source] std::io::Error),

    #[error("malformed public key: {0}")]
    MalformedPublicKey(String),
}

/// Hosting-service API errors.
///
/// Status-bearing variants keep the response body so the operator can see
/// what the service rejected.
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("repository lookup for {repo} returned {status}: {body}")]
    RepositoryLookup {
        repo: String,
        status: u16,
        body: String,
    },

    #[error("failed to create repository {repo} ({status}): {body}")]
    RepositoryCreation {
        repo: String,
        status: u16,
        body: String,
    },

    #[error("failed to add deploy key to {repo} ({status}): {body}")]
    DeployKey {
        repo: String,
        status: u16,
        body: String,
    },

    #[error("failed to fetch secrets public key for {repo} ({status}): {body}")]
    SecretFetch {
        repo: String,
        status: u16,
        body: String,
    },

    #[error("failed to publish secret {name} to {repo} ({status}): {body}")]
    SecretPublish {
        repo: String,
        name: String,
        status: u16,
        body: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Sealed-box encryption errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Innermost error, unwrapping stage context.
    pub fn root(&self) -> &Error {
        match self {
            Error::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}
