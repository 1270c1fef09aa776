//! Hosting-service operations.
//!
//! The [`Forge`] trait covers the handful of API calls provisioning needs;
//! [`GitHub`] implements it over the REST API.
//!
//! ## Adding a New Hosting Service
//!
//! 1. Implement the `Forge` trait
//! 2. Add the implementation in a new file (e.g., `gitea.rs`)
//! 3. Re-export from this module

use crate::error::Result;

mod github;
mod types;

pub use github::GitHub;
pub use types::{DeployKey, EncryptedSecret, NewDeployKey, NewRepo, SecretsPublicKey};

/// Hosting-service API.
///
/// Repositories are addressed as `owner` + `name`; secret operations take
/// the coordinator as a single `owner/repo` string.
pub trait Forge {
    /// Check whether `owner/name` exists.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::RepositoryLookup` for any status other than
    /// found / not found.
    fn repo_exists(&self, owner: &str, name: &str) -> Result<bool>;

    /// Create a repository under an organization.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::RepositoryCreation` unless the service reports
    /// the repository as created.
    fn create_repo(&self, owner: &str, repo: &NewRepo) -> Result<()>;

    /// List the deploy keys registered on `owner/name`, across all pages.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::DeployKey` if the listing fails.
    fn deploy_keys(&self, owner: &str, name: &str) -> Result<Vec<DeployKey>>;

    /// Register a deploy key on `owner/name`.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::DeployKey` unless the service reports the key as
    /// created.
    fn add_deploy_key(&self, owner: &str, name: &str, key: &NewDeployKey) -> Result<()>;

    /// Fetch the public key secrets for `repo` must be sealed with.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::SecretFetch` if the key cannot be fetched.
    fn secrets_public_key(&self, repo: &str) -> Result<SecretsPublicKey>;

    /// Check whether `repo` already holds a secret called `name`.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::SecretFetch` for any status other than
    /// found / not found.
    fn secret_exists(&self, repo: &str, name: &str) -> Result<bool>;

    /// Create or overwrite the secret `name` on `repo`.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::SecretPublish` unless the service reports the
    /// secret as created or updated.
    fn put_secret(&self, repo: &str, name: &str, secret: &EncryptedSecret) -> Result<()>;
}
