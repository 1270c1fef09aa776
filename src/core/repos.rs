//! Repository list loading.
//!
//! The list is a JSON object mapping destination repository names to the
//! source URLs they mirror:
//!
//! ```json
//! { "dune-common": "https://gitlab.dune-project.org/core/dune-common.git" }
//! ```
//!
//! Entries are kept in a `BTreeMap`, so every consumer sees them sorted by
//! repository name regardless of their order in the file.
//!
//! Loading only checks the document's shape. Names are checked against
//! hosting-service and secret naming rules by [`Repos::validate`], which
//! only the provisioning path needs.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::core::constants;
use crate::core::types::{RepoName, SecretName, SourceUrl};
use crate::core::validation;
use crate::error::{ConfigError, Result};

/// Immutable repository list for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repos {
    entries: BTreeMap<RepoName, SourceUrl>,
}

impl Repos {
    /// Load the repository list from `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist or
    /// `ConfigError::Parse` if it is not a JSON object of strings.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading repository list");

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let repos = Self::from_json(&contents)?;

        debug!(repos = repos.len(), "repository list loaded");
        Ok(repos)
    }

    /// Parse a repository list from JSON text.
    pub fn from_json(contents: &str) -> Result<Self> {
        let entries: BTreeMap<RepoName, SourceUrl> =
            serde_json::from_str(contents).map_err(ConfigError::Parse)?;
        Ok(Self { entries })
    }

    /// Build a list from name/URL pairs.
    pub fn from_pairs<I, N, U>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, U)>,
        N: Into<RepoName>,
        U: Into<SourceUrl>,
    {
        let entries = pairs
            .into_iter()
            .map(|(n, u)| (n.into(), u.into()))
            .collect();
        Self { entries }
    }

    /// Check every repository name and the secret name derived from it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRepoName` for the first name that can't
    /// be created on the hosting service or doesn't yield a valid secret name.
    pub fn validate(&self) -> Result<()> {
        for name in self.entries.keys() {
            validation::validate_repo_name(name)?;
            validation::validate_secret_name(name, &secret_name(name))?;
        }
        Ok(())
    }

    /// Iterate `(name, url)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, u)| (n.as_str(), u.as_str()))
    }

    /// Source URL for a repository.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Repository name with every hyphen replaced by an underscore.
///
/// Used as the `keyname` in the job matrix and as the suffix of the
/// secret name.
pub fn key_slug(name: &str) -> String {
    name.replace('-', "_")
}

/// Name of the coordinator secret holding a repository's private key.
///
/// `my-repo` becomes `SSH_KEY_my_repo`.
pub fn secret_name(name: &str) -> SecretName {
    format!("{}{}", constants::SECRET_PREFIX, key_slug(name))
}
