//! Run configuration.
//!
//! [`Settings`] is built once at startup and passed by reference to every
//! component that talks to the hosting service.

use std::fmt;

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::constants;
use crate::core::validation;
use crate::error::{ConfigError, Result};

/// API token. Zeroed on drop and redacted from `Debug`.
#[derive(Clone)]
pub struct Token(Zeroizing<String>);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// The raw token, for building the authorization header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Settings for a provisioning run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API token used for every request
    pub token: Token,
    /// API base URL without trailing slash
    pub api_url: String,
    /// Organization owning the mirror repositories
    pub organization: String,
    /// `owner/repo` holding the per-repository secrets
    pub coordinator: String,
    /// Title of the deploy key registered on each mirror
    pub deploy_key_title: String,
    /// Skip entries that already have a deploy key and a secret
    pub skip_provisioned: bool,
}

impl Settings {
    /// Create settings with default organization, coordinator and API URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingToken` if `token` is absent or blank.
    pub fn new(token: Option<String>) -> Result<Self> {
        let token = match token {
            Some(t) if !t.trim().is_empty() => Token::new(t.trim()),
            _ => return Err(ConfigError::MissingToken.into()),
        };

        Ok(Self {
            token,
            api_url: constants::API_URL.to_string(),
            organization: constants::ORGANIZATION.to_string(),
            coordinator: constants::COORDINATOR.to_string(),
            deploy_key_title: constants::DEPLOY_KEY_TITLE.to_string(),
            skip_provisioned: false,
        })
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    pub fn with_coordinator(mut self, coordinator: impl Into<String>) -> Self {
        self.coordinator = coordinator.into();
        self
    }

    pub fn with_deploy_key_title(mut self, title: impl Into<String>) -> Self {
        self.deploy_key_title = title.into();
        self
    }

    pub fn with_skip_provisioned(mut self, skip: bool) -> Self {
        self.skip_provisioned = skip;
        self
    }

    /// Comment embedded in a generated public key.
    pub fn key_comment(&self, repo: &str) -> String {
        format!("deploy-key-{}@{}", repo, self.organization)
    }

    /// Validate the settings.
    ///
    /// Checks:
    /// - API URL is http(s)
    /// - Organization is non-empty
    /// - Coordinator is `owner/repo`
    /// - Deploy key title is non-empty
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on the first failed check.
    pub fn validate(&self) -> Result<()> {
        debug!(
            api_url = %self.api_url,
            organization = %self.organization,
            coordinator = %self.coordinator,
            "validating settings"
        );

        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                field: "api-url",
                reason: format!("expected an http(s) URL, got '{}'", self.api_url),
            }
            .into());
        }

        if self.organization.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "org",
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        validation::validate_coordinate("coordinator", &self.coordinator)?;

        if self.deploy_key_title.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "key-title",
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
