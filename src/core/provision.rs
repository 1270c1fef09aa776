//! Mirror provisioning workflow.
//!
//! Each repository goes through a fixed sequence of stages:
//!
//! ```text
//! [inspect] -> generate -> ensure-repo -> register-key -> publish-secret -> done
//! ```
//!
//! `inspect` only runs when `skip_provisioned` is set. Entries are processed
//! one at a time and the first failing stage aborts the whole run; the
//! error names the repository and stage.

use std::fmt;

use tracing::{debug, info};

use crate::core::cipher;
use crate::core::config::Settings;
use crate::core::forge::{EncryptedSecret, Forge, NewDeployKey, NewRepo};
use crate::core::keys::Keygen;
use crate::core::repos::{self, Repos};
use crate::error::{Error, Result};

/// A step of the per-repository workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Inspect,
    Generate,
    EnsureRepo,
    RegisterKey,
    PublishSecret,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Inspect => "inspect",
            Stage::Generate => "generate key",
            Stage::EnsureRepo => "ensure repository",
            Stage::RegisterKey => "register deploy key",
            Stage::PublishSecret => "publish secret",
        })
    }
}

/// Result of provisioning one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// All stages ran.
    Provisioned {
        /// The destination repository did not exist and was created
        created_repo: bool,
        /// Fingerprint of the registered deploy key
        fingerprint: String,
    },
    /// Deploy key and secret were already present; nothing was changed.
    Skipped,
}

/// Progress notification emitted by [`Provisioner::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'e> {
    /// Work on a repository is starting.
    Started(&'e str),
    /// A repository finished with this outcome.
    Finished(&'e str, &'e Outcome),
    /// A repository failed; the run stops after this event.
    Failed(&'e str),
}

/// Outcomes of a full run, in processing order.
#[derive(Debug, Default)]
pub struct Report {
    pub outcomes: Vec<(String, Outcome)>,
}

impl Report {
    pub fn provisioned(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, Outcome::Provisioned { .. }))
            .count()
    }

    pub fn created(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, Outcome::Provisioned { created_repo: true, .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == Outcome::Skipped)
            .count()
    }
}

/// Make sure `organization/name` exists, creating a public mirror
/// repository if it doesn't.
///
/// # Returns
///
/// `true` if the repository was created.
///
/// # Errors
///
/// Returns `ForgeError::RepositoryLookup` or `ForgeError::RepositoryCreation`.
pub fn ensure_repo<F: Forge>(forge: &F, settings: &Settings, name: &str) -> Result<bool> {
    if forge.repo_exists(&settings.organization, name)? {
        debug!(repo = name, "repository already exists");
        return Ok(false);
    }

    info!(repo = name, organization = %settings.organization, "creating repository");
    forge.create_repo(&settings.organization, &NewRepo::mirror(name))?;
    Ok(true)
}

/// Register `public_key` as a writable deploy key on the mirror.
///
/// No existence check is made; a duplicate key is reported by the hosting
/// service as an error.
///
/// # Errors
///
/// Returns `ForgeError::DeployKey`.
pub fn register_deploy_key<F: Forge>(
    forge: &F,
    settings: &Settings,
    name: &str,
    public_key: &str,
) -> Result<()> {
    let key = NewDeployKey::writable(&settings.deploy_key_title, public_key);
    forge.add_deploy_key(&settings.organization, name, &key)
}

/// Seal `value` with the coordinator's current public key and store it as
/// secret `secret_name`, overwriting any previous value.
///
/// # Errors
///
/// Returns `ForgeError::SecretFetch`, `CipherError` or
/// `ForgeError::SecretPublish`.
pub fn publish_secret<F: Forge>(
    forge: &F,
    settings: &Settings,
    secret_name: &str,
    value: &str,
) -> Result<()> {
    let public_key = forge.secrets_public_key(&settings.coordinator)?;
    let encrypted_value = cipher::seal(value, &public_key.key)?;

    forge.put_secret(
        &settings.coordinator,
        secret_name,
        &EncryptedSecret {
            encrypted_value,
            key_id: public_key.key_id,
        },
    )
}

/// Whether `name` already has a deploy key titled like ours and a secret on
/// the coordinator.
///
/// # Errors
///
/// Propagates lookup failures from the hosting service.
pub fn is_provisioned<F: Forge>(forge: &F, settings: &Settings, name: &str) -> Result<bool> {
    if !forge.repo_exists(&settings.organization, name)? {
        return Ok(false);
    }

    let has_key = forge
        .deploy_keys(&settings.organization, name)?
        .iter()
        .any(|k| k.title == settings.deploy_key_title);
    if !has_key {
        return Ok(false);
    }

    forge.secret_exists(&settings.coordinator, &repos::secret_name(name))
}

/// Runs the provisioning workflow against a hosting service.
pub struct Provisioner<'a, F, K> {
    settings: &'a Settings,
    forge: &'a F,
    keygen: &'a K,
}

impl<'a, F: Forge, K: Keygen> Provisioner<'a, F, K> {
    pub fn new(settings: &'a Settings, forge: &'a F, keygen: &'a K) -> Self {
        Self {
            settings,
            forge,
            keygen,
        }
    }

    /// Provision a single repository.
    ///
    /// # Errors
    ///
    /// Returns `Error::Stage` wrapping the first failure.
    pub fn provision(&self, name: &str) -> Result<Outcome> {
        if self.settings.skip_provisioned
            && self.step(name, Stage::Inspect, || {
                is_provisioned(self.forge, self.settings, name)
            })?
        {
            info!(repo = name, "already provisioned, skipping");
            return Ok(Outcome::Skipped);
        }

        let (keys, fingerprint) = self.step(name, Stage::Generate, || {
            let keys = self.keygen.generate(&self.settings.key_comment(name))?;
            let fingerprint = keys.fingerprint()?;
            Ok((keys, fingerprint))
        })?;
        debug!(repo = name, %fingerprint, "key pair generated");

        let created_repo = self.step(name, Stage::EnsureRepo, || {
            ensure_repo(self.forge, self.settings, name)
        })?;

        self.step(name, Stage::RegisterKey, || {
            register_deploy_key(self.forge, self.settings, name, keys.public_key())
        })?;

        let secret = repos::secret_name(name);
        self.step(name, Stage::PublishSecret, || {
            publish_secret(self.forge, self.settings, &secret, keys.private_key())
        })?;

        info!(repo = name, secret = %secret, created_repo, "provisioned");
        Ok(Outcome::Provisioned {
            created_repo,
            fingerprint,
        })
    }

    /// Provision every repository in name order, stopping at the first
    /// failure.
    ///
    /// `observe` is told when each repository starts and how it ended.
    ///
    /// # Errors
    ///
    /// Returns `Error::Stage` for the first failing repository; later
    /// repositories are not touched.
    pub fn run(&self, repos: &Repos, mut observe: impl FnMut(Event<'_>)) -> Result<Report> {
        let mut report = Report::default();
        for (name, _url) in repos.iter() {
            observe(Event::Started(name));
            let outcome = match self.provision(name) {
                Ok(outcome) => outcome,
                Err(e) => {
                    observe(Event::Failed(name));
                    return Err(e);
                }
            };
            observe(Event::Finished(name, &outcome));
            report.outcomes.push((name.to_string(), outcome));
        }
        Ok(report)
    }

    fn step<T>(&self, repo: &str, stage: Stage, f: impl FnOnce() -> Result<T>) -> Result<T> {
        debug!(repo, %stage, "stage started");
        f().map_err(|e| Error::Stage {
            repo: repo.to_string(),
            stage,
            source: Box::new(e),
        })
    }
}
