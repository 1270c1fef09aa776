//! Request and response bodies exchanged with the hosting service.

use serde::{Deserialize, Serialize};

/// Body of a repository creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRepo {
    pub name: String,
    pub description: String,
    pub private: bool,
    pub has_issues: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
}

impl NewRepo {
    /// A public mirror repository with issues, projects and wiki disabled.
    pub fn mirror(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: format!("Mirror of {}", name),
            private: false,
            has_issues: false,
            has_projects: false,
            has_wiki: false,
        }
    }
}

/// Body of a deploy key creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDeployKey {
    pub title: String,
    pub key: String,
    pub read_only: bool,
}

impl NewDeployKey {
    /// A deploy key with write access.
    pub fn writable(title: &str, key: &str) -> Self {
        Self {
            title: title.to_string(),
            key: key.to_string(),
            read_only: false,
        }
    }
}

/// Deploy key as listed by the hosting service.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployKey {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub read_only: bool,
}

/// Public key used to encrypt secrets for a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretsPublicKey {
    pub key_id: String,
    /// Base64-encoded X25519 public key
    pub key: String,
}

/// Body of a secret upsert request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret {
    /// Base64-encoded sealed box
    pub encrypted_value: String,
    pub key_id: String,
}
