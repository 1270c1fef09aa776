//! CI job matrix generation.
//!
//! Turns the repository list into the `{"include": [...]}` document a CI
//! runner expands into one job per repository.

use serde::{Deserialize, Serialize};

use crate::core::repos::{self, Repos};
use crate::error::Result;

/// One mirroring job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    /// Destination repository name
    pub module_name: String,
    /// Source URL to mirror from
    pub url: String,
    /// `module_name` with hyphens replaced by underscores
    pub keyname: String,
}

/// Matrix document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix {
    pub include: Vec<JobDescriptor>,
}

impl Matrix {
    /// One job per repository, in name order.
    pub fn from_repos(repos: &Repos) -> Self {
        let include = repos
            .iter()
            .map(|(name, url)| JobDescriptor {
                module_name: name.to_string(),
                url: url.to_string(),
                keyname: repos::key_slug(name),
            })
            .collect();
        Self { include }
    }

    /// Serialize as a single-line JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.include.len()
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty()
    }
}
