//! Deploy key generation.
//!
//! Key pairs are produced by `ssh-keygen` inside a throwaway directory that
//! is removed before [`Keygen::generate`] returns, whether it succeeds or
//! fails. The private half only ever lives in memory afterwards.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use sha2::{Digest, Sha256};
use tempfile::TempDir;
use tracing::{debug, trace, warn};
use zeroize::Zeroizing;

use crate::core::constants;
use crate::core::types::PublicKey;
use crate::error::{KeygenError, Result};

/// A freshly generated deploy key pair.
pub struct KeyPair {
    private: Zeroizing<String>,
    public: PublicKey,
}

impl KeyPair {
    pub fn new(private: impl Into<String>, public: impl Into<String>) -> Self {
        Self {
            private: Zeroizing::new(private.into()),
            public: public.into().trim_end().to_string(),
        }
    }

    /// OpenSSH private key text.
    pub fn private_key(&self) -> &str {
        self.private.as_str()
    }

    /// Single-line authorized_keys entry.
    pub fn public_key(&self) -> &str {
        &self.public
    }

    /// OpenSSH-style `SHA256:` fingerprint of the public key.
    ///
    /// # Errors
    ///
    /// Returns `KeygenError::MalformedPublicKey` if the public key is not a
    /// `<type> <base64> [comment]` line.
    pub fn fingerprint(&self) -> Result<String> {
        let blob = self
            .public
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| KeygenError::MalformedPublicKey("missing key data".to_string()))?;
        let bytes = STANDARD
            .decode(blob)
            .map_err(|e| KeygenError::MalformedPublicKey(e.to_string()))?;
        let digest = Sha256::digest(&bytes);
        Ok(format!("SHA256:{}", STANDARD_NO_PAD.encode(digest)))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private", &"***")
            .field("public", &self.public)
            .finish()
    }
}

/// Source of deploy key pairs.
pub trait Keygen {
    /// Generate a new key pair.
    ///
    /// # Arguments
    ///
    /// * `comment` - Label embedded in the public key for traceability
    ///
    /// # Errors
    ///
    /// Returns `KeygenError` if generation fails.
    fn generate(&self, comment: &str) -> Result<KeyPair>;
}

/// Generates 4096-bit RSA keys with no passphrase using `ssh-keygen`.
#[derive(Debug, Clone)]
pub struct SshKeygen {
    program: PathBuf,
    scratch: Option<PathBuf>,
}

impl SshKeygen {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(constants::SSH_KEYGEN),
            scratch: None,
        }
    }

    /// Use a different executable instead of `ssh-keygen`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Create working directories under `parent` instead of the system
    /// temp directory.
    pub fn in_dir(mut self, parent: impl Into<PathBuf>) -> Self {
        self.scratch = Some(parent.into());
        self
    }

    fn locate(&self) -> Result<PathBuf> {
        which::which(&self.program)
            .map_err(|_| KeygenError::ToolMissing(self.program.display().to_string()).into())
    }

    fn workdir(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("mirrorer-keygen-");
        let dir = match &self.scratch {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        };
        dir.map_err(|e| KeygenError::Workdir(e).into())
    }

    fn run(&self, program: &Path, comment: &str, key_path: &Path) -> Result<()> {
        let tool = self.program.display().to_string();
        let bits = constants::KEY_BITS.to_string();

        let output = Command::new(program)
            .args(["-q", "-t", "rsa", "-b", &bits, "-C", comment, "-N", ""])
            .arg("-f")
            .arg(key_path)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| KeygenError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(KeygenError::Failed {
                tool,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl Default for SshKeygen {
    fn default() -> Self {
        Self::new()
    }
}

impl Keygen for SshKeygen {
    fn generate(&self, comment: &str) -> Result<KeyPair> {
        let program = self.locate()?;
        let workdir = self.workdir()?;
        let key_path = workdir.path().join("id_rsa");

        debug!(workdir = %workdir.path().display(), comment, "generating key pair");

        // Any early return drops `workdir`, which deletes it.
        self.run(&program, comment, &key_path)?;

        let private = Zeroizing::new(fs::read_to_string(&key_path).map_err(KeygenError::ReadKey)?);
        let public =
            fs::read_to_string(key_path.with_extension("pub")).map_err(KeygenError::ReadKey)?;

        let path = workdir.path().to_path_buf();
        if let Err(e) = workdir.close() {
            warn!(path = %path.display(), error = %e, "failed to remove key working directory");
        }

        trace!(
            private_len = private.len(),
            public_len = public.len(),
            "key pair read"
        );

        Ok(KeyPair::new(private.as_str(), public))
    }
}
