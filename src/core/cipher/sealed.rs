//! Sealed-box encryption backend.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crypto_box::aead::OsRng;
use crypto_box::{PublicKey, SecretKey};
use tracing::trace;

use super::Cipher;
use crate::error::{CipherError, Result};

/// X25519 key length in bytes.
const KEY_LEN: usize = 32;

/// Anonymous public-key encryption using an ephemeral sender key.
pub struct SealedBox;

impl Cipher for SealedBox {
    type Recipient = PublicKey;
    type Identity = SecretKey;

    fn encrypt(&self, plaintext: &str, recipient: &PublicKey) -> Result<String> {
        trace!(plaintext_len = plaintext.len(), "sealing");

        let sealed = recipient
            .seal(&mut OsRng, plaintext.as_bytes())
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        trace!(ciphertext_len = sealed.len(), "sealed");
        Ok(STANDARD.encode(sealed))
    }

    fn decrypt(&self, encrypted: &str, identity: &SecretKey) -> Result<String> {
        trace!(ciphertext_len = encrypted.len(), "unsealing");

        let sealed = STANDARD
            .decode(encrypted.trim())
            .map_err(|e| CipherError::DecryptionFailed(format!("base64: {}", e)))?;
        let opened = identity
            .unseal(&sealed)
            .map_err(|e| CipherError::DecryptionFailed(e.to_string()))?;

        String::from_utf8(opened)
            .map_err(|e| CipherError::DecryptionFailed(format!("UTF-8 error: {}", e)).into())
    }
}

/// Parse a base64-encoded X25519 public key.
///
/// # Errors
///
/// Returns `CipherError::InvalidPublicKey` if the key is not valid base64
/// or not 32 bytes long.
pub fn parse_recipient(key: &str) -> Result<PublicKey> {
    let bytes = STANDARD
        .decode(key.trim())
        .map_err(|e| CipherError::InvalidPublicKey(format!("{}: {}", key, e)))?;
    let bytes: [u8; KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
        CipherError::InvalidPublicKey(format!("expected {} bytes, got {}", KEY_LEN, bytes.len()))
    })?;
    Ok(PublicKey::from(bytes))
}
