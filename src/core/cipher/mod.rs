//! Cryptographic operations.
//!
//! Secrets are encrypted for the hosting service's secret store with an
//! anonymous sealed box (X25519 + XSalsa20-Poly1305, libsodium
//! `crypto_box_seal` compatible). Only the holder of the store's private
//! key can open the result.

use crate::error::Result;

mod sealed;

pub use sealed::{parse_recipient, SealedBox};

/// Cryptographic backend trait.
///
/// Recipients and identities are backend-specific:
/// - sealed box: X25519 public / secret keys
pub trait Cipher {
    /// Type representing a recipient public key.
    type Recipient;

    /// Type representing a private identity/key.
    type Identity;

    /// Encrypt plaintext for a recipient.
    ///
    /// # Returns
    ///
    /// Base64-encoded ciphertext.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails.
    fn encrypt(&self, plaintext: &str, recipient: &Self::Recipient) -> Result<String>;

    /// Decrypt base64-encoded ciphertext with a private identity.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if decryption fails or the key doesn't match.
    fn decrypt(&self, encrypted: &str, identity: &Self::Identity) -> Result<String>;
}

/// Seal plaintext for a base64-encoded X25519 public key.
///
/// Convenience wrapper around [`parse_recipient`] and `SealedBox::encrypt`.
///
/// # Errors
///
/// Returns `CipherError` if the key is invalid or encryption fails.
pub fn seal(plaintext: &str, public_key_b64: &str) -> Result<String> {
    let recipient = parse_recipient(public_key_b64)?;
    SealedBox.encrypt(plaintext, &recipient)
}
