//! AES-256-GCM encryption for OAuth tokens at rest.
//!
//! Every envelope gets a fresh 32-byte salt and 12-byte IV. The AES key is
//! re-derived from the master secret and that salt on every call, so a leaked
//! salt alone is useless and each master-secret guess costs 100k PBKDF2 rounds.

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce, Tag};
use zeroize::Zeroizing;

use crate::envelope::{EncryptedEnvelope, SealedToken};
use crate::error::CryptoError;
use crate::kdf::derive_key;
use crate::types::{AES_GCM_IV_LENGTH, AES_GCM_TAG_LENGTH, CURRENT_VERSION, SALT_LENGTH};

/// Generate `N` random bytes from the OS RNG.
fn random_bytes<const N: usize>() -> Result<[u8; N], CryptoError> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
    Ok(bytes)
}

/// Reversible, authenticated encryption of a single secret string.
///
/// The master secret is injected once per deployment and never stored with
/// the ciphertext. `TokenCipher` holds no other state, so one instance can be
/// shared across threads.
pub struct TokenCipher {
    master_secret: Zeroizing<String>,
}

impl TokenCipher {
    /// Create a cipher bound to the deployment's master secret.
    pub fn new(master_secret: impl Into<String>) -> Result<Self, CryptoError> {
        let master_secret = Zeroizing::new(master_secret.into());
        if master_secret.is_empty() {
            return Err(CryptoError::InvalidInput(
                "master secret must not be empty".to_string(),
            ));
        }
        Ok(Self { master_secret })
    }

    fn cipher_for(&self, salt: &[u8; SALT_LENGTH]) -> Result<Aes256Gcm, CryptoError> {
        let key = derive_key(self.master_secret.as_bytes(), salt);
        Aes256Gcm::new_from_slice(&key[..]).map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
    }

    /// Encrypt raw bytes into a sealed token with fresh salt and IV.
    pub(crate) fn seal(&self, plaintext: &[u8]) -> Result<SealedToken, CryptoError> {
        let salt = random_bytes::<SALT_LENGTH>()?;
        let iv = random_bytes::<AES_GCM_IV_LENGTH>()?;
        let cipher = self.cipher_for(&salt)?;

        let mut ciphertext = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(&iv), b"", &mut ciphertext)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

        let mut tag_bytes = [0u8; AES_GCM_TAG_LENGTH];
        tag_bytes.copy_from_slice(tag.as_slice());

        Ok(SealedToken {
            version: CURRENT_VERSION,
            ciphertext,
            iv,
            salt,
            tag: tag_bytes,
        })
    }

    /// Authenticate and decrypt a sealed token.
    pub(crate) fn open(&self, sealed: &SealedToken) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let cipher = self
            .cipher_for(&sealed.salt)
            .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;

        let mut plaintext = Zeroizing::new(sealed.ciphertext.clone());
        cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(&sealed.iv),
                b"",
                &mut plaintext,
                Tag::from_slice(&sealed.tag),
            )
            .map_err(|_| {
                CryptoError::DecryptionFailed(
                    "authentication tag mismatch (tampered data or wrong master secret)"
                        .to_string(),
                )
            })?;
        Ok(plaintext)
    }

    /// Encrypt a token into a new envelope.
    ///
    /// Two calls with the same plaintext never produce the same envelope.
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedEnvelope, CryptoError> {
        if plaintext.is_empty() {
            return Err(CryptoError::InvalidInput(
                "plaintext must not be empty".to_string(),
            ));
        }
        Ok(EncryptedEnvelope::from(self.seal(plaintext.as_bytes())?))
    }

    /// Decrypt an envelope back to the original token.
    ///
    /// Structural problems fail with [`CryptoError::MalformedEnvelope`] before
    /// any key is derived. A rejected tag fails with
    /// [`CryptoError::DecryptionFailed`] and no plaintext is returned.
    pub fn decrypt(&self, envelope: &EncryptedEnvelope) -> Result<String, CryptoError> {
        let sealed = SealedToken::try_from(envelope)?;
        let plaintext = self.open(&sealed)?;
        String::from_utf8(plaintext.to_vec())
            .map_err(|_| CryptoError::DecryptionFailed("plaintext is not valid UTF-8".to_string()))
    }

    /// Re-encrypt the token behind `envelope` under a fresh salt and IV.
    pub fn rotate(&self, envelope: &EncryptedEnvelope) -> Result<EncryptedEnvelope, CryptoError> {
        let sealed = SealedToken::try_from(envelope)?;
        let plaintext = self.open(&sealed)?;
        Ok(EncryptedEnvelope::from(self.seal(&plaintext)?))
    }

    /// Health check: whether `envelope` decrypts under this master secret.
    pub fn validate(&self, envelope: &EncryptedEnvelope) -> bool {
        self.decrypt(envelope).is_ok()
    }
}

impl std::fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCipher")
            .field("master_secret", &"<redacted>")
            .finish()
    }
}
