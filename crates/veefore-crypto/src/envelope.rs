//! Persisted token envelope.
//!
//! Storage format (JSON, camelCase):
//! `{"version":1,"ciphertext":"..","iv":"..","salt":"..","authTag":".."}`
//!
//! Every binary field is standard base64. Envelopes written before the
//! `version` field existed carry the same AES-GCM scheme and deserialize as
//! version 1.

use serde::{Deserialize, Serialize};

use crate::base64::{base64_decode, base64_encode};
use crate::error::CryptoError;
use crate::types::{
    AES_GCM_IV_LENGTH, AES_GCM_TAG_LENGTH, CURRENT_VERSION, SALT_LENGTH, SUPPORTED_VERSIONS,
};

fn default_version() -> u8 {
    CURRENT_VERSION
}

/// Encrypted OAuth token as it is stored at rest.
///
/// Immutable once created: the only producers are [`crate::TokenCipher`]
/// and deserialization. Rotation yields a new envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedEnvelope {
    #[serde(default = "default_version")]
    pub(crate) version: u8,
    pub(crate) ciphertext: String,
    pub(crate) iv: String,
    pub(crate) salt: String,
    pub(crate) auth_tag: String,
}

impl EncryptedEnvelope {
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    pub fn iv(&self) -> &str {
        &self.iv
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn auth_tag(&self) -> &str {
        &self.auth_tag
    }

    /// Serialize for persistence.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(self).map_err(|e| CryptoError::MalformedEnvelope(e.to_string()))
    }

    /// Parse a stored envelope. Missing fields or non-string values are
    /// reported as [`CryptoError::MalformedEnvelope`].
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        serde_json::from_str(json).map_err(|e| CryptoError::MalformedEnvelope(e.to_string()))
    }
}

/// A structurally valid envelope with its fields decoded to raw bytes.
///
/// Building one is the only gate in front of decryption: every length and
/// encoding check happens in [`SealedToken::try_from`], before any key is
/// derived.
#[derive(Clone, PartialEq, Eq)]
pub struct SealedToken {
    pub(crate) version: u8,
    pub(crate) ciphertext: Vec<u8>,
    pub(crate) iv: [u8; AES_GCM_IV_LENGTH],
    pub(crate) salt: [u8; SALT_LENGTH],
    pub(crate) tag: [u8; AES_GCM_TAG_LENGTH],
}

impl SealedToken {
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn iv(&self) -> &[u8; AES_GCM_IV_LENGTH] {
        &self.iv
    }

    pub fn salt(&self) -> &[u8; SALT_LENGTH] {
        &self.salt
    }

    pub fn tag(&self) -> &[u8; AES_GCM_TAG_LENGTH] {
        &self.tag
    }
}

impl std::fmt::Debug for SealedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedToken")
            .field("version", &self.version)
            .field("ciphertext_len", &self.ciphertext.len())
            .finish_non_exhaustive()
    }
}

fn decode_field(field: &str, value: &str) -> Result<Vec<u8>, CryptoError> {
    if value.is_empty() {
        return Err(CryptoError::MalformedEnvelope(format!("{field} is missing")));
    }
    base64_decode(value)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("{field} is not valid base64: {e}")))
}

fn decode_fixed<const N: usize>(field: &str, value: &str) -> Result<[u8; N], CryptoError> {
    let bytes = decode_field(field, value)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        CryptoError::MalformedEnvelope(format!(
            "{field}: expected {} bytes, got {}",
            N,
            bytes.len()
        ))
    })
}

impl TryFrom<&EncryptedEnvelope> for SealedToken {
    type Error = CryptoError;

    fn try_from(envelope: &EncryptedEnvelope) -> Result<Self, Self::Error> {
        if !SUPPORTED_VERSIONS.contains(&envelope.version) {
            return Err(CryptoError::MalformedEnvelope(format!(
                "unsupported envelope version {}",
                envelope.version
            )));
        }

        Ok(Self {
            version: envelope.version,
            ciphertext: decode_field("ciphertext", &envelope.ciphertext)?,
            iv: decode_fixed("iv", &envelope.iv)?,
            salt: decode_fixed("salt", &envelope.salt)?,
            tag: decode_fixed("authTag", &envelope.auth_tag)?,
        })
    }
}

impl From<&SealedToken> for EncryptedEnvelope {
    fn from(sealed: &SealedToken) -> Self {
        Self {
            version: sealed.version,
            ciphertext: base64_encode(&sealed.ciphertext),
            iv: base64_encode(&sealed.iv),
            salt: base64_encode(&sealed.salt),
            auth_tag: base64_encode(&sealed.tag),
        }
    }
}

impl From<SealedToken> for EncryptedEnvelope {
    fn from(sealed: SealedToken) -> Self {
        Self::from(&sealed)
    }
}
