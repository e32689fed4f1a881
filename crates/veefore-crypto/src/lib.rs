//! Token encryption for OAuth credentials stored at rest.
//!
//! - AES-256-GCM envelopes with per-operation salt and IV
//! - PBKDF2-HMAC-SHA256 key derivation from a single master secret
//! - Master-secret configuration loading
//! - One-time migration of legacy base64 tokens

pub mod base64;
pub mod cipher;
pub mod config;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod legacy;
#[cfg(feature = "rt")]
pub mod offload;
pub mod types;

pub use base64::{base64_decode, base64_encode};
pub use cipher::TokenCipher;
pub use config::{CipherConfig, SecretSource, DEFAULT_SECRETS_DIR, MASTER_SECRET_VAR};
pub use envelope::{EncryptedEnvelope, SealedToken};
pub use error::CryptoError;
pub use kdf::derive_key;
pub use legacy::{migrate_legacy_token, Migration};
#[cfg(feature = "rt")]
pub use offload::AsyncTokenCipher;
pub use types::{
    AES_GCM_IV_LENGTH, AES_GCM_TAG_LENGTH, AES_KEY_LENGTH, CURRENT_VERSION, PBKDF2_ITERATIONS,
    SALT_LENGTH, SUPPORTED_VERSIONS,
};
