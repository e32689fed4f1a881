//! Master-secret loading.
//!
//! The secret is resolved once at process start, from the environment or a
//! mounted secrets file, and then injected into [`TokenCipher`].

use std::env;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::cipher::TokenCipher;
use crate::error::CryptoError;

/// Environment variable holding the master secret.
pub const MASTER_SECRET_VAR: &str = "ENCRYPTION_KEY";

/// Directory checked for a secrets file named after [`MASTER_SECRET_VAR`].
pub const DEFAULT_SECRETS_DIR: &str = "/run/secrets";

/// Secrets shorter than this are accepted but logged as weak.
const RECOMMENDED_SECRET_LENGTH: usize = 32;

/// Where the master secret was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    Environment(String),
    SecretsFile(PathBuf),
    Provided,
}

pub struct CipherConfig {
    master_secret: Zeroizing<String>,
    source: SecretSource,
}

impl CipherConfig {
    /// Load from `ENCRYPTION_KEY`, falling back to `/run/secrets/ENCRYPTION_KEY`.
    pub fn load() -> Result<Self, CryptoError> {
        Self::load_from(MASTER_SECRET_VAR, Path::new(DEFAULT_SECRETS_DIR))
    }

    /// Load from the given variable, falling back to `secrets_dir/<var>`.
    pub fn load_from(var: &str, secrets_dir: &Path) -> Result<Self, CryptoError> {
        Self::load_with(var, secrets_dir, |key| env::var(key).ok())
    }

    /// Like [`CipherConfig::load_from`], with variables resolved by `lookup`
    /// instead of the process environment.
    pub fn load_with<F>(var: &str, secrets_dir: &Path, lookup: F) -> Result<Self, CryptoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup(var) {
            info!("Master secret loaded from environment variable {var}");
            return Self::build(secret, SecretSource::Environment(var.to_string()));
        }

        let path = secrets_dir.join(var);
        match read_to_string(&path) {
            Ok(contents) => {
                info!("Master secret loaded from {}", path.display());
                Self::build(contents.trim().to_string(), SecretSource::SecretsFile(path))
            }
            Err(e) => {
                warn!("{var} not set and {} unreadable: {e}", path.display());
                Err(CryptoError::InvalidInput(format!(
                    "master secret not configured: set {var} or provide {}",
                    path.display()
                )))
            }
        }
    }

    /// Use an explicitly provided secret.
    pub fn from_secret(secret: impl Into<String>) -> Result<Self, CryptoError> {
        Self::build(secret.into(), SecretSource::Provided)
    }

    fn build(secret: String, source: SecretSource) -> Result<Self, CryptoError> {
        let master_secret = Zeroizing::new(secret);
        if master_secret.is_empty() {
            warn!("Master secret from {source:?} is empty");
            return Err(CryptoError::InvalidInput(
                "master secret must not be empty".to_string(),
            ));
        }
        if master_secret.chars().count() < RECOMMENDED_SECRET_LENGTH {
            warn!(
                "Master secret is shorter than {RECOMMENDED_SECRET_LENGTH} characters; \
                 consider a longer passphrase"
            );
        }
        Ok(Self {
            master_secret,
            source,
        })
    }

    pub fn source(&self) -> &SecretSource {
        &self.source
    }

    /// Build the cipher this configuration describes.
    pub fn into_cipher(self) -> Result<TokenCipher, CryptoError> {
        TokenCipher::new(self.master_secret.as_str())
    }
}

impl std::fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherConfig")
            .field("master_secret", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}
