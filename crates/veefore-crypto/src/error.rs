use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Random number generation failed: {0}")]
    RngFailed(String),

    #[error("Blocking crypto task failed: {0}")]
    TaskFailed(String),
}

impl CryptoError {
    /// Whether the stored token behind this error is unusable and the
    /// external account has to be reconnected to obtain a new one.
    ///
    /// Decryption is never retried with another key: there is exactly one
    /// master secret per deployment.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            CryptoError::MalformedEnvelope(_) | CryptoError::DecryptionFailed(_)
        )
    }
}
