//! Async wrapper that keeps PBKDF2 off the async worker threads.

use std::sync::Arc;

use tracing::error;

use crate::cipher::TokenCipher;
use crate::envelope::EncryptedEnvelope;
use crate::error::CryptoError;

/// Shares one [`TokenCipher`] across tasks and runs every operation on
/// tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct AsyncTokenCipher {
    inner: Arc<TokenCipher>,
}

impl AsyncTokenCipher {
    pub fn new(cipher: TokenCipher) -> Self {
        Self {
            inner: Arc::new(cipher),
        }
    }

    /// The wrapped cipher, for callers already on a blocking thread.
    pub fn cipher(&self) -> &TokenCipher {
        &self.inner
    }

    async fn run<T, F>(&self, op: F) -> Result<T, CryptoError>
    where
        T: Send + 'static,
        F: FnOnce(&TokenCipher) -> Result<T, CryptoError> + Send + 'static,
    {
        let cipher = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(&cipher))
            .await
            .map_err(|e| {
                error!("Blocking token cipher task failed: {e}");
                CryptoError::TaskFailed(e.to_string())
            })?
    }

    pub async fn encrypt(&self, plaintext: String) -> Result<EncryptedEnvelope, CryptoError> {
        self.run(move |cipher| cipher.encrypt(&plaintext)).await
    }

    pub async fn decrypt(&self, envelope: EncryptedEnvelope) -> Result<String, CryptoError> {
        self.run(move |cipher| cipher.decrypt(&envelope)).await
    }

    pub async fn rotate(
        &self,
        envelope: EncryptedEnvelope,
    ) -> Result<EncryptedEnvelope, CryptoError> {
        self.run(move |cipher| cipher.rotate(&envelope)).await
    }

    /// Health check; a failed blocking task also reports `false`.
    pub async fn validate(&self, envelope: EncryptedEnvelope) -> bool {
        self.run(move |cipher| Ok(cipher.validate(&envelope)))
            .await
            .unwrap_or(false)
    }
}

impl From<TokenCipher> for AsyncTokenCipher {
    fn from(cipher: TokenCipher) -> Self {
        Self::new(cipher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn async_cipher() -> AsyncTokenCipher {
        AsyncTokenCipher::new(TokenCipher::new("async-test-master-secret").unwrap())
    }

    #[tokio::test]
    async fn round_trip_on_blocking_pool() {
        let sc = async_cipher();
        let env = sc.encrypt("async-token".to_string()).await.unwrap();
        assert_eq!(sc.decrypt(env.clone()).await.unwrap(), "async-token");
        assert!(sc.validate(env).await);
    }

    #[tokio::test]
    async fn rotate_on_blocking_pool() {
        let sc = async_cipher();
        let env = sc.encrypt("async-token".to_string()).await.unwrap();
        let rotated = sc.rotate(env.clone()).await.unwrap();
        assert_ne!(rotated, env);
        assert_eq!(sc.cipher().decrypt(&rotated).unwrap(), "async-token");
    }

    #[tokio::test]
    async fn errors_pass_through() {
        let sc = async_cipher();
        let err = sc.encrypt(String::new()).await.unwrap_err();
        assert!(matches!(err, CryptoError::InvalidInput(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_callers_share_one_cipher() {
        let sc = async_cipher();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sc = sc.clone();
                tokio::spawn(async move {
                    let token = format!("token-{i}");
                    let env = sc.encrypt(token.clone()).await.unwrap();
                    assert_eq!(sc.decrypt(env).await.unwrap(), token);
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }
    }
}
