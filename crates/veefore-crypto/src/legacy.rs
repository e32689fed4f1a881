//! One-time migration of pre-encryption stored tokens.
//!
//! Early records stored OAuth tokens as plain base64, without any encryption.
//! Those values are not envelopes and [`TokenCipher::decrypt`] never accepts
//! them; this module turns them into envelopes once, at migration time.

use tracing::{debug, warn};

use crate::base64::base64_decode;
use crate::cipher::TokenCipher;
use crate::envelope::{EncryptedEnvelope, SealedToken};
use crate::error::CryptoError;

/// Outcome of migrating one stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Migration {
    /// The value already was a structurally valid envelope; nothing to write.
    AlreadyEncrypted(EncryptedEnvelope),
    /// The value was a legacy base64 token; persist the new envelope.
    Migrated(EncryptedEnvelope),
}

impl Migration {
    pub fn envelope(&self) -> &EncryptedEnvelope {
        match self {
            Migration::AlreadyEncrypted(env) | Migration::Migrated(env) => env,
        }
    }

    pub fn needs_write(&self) -> bool {
        matches!(self, Migration::Migrated(_))
    }
}

/// Migrate a stored token value to the current envelope format.
///
/// JSON objects are treated as envelopes and only checked structurally (no
/// key derivation). Anything else must be a legacy base64 token.
pub fn migrate_legacy_token(cipher: &TokenCipher, stored: &str) -> Result<Migration, CryptoError> {
    let stored = stored.trim();

    if stored.starts_with('{') {
        let envelope = EncryptedEnvelope::from_json(stored)?;
        SealedToken::try_from(&envelope)?;
        debug!("Stored token is already an envelope");
        return Ok(Migration::AlreadyEncrypted(envelope));
    }

    let bytes = base64_decode(stored).map_err(|e| {
        warn!("Stored token is neither an envelope nor legacy base64");
        CryptoError::InvalidInput(format!("legacy token is not valid base64: {e}"))
    })?;
    let token = String::from_utf8(bytes)
        .map_err(|_| CryptoError::InvalidInput("legacy token is not valid UTF-8".to_string()))?;

    let envelope = cipher.encrypt(&token)?;
    debug!("Legacy base64 token re-encrypted into an envelope");
    Ok(Migration::Migrated(envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base64::base64_encode;

    fn cipher() -> TokenCipher {
        TokenCipher::new("legacy-migration-master-secret").unwrap()
    }

    #[test]
    fn migrates_base64_token() {
        let sc = cipher();
        let legacy = base64_encode(b"EAAGm0PX4ZCpsBAlegacytoken");
        let migration = migrate_legacy_token(&sc, &legacy).unwrap();
        assert!(migration.needs_write());
        assert_eq!(
            sc.decrypt(migration.envelope()).unwrap(),
            "EAAGm0PX4ZCpsBAlegacytoken"
        );
    }

    #[test]
    fn leaves_envelopes_alone() {
        let sc = cipher();
        let env = sc.encrypt("already-encrypted").unwrap();
        let json = env.to_json().unwrap();
        let migration = migrate_legacy_token(&sc, &json).unwrap();
        assert!(!migration.needs_write());
        assert_eq!(migration, Migration::AlreadyEncrypted(env));
    }

    #[test]
    fn malformed_envelope_is_not_migrated() {
        let json = r#"{"ciphertext":"AAAA","iv":"AAAA","salt":"AAAA","authTag":"AAAA"}"#;
        let err = migrate_legacy_token(&cipher(), json).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedEnvelope(_)));
    }

    #[test]
    fn rejects_non_base64() {
        let err = migrate_legacy_token(&cipher(), "not*base64").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidInput(_)));
    }

    #[test]
    fn rejects_empty_legacy_token() {
        let err = migrate_legacy_token(&cipher(), "").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidInput(_)));
    }
}
