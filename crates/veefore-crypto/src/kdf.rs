//! PBKDF2-HMAC-SHA256 key derivation.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::types::{AES_KEY_LENGTH, PBKDF2_ITERATIONS};

/// Derive a 256-bit AES key from the master secret and a per-envelope salt.
///
/// # Arguments
/// * `master_secret` - Deployment passphrase (UTF-8 bytes are the PBKDF2 password)
/// * `salt` - Raw salt bytes stored alongside the envelope
///
/// # Returns
/// 32-byte derived key, zeroed on drop
pub fn derive_key(master_secret: &[u8], salt: &[u8]) -> Zeroizing<[u8; AES_KEY_LENGTH]> {
    derive_key_with_iterations(master_secret, salt, PBKDF2_ITERATIONS)
}

pub(crate) fn derive_key_with_iterations(
    master_secret: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Zeroizing<[u8; AES_KEY_LENGTH]> {
    let mut key = Zeroizing::new([0u8; AES_KEY_LENGTH]);
    pbkdf2_hmac::<Sha256>(master_secret, salt, iterations, &mut key[..]);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_answer_vector() {
        // RFC 7914 §11, PBKDF2-HMAC-SHA256 P="passwd" S="salt" c=1 (first 32 bytes)
        let key = derive_key_with_iterations(b"passwd", b"salt", 1);
        assert_eq!(
            hex::encode(&key[..]),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );
    }

    #[test]
    fn deterministic() {
        let salt = [0x42u8; 32];
        let a = derive_key(b"master", &salt);
        let b = derive_key(b"master", &salt);
        assert_eq!(*a, *b);
    }

    #[test]
    fn different_salts_different_keys() {
        let a = derive_key(b"master", &[0x01u8; 32]);
        let b = derive_key(b"master", &[0x02u8; 32]);
        assert_ne!(*a, *b);
    }

    #[test]
    fn different_secrets_different_keys() {
        let salt = [0x42u8; 32];
        let a = derive_key(b"master-a", &salt);
        let b = derive_key(b"master-b", &salt);
        assert_ne!(*a, *b);
    }

    #[test]
    fn iteration_count_matters() {
        let salt = [0x42u8; 32];
        let a = derive_key_with_iterations(b"master", &salt, 1);
        let b = derive_key(b"master", &salt);
        assert_ne!(*a, *b);
    }
}
