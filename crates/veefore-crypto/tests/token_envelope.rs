use serde_json::Value;
use veefore_crypto::{
    base64_decode, base64_encode, CryptoError, EncryptedEnvelope, SealedToken, TokenCipher,
};

const MASTER_SECRET: &str = "integration-master-secret-0123456789";

fn cipher() -> TokenCipher {
    TokenCipher::new(MASTER_SECRET).unwrap()
}

/// Rewrite one field of a stored envelope the way a corrupted document would look.
fn patch_field(envelope: &EncryptedEnvelope, field: &str, value: &str) -> EncryptedEnvelope {
    let mut json: Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();
    json[field] = Value::String(value.to_string());
    EncryptedEnvelope::from_json(&json.to_string()).unwrap()
}

fn flip_bit(field: &str, byte: usize, bit: u8) -> String {
    let mut bytes = base64_decode(field).unwrap();
    bytes[byte] ^= 1 << bit;
    base64_encode(&bytes)
}

#[test]
fn stored_json_round_trip() {
    let sc = cipher();
    let long = "x".repeat(4096);
    for token in ["a", "IGQWRNa2ZA0T3JwNm1fakeToken", long.as_str()] {
        let stored = sc.encrypt(token).unwrap().to_json().unwrap();
        let loaded = EncryptedEnvelope::from_json(&stored).unwrap();
        assert_eq!(sc.decrypt(&loaded).unwrap(), token);
    }
}

#[test]
fn identical_plaintexts_do_not_leak_equality() {
    let sc = cipher();
    let a = sc.encrypt("same").unwrap();
    let b = sc.encrypt("same").unwrap();
    assert_ne!(a.iv(), b.iv());
    assert_ne!(a.salt(), b.salt());
    assert_ne!(a.ciphertext(), b.ciphertext());
}

#[test]
fn bit_flips_are_detected() {
    let sc = cipher();
    let env = sc.encrypt("refresh-token-value").unwrap();

    let cases = [
        ("ciphertext", flip_bit(env.ciphertext(), 3, 7)),
        ("authTag", flip_bit(env.auth_tag(), 15, 0)),
        ("iv", flip_bit(env.iv(), 11, 4)),
    ];
    for (field, value) in cases {
        let tampered = patch_field(&env, field, &value);
        match sc.decrypt(&tampered) {
            Err(CryptoError::DecryptionFailed(_)) => {}
            other => panic!("{field}: expected DecryptionFailed, got {other:?}"),
        }
    }
}

#[test]
fn eleven_byte_iv_is_malformed() {
    let sc = cipher();
    let env = sc.encrypt("token").unwrap();
    let bad = patch_field(&env, "iv", &base64_encode(&[7u8; 11]));

    assert!(matches!(
        SealedToken::try_from(&bad),
        Err(CryptoError::MalformedEnvelope(_))
    ));
    assert!(matches!(
        sc.decrypt(&bad),
        Err(CryptoError::MalformedEnvelope(_))
    ));
}

#[test]
fn envelope_written_without_version_still_decrypts() {
    let sc = cipher();
    let env = sc.encrypt("pre-versioning-token").unwrap();
    let mut json: Value = serde_json::from_str(&env.to_json().unwrap()).unwrap();
    json.as_object_mut().unwrap().remove("version");

    let loaded = EncryptedEnvelope::from_json(&json.to_string()).unwrap();
    assert_eq!(sc.decrypt(&loaded).unwrap(), "pre-versioning-token");
}

#[test]
fn rotation_after_secret_change_requires_reconnect() {
    let env = cipher().encrypt("token").unwrap();
    let rotated_secret = TokenCipher::new("new-deployment-secret-without-reencrypt").unwrap();
    let err = rotated_secret.decrypt(&env).unwrap_err();
    assert!(err.requires_reauthentication());
    assert!(!rotated_secret.validate(&env));
}
