/// Envelope scheme version.
///
/// Version 1: AES-256-GCM, key = PBKDF2-HMAC-SHA256(master secret, salt, 100k), no AAD.
/// Fields: ciphertext, iv (12B), salt (32B), authTag (16B), each standard base64.
pub const CURRENT_VERSION: u8 = 1;

/// Supported envelope versions (for decryption).
pub const SUPPORTED_VERSIONS: &[u8] = &[1];

/// PBKDF2 iteration count. Changing it breaks every stored envelope.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Per-operation KDF salt length in bytes.
pub const SALT_LENGTH: usize = 32;

/// AES-GCM IV length in bytes (96 bits per NIST recommendation).
pub const AES_GCM_IV_LENGTH: usize = 12;

/// AES-GCM tag length in bytes (128 bits).
pub const AES_GCM_TAG_LENGTH: usize = 16;

/// AES key length in bytes (256 bits).
pub const AES_KEY_LENGTH: usize = 32;
