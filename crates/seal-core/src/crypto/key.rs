//! Key derivation using scrypt.
//!
//! Turns a passphrase into the 32-byte key that wraps the private key file.
//! The salt and cost are global constants: every key file ever written by
//! Seal was derived with exactly these values, and no per-file salt is stored.

use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, SealError};

/// Fixed application salt, part of the key file format. Two installations with
/// the same passphrase derive the same key.
pub const KDF_SALT: &[u8] = b"seal";

/// scrypt parameters: N = 2^16, r = 8, p = 1 (about 64 MiB per derivation).
const SCRYPT_LOG_N: u8 = 16;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// Length of derived key in bytes.
pub const KEY_LENGTH: usize = 32;

/// A symmetric key derived from a passphrase.
///
/// Zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Create a DerivedKey from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Raw key bytes. Avoid storing or logging this value.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive the key-wrapping key from a passphrase.
///
/// Deterministic: the same passphrase always yields the same key. Slow on
/// purpose; callers should derive once per attempt.
///
/// # Errors
///
/// Only if the scrypt parameters are rejected, which cannot happen with the
/// built-in constants.
pub fn derive_key(passphrase: &[u8]) -> Result<DerivedKey> {
    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LENGTH)
        .map_err(|e| SealError::Crypto(format!("Invalid scrypt params: {}", e)))?;

    let mut key_bytes = Zeroizing::new([0u8; KEY_LENGTH]);
    scrypt::scrypt(passphrase, KDF_SALT, &params, key_bytes.as_mut_slice())
        .map_err(|e| SealError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKey::from_bytes(*key_bytes))
}
