//! X25519 key types.
//!
//! Thin wrappers over `crypto_box` keys that fix the byte layout and the
//! text form used in key files. A private key's public half is always derived
//! by scalar base multiplication; it is never stored next to it in memory.

use rand::{CryptoRng, RngCore};

use crate::encoding;
use crate::error::{Result, SealError};

/// X25519 key length in bytes.
pub const KEY_LEN: usize = 32;

/// Recipient public key.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(crypto_box::PublicKey);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(crypto_box::PublicKey::from(bytes))
    }

    /// Parse raw bytes, requiring exactly 32 of them.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            SealError::InvalidInput(format!(
                "Public key must be {} bytes, got {}",
                KEY_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self::from_bytes(array))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        self.0.as_bytes()
    }

    /// Base32 form without newline, as shown in edit headers.
    pub fn to_base32(&self) -> String {
        encoding::encode(self.as_bytes())
    }

    pub(crate) fn inner(&self) -> &crypto_box::PublicKey {
        &self.0
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PublicKey").field(&self.to_base32()).finish()
    }
}

/// Private key; the underlying scalar is zeroized on drop.
#[derive(Clone)]
pub struct PrivateKey(crypto_box::SecretKey);

impl PrivateKey {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(crypto_box::SecretKey::generate(rng))
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(crypto_box::SecretKey::from(bytes))
    }

    /// Raw scalar. Callers should keep the copy short-lived.
    pub fn to_bytes(&self) -> zeroize::Zeroizing<[u8; KEY_LEN]> {
        zeroize::Zeroizing::new(self.0.to_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.public_key())
    }

    pub(crate) fn inner(&self) -> &crypto_box::SecretKey {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PrivateKey").field(&"[REDACTED]").finish()
    }
}

/// A freshly generated keypair.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl KeyPair {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let private = PrivateKey::generate(rng);
        let public = private.public_key();
        Self { public, private }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_public_key_is_derived_from_private() {
        let mut rng = StdRng::seed_from_u64(1);
        let pair = KeyPair::generate(&mut rng);
        let restored = PrivateKey::from_bytes(*pair.private.to_bytes());
        assert_eq!(restored.public_key(), pair.public);
    }

    #[test]
    fn test_known_base_point_multiplication() {
        // RFC 7748 section 6.1, Alice's key pair
        let secret: [u8; 32] =
            hex::decode("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a")
                .unwrap()
                .try_into()
                .unwrap();
        let expected =
            hex::decode("8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a")
                .unwrap();
        let public = PrivateKey::from_bytes(secret).public_key();
        assert_eq!(public.as_bytes().as_slice(), expected.as_slice());
    }

    #[test]
    fn test_public_key_from_slice_checks_length() {
        assert!(PublicKey::from_slice(&[0u8; 31]).is_err());
        assert!(PublicKey::from_slice(&[0u8; 32]).is_ok());
    }

    #[test]
    fn test_private_key_debug_redacts() {
        let key = PrivateKey::from_bytes([0x5a; 32]);
        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("5a5a"));
    }
}
