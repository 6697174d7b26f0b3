//! Passphrase wrapping of the private key (NaCl secretbox).
//!
//! On disk a wrapped key is `nonce(24) ‖ XSalsa20-Poly1305(private key)`,
//! 72 bytes in total, base32-encoded.

use crypto_secretbox::aead::{Aead, KeyInit};
use crypto_secretbox::{Key, Nonce, XSalsa20Poly1305};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::crypto::key::{derive_key, DerivedKey};
use crate::encoding;
use crate::error::{Result, SealError};
use crate::keys::{PrivateKey, KEY_LEN};

/// Secretbox nonce length.
pub const NONCE_LEN: usize = 24;

/// Poly1305 tag length.
pub const TAG_LEN: usize = 16;

/// Exact decoded size of a wrapped private key file.
pub const WRAPPED_KEY_LEN: usize = NONCE_LEN + KEY_LEN + TAG_LEN;

/// Encrypt a raw private key under `key` and `nonce`.
///
/// The nonce must be fresh random bytes for every wrap; it is not secret and
/// is stored in front of the ciphertext.
pub fn wrap_key(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    private_key: &[u8; KEY_LEN],
) -> Result<Vec<u8>> {
    let cipher = XSalsa20Poly1305::new(Key::from_slice(key.as_bytes()));
    cipher
        .encrypt(Nonce::from_slice(nonce), private_key.as_slice())
        .map_err(|_| SealError::Crypto("Private key wrap failed".to_string()))
}

/// Decrypt a wrapped private key.
///
/// # Errors
///
/// `SealError::IncorrectPassphrase` if the tag does not verify, which in
/// practice means the passphrase was wrong.
pub fn unwrap_key(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let cipher = XSalsa20Poly1305::new(Key::from_slice(key.as_bytes()));
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| SealError::IncorrectPassphrase)?,
    );

    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
    if plaintext.len() != KEY_LEN {
        return Err(SealError::Crypto(format!(
            "Unwrapped key has {} bytes, want {}",
            plaintext.len(),
            KEY_LEN
        )));
    }
    bytes.copy_from_slice(&plaintext);
    Ok(bytes)
}

/// The contents of a `.privatekey` file.
#[derive(Clone, PartialEq, Eq)]
pub struct WrappedPrivateKey {
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
}

impl WrappedPrivateKey {
    /// Wrap `private_key` under `passphrase` with a random nonce.
    pub fn seal<R>(passphrase: &[u8], private_key: &PrivateKey, rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng,
    {
        let mut nonce = [0u8; NONCE_LEN];
        rng.fill_bytes(&mut nonce);

        let key = derive_key(passphrase)?;
        let secret = private_key.to_bytes();
        let ciphertext = wrap_key(&key, &nonce, &secret)?;
        Ok(Self { nonce, ciphertext })
    }

    /// Try to unwrap with `passphrase`.
    pub fn open(&self, passphrase: &[u8]) -> Result<PrivateKey> {
        let key = derive_key(passphrase)?;
        let bytes = unwrap_key(&key, &self.nonce, &self.ciphertext)?;
        Ok(PrivateKey::from_bytes(*bytes))
    }

    /// Parse decoded file bytes; the length must be exact.
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, usize> {
        if bytes.len() != WRAPPED_KEY_LEN {
            return Err(bytes.len());
        }
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&bytes[..NONCE_LEN]);
        Ok(Self {
            nonce,
            ciphertext: bytes[NONCE_LEN..].to_vec(),
        })
    }

    /// `nonce ‖ ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(WRAPPED_KEY_LEN);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// File contents: base32 plus newline.
    pub fn to_text(&self) -> String {
        encoding::encode_line(&self.to_bytes())
    }
}

impl std::fmt::Debug for WrappedPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedPrivateKey")
            .field("nonce", &encoding::encode(&self.nonce))
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_key(byte: u8) -> DerivedKey {
        DerivedKey::from_bytes([byte; 32])
    }

    #[test]
    fn test_wrap_unwrap_round_trip() {
        let key = fixed_key(1);
        let nonce = [9u8; NONCE_LEN];
        let secret = [42u8; KEY_LEN];

        let ciphertext = wrap_key(&key, &nonce, &secret).unwrap();
        assert_eq!(ciphertext.len(), KEY_LEN + TAG_LEN);

        let unwrapped = unwrap_key(&key, &nonce, &ciphertext).unwrap();
        assert_eq!(*unwrapped, secret);
    }

    #[test]
    fn test_unwrap_with_wrong_key_fails() {
        let nonce = [0u8; NONCE_LEN];
        let ciphertext = wrap_key(&fixed_key(1), &nonce, &[5u8; KEY_LEN]).unwrap();

        let result = unwrap_key(&fixed_key(2), &nonce, &ciphertext);
        assert!(matches!(result, Err(SealError::IncorrectPassphrase)));
    }

    #[test]
    fn test_unwrap_with_wrong_nonce_fails() {
        let key = fixed_key(3);
        let ciphertext = wrap_key(&key, &[1u8; NONCE_LEN], &[5u8; KEY_LEN]).unwrap();

        let result = unwrap_key(&key, &[2u8; NONCE_LEN], &ciphertext);
        assert!(matches!(result, Err(SealError::IncorrectPassphrase)));
    }

    #[test]
    fn test_unwrap_tampered_fails() {
        let key = fixed_key(4);
        let nonce = [7u8; NONCE_LEN];
        let mut ciphertext = wrap_key(&key, &nonce, &[5u8; KEY_LEN]).unwrap();
        ciphertext[20] ^= 0x01;

        assert!(unwrap_key(&key, &nonce, &ciphertext).is_err());
    }

    #[test]
    fn test_wrapped_key_layout() {
        let mut rng = StdRng::seed_from_u64(11);
        let private = PrivateKey::generate(&mut rng);
        let wrapped = WrappedPrivateKey::seal(b"layout", &private, &mut rng).unwrap();

        let bytes = wrapped.to_bytes();
        assert_eq!(bytes.len(), WRAPPED_KEY_LEN);
        assert_eq!(WrappedPrivateKey::from_bytes(&bytes).unwrap(), wrapped);
        assert_eq!(WrappedPrivateKey::from_bytes(&bytes[1..]), Err(WRAPPED_KEY_LEN - 1));

        let reopened = wrapped.open(b"layout").unwrap();
        assert_eq!(reopened.public_key(), private.public_key());
    }

    #[test]
    fn test_debug_hides_ciphertext() {
        let wrapped = WrappedPrivateKey::from_bytes(&[0u8; WRAPPED_KEY_LEN]).unwrap();
        let debug_output = format!("{:?}", wrapped);
        assert!(debug_output.contains("ciphertext_len: 48"));
    }
}
