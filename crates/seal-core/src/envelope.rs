//! Public-key sealing of messages.
//!
//! An envelope is `version(1) ‖ ephemeral public key(32) ‖ box ciphertext`,
//! base32-encoded with a trailing newline. The box is NaCl's
//! X25519 + XSalsa20-Poly1305 between a fresh ephemeral secret and the
//! recipient's public key.
//!
//! The nonce is always 24 zero bytes. A new ephemeral keypair per message
//! makes every shared secret unique, so the (key, nonce) pair never repeats.

use crypto_box::aead::Aead;
use crypto_box::SalsaBox;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::crypto::TAG_LEN;
use crate::encoding;
use crate::error::{Result, SealError};
use crate::keys::{PrivateKey, PublicKey, KEY_LEN};

/// The only envelope format this build reads and writes.
pub const ENVELOPE_VERSION: u8 = 1;

const ZERO_NONCE: [u8; 24] = [0u8; 24];

/// Decoded size of an envelope holding `message_len` bytes.
pub const fn sealed_len(message_len: usize) -> usize {
    1 + KEY_LEN + message_len + TAG_LEN
}

/// Seal `message` to `recipient` using the OS random source.
pub fn seal(recipient: &PublicKey, message: &[u8]) -> Result<String> {
    seal_with_rng(recipient, message, &mut OsRng)
}

/// Seal `message` to `recipient` with an explicit CSPRNG for the ephemeral key.
pub fn seal_with_rng<R>(recipient: &PublicKey, message: &[u8], rng: &mut R) -> Result<String>
where
    R: RngCore + CryptoRng,
{
    let ephemeral = PrivateKey::generate(rng);
    let ephemeral_public = ephemeral.public_key();

    let salsa_box = SalsaBox::new(recipient.inner(), ephemeral.inner());
    let ciphertext = salsa_box
        .encrypt(crypto_box::Nonce::from_slice(&ZERO_NONCE), message)
        .map_err(|_| SealError::Crypto("Envelope seal failed".to_string()))?;

    let mut data = Vec::with_capacity(sealed_len(message.len()));
    data.push(ENVELOPE_VERSION);
    data.extend_from_slice(ephemeral_public.as_bytes());
    data.extend_from_slice(&ciphertext);

    tracing::debug!(
        message_len = message.len(),
        sealed_len = data.len(),
        "sealed envelope"
    );
    Ok(encoding::encode_line(&data))
}

/// Open an envelope with the recipient's private key.
///
/// # Errors
///
/// - `MalformedEnvelope` if the text is not base32 or is too short
/// - `UnsupportedVersion` if the version byte is unknown (checked before any
///   cryptography)
/// - `DecryptionFailed` for a wrong key or tampered data, without saying which
pub fn open(recipient: &PrivateKey, text: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let data = encoding::decode(text).map_err(|e| SealError::MalformedEnvelope(e.to_string()))?;

    let (&version, rest) = data
        .split_first()
        .ok_or_else(|| SealError::MalformedEnvelope("empty envelope".to_string()))?;
    if version != ENVELOPE_VERSION {
        return Err(SealError::UnsupportedVersion {
            got: version,
            want: ENVELOPE_VERSION,
        });
    }

    if rest.len() < KEY_LEN + TAG_LEN {
        return Err(SealError::MalformedEnvelope(format!(
            "envelope too short: {} bytes",
            data.len()
        )));
    }
    let (ephemeral_bytes, ciphertext) = rest.split_at(KEY_LEN);
    let ephemeral_public = PublicKey::from_slice(ephemeral_bytes)?;

    let salsa_box = SalsaBox::new(ephemeral_public.inner(), recipient.inner());
    let message = salsa_box
        .decrypt(crypto_box::Nonce::from_slice(&ZERO_NONCE), ciphertext)
        .map_err(|_| SealError::DecryptionFailed)?;

    Ok(Zeroizing::new(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn keypair(seed: u64) -> KeyPair {
        KeyPair::generate(&mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_seal_open_round_trip() {
        let pair = keypair(1);
        let sealed = seal(&pair.public, b"attack at dawn").unwrap();
        assert!(sealed.ends_with('\n'));

        let opened = open(&pair.private, sealed.as_bytes()).unwrap();
        assert_eq!(opened.as_slice(), b"attack at dawn");
    }

    #[test]
    fn test_empty_message_round_trip() {
        let pair = keypair(2);
        let sealed = seal(&pair.public, b"").unwrap();
        assert_eq!(encoding::decode(sealed.as_bytes()).unwrap().len(), sealed_len(0));
        assert!(open(&pair.private, sealed.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_layout_starts_with_version_and_ephemeral_key() {
        let pair = keypair(3);
        let sealed = seal(&pair.public, b"x").unwrap();
        let data = encoding::decode(sealed.as_bytes()).unwrap();

        assert_eq!(data[0], ENVELOPE_VERSION);
        assert_ne!(&data[1..33], pair.public.as_bytes().as_slice());
    }

    #[test]
    fn test_unsupported_version_rejected_before_crypto() {
        let pair = keypair(4);
        // Too short to ever decrypt, so only the version check can fire.
        let text = encoding::encode(&[2u8, 1, 2, 3]);
        match open(&pair.private, text.as_bytes()) {
            Err(SealError::UnsupportedVersion { got, want }) => {
                assert_eq!(got, 2);
                assert_eq!(want, ENVELOPE_VERSION);
            }
            other => panic!("expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_inputs() {
        let pair = keypair(5);
        assert!(matches!(
            open(&pair.private, b"not base32!"),
            Err(SealError::MalformedEnvelope(_))
        ));
        assert!(matches!(
            open(&pair.private, b"   \n"),
            Err(SealError::MalformedEnvelope(_))
        ));
        let short = encoding::encode(&[ENVELOPE_VERSION; 20]);
        assert!(matches!(
            open(&pair.private, short.as_bytes()),
            Err(SealError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = seal(&keypair(6).public, b"secret").unwrap();
        assert!(matches!(
            open(&keypair(7).private, sealed.as_bytes()),
            Err(SealError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_deterministic_with_seeded_rng() {
        let pair = keypair(8);
        let a = seal_with_rng(&pair.public, b"m", &mut StdRng::seed_from_u64(99)).unwrap();
        let b = seal_with_rng(&pair.public, b"m", &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }
}
