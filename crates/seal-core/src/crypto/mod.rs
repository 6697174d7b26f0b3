//! Symmetric cryptography for Seal.
//!
//! - **scrypt**: passphrase to key derivation with a fixed salt
//! - **XSalsa20-Poly1305** (NaCl secretbox): wrapping the private key at rest
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the key directory or of sealed files
//! - Offline brute-force attacks on the passphrase (scrypt cost)
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Precomputed dictionaries shared across installations: the salt is the
//!   same everywhere, so equal passphrases derive equal keys
//! - Access to an unlocked process / memory

pub mod key;
pub mod passphrase;
pub mod wrap;

pub use key::{derive_key, DerivedKey, KDF_SALT};
pub use passphrase::validate_passphrase;
pub use wrap::{unwrap_key, wrap_key, WrappedPrivateKey, NONCE_LEN, TAG_LEN};
