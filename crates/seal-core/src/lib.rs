//! # Seal Core
//!
//! Core library for Seal - seal files to your own public key, then decrypt,
//! edit and re-seal them from the terminal.
//!
//! This crate holds the cryptographic envelope, the passphrase-protected key
//! store and the edit protocol, independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: scrypt key derivation and secretbox key wrapping
//! - **keys**: X25519 public/private key types
//! - **keystore**: `<name>.publickey` / `<name>.privatekey` files and unlocking
//! - **envelope**: versioned public-key sealing (NaCl box, ephemeral sender key)
//! - **edit**: header/separator buffer protocol around an external editor
//! - **password**: unbiased password generation and password-file helpers
//! - **encoding**: the base32 text encoding used by every file
//! - **fs**: atomic, owner-only file writes

pub mod crypto;
pub mod edit;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod fs;
pub mod keys;
pub mod keystore;
pub mod password;

pub use edit::{EditOutcome, EditSession, Editor};
pub use envelope::{open, seal};
pub use error::{Result, SealError};
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use keystore::{KeyStore, Passphrase, PassphrasePrompt, PrivateIdentity, PublicIdentity};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
