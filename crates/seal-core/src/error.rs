//! Error types for Seal core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps them to
//! exit codes and hints.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Seal operations.
pub type Result<T> = std::result::Result<T, SealError>;

/// Core error type for Seal operations.
#[derive(Debug, Error)]
pub enum SealError {
    /// No key file with the wanted extension in the key directory
    #[error("No keys found in {}", dir.display())]
    NoKeysFound { dir: PathBuf },

    /// More than one candidate key file and no explicit choice
    #[error("Found multiple keys: {}", format_paths(matches))]
    AmbiguousKeys { matches: Vec<PathBuf> },

    /// An absolute key path that does not exist
    #[error("File not found: {}", path.display())]
    KeyFileNotFound { path: PathBuf },

    /// A relative key hint that matched neither as given nor in the key directory
    #[error("Key not found. Tried {:?} and {:?}", literal.display().to_string(), guess.display().to_string())]
    KeyNotFound { literal: PathBuf, guess: PathBuf },

    /// Key generation would replace an existing file
    #[error("Key file already exists: {}", path.display())]
    KeyExists { path: PathBuf },

    /// Decoded key material has the wrong size
    #[error("Unexpected key length in {}: got {actual} bytes, want {expected}", path.display())]
    InvalidKeyLength {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// Base32 decoding failed
    #[error("Error decoding base32: {0}")]
    Encoding(String),

    /// The passphrase did not unwrap the private key
    #[error("Incorrect passphrase")]
    IncorrectPassphrase,

    /// Envelope text is not decodable or too short
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Envelope carries a version byte this build does not understand
    #[error("Unknown ciphertext version: got {got}, want {want}")]
    UnsupportedVersion { got: u8, want: u8 },

    /// Wrong key or corrupted envelope; deliberately not distinguished
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Editor output lost the protocol separator line
    #[error("Missing line separator")]
    MissingSeparator,

    /// An existing sealed file needs the private key but only the public key is loaded
    #[error("Private key required to read {}", path.display())]
    PrivateKeyRequired { path: PathBuf },

    /// The external editor failed
    #[error("Editor error: {0}")]
    Editor(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Primitive-level cryptographic failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

fn format_paths(paths: &[PathBuf]) -> String {
    let items: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    format!("[{}]", items.join(" "))
}
