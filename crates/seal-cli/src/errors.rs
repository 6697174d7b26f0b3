//! CLI error types for structured error handling.
//!
//! Core errors are classified into exit codes here; anything not recognised
//! exits with the general failure code.

use std::fmt;

use seal_core::SealError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Invalid user input
    InvalidInput(String),

    /// Some ciphertexts could not be opened
    IntegrityFailed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::IntegrityFailed(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Create an IntegrityFailed error.
    pub fn integrity_failed(message: impl Into<String>) -> Self {
        CliError::IntegrityFailed(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::IntegrityFailed(_) => exit_codes::INTEGRITY_FAILED,
        }
    }
}

/// Exit code for a core error.
pub fn seal_error_exit_code(err: &SealError) -> i32 {
    match err {
        SealError::NoKeysFound { .. }
        | SealError::AmbiguousKeys { .. }
        | SealError::KeyNotFound { .. }
        | SealError::KeyFileNotFound { .. } => exit_codes::NOT_FOUND,
        SealError::InvalidInput(_)
        | SealError::KeyExists { .. }
        | SealError::InvalidKeyLength { .. }
        | SealError::Encoding(_) => exit_codes::INVALID_INPUT,
        SealError::IncorrectPassphrase => exit_codes::AUTH_FAILED,
        SealError::MalformedEnvelope(_)
        | SealError::UnsupportedVersion { .. }
        | SealError::DecryptionFailed
        | SealError::MissingSeparator => exit_codes::INTEGRITY_FAILED,
        _ => exit_codes::FAILURE,
    }
}

/// Hint for a core error, if there is a useful one.
pub fn seal_error_hint(err: &SealError) -> Option<String> {
    match err {
        SealError::NoKeysFound { dir } => Some(format!(
            "Hint: Run `seal keygen` to create a key in {}.",
            dir.display()
        )),
        SealError::AmbiguousKeys { .. } => {
            Some("Hint: Choose one with --key <name> or set SEAL_KEY.".to_string())
        }
        SealError::KeyNotFound { .. } | SealError::KeyFileNotFound { .. } => Some(
            "Hint: --key takes a key name from the key directory or a path to a key file."
                .to_string(),
        ),
        SealError::IncorrectPassphrase => {
            Some("Hint: Check the passphrase in SEAL_PASSPHRASE.".to_string())
        }
        SealError::KeyExists { .. } => {
            Some("Hint: Pass --force to replace the existing key.".to_string())
        }
        SealError::MissingSeparator => Some(
            "Hint: Keep the separator line in the editor; the file was not changed.".to_string(),
        ),
        _ => None,
    }
}

/// Exit code and hint for any error reaching `main`.
pub fn classify(err: &anyhow::Error) -> (i32, Option<String>) {
    for cause in err.chain() {
        if let Some(cli_error) = cause.downcast_ref::<CliError>() {
            return (cli_error.exit_code(), None);
        }
        if let Some(seal_error) = cause.downcast_ref::<SealError>() {
            return (seal_error_exit_code(seal_error), seal_error_hint(seal_error));
        }
    }
    (exit_codes::FAILURE, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_key_resolution_errors_are_not_found() {
        let err = SealError::AmbiguousKeys {
            matches: vec![PathBuf::from("a.publickey"), PathBuf::from("b.publickey")],
        };
        assert_eq!(seal_error_exit_code(&err), exit_codes::NOT_FOUND);
        assert!(seal_error_hint(&err).is_some());
    }

    #[test]
    fn test_integrity_errors() {
        for err in [
            SealError::DecryptionFailed,
            SealError::MissingSeparator,
            SealError::MalformedEnvelope("short".to_string()),
            SealError::UnsupportedVersion { got: 2, want: 1 },
        ] {
            assert_eq!(seal_error_exit_code(&err), exit_codes::INTEGRITY_FAILED);
        }
    }

    #[test]
    fn test_classify_sees_through_context() {
        let err = Err::<(), _>(SealError::DecryptionFailed)
            .context("notes.sealed")
            .unwrap_err();
        assert_eq!(classify(&err).0, exit_codes::INTEGRITY_FAILED);

        let err = anyhow::Error::new(SealError::IncorrectPassphrase);
        assert_eq!(classify(&err).0, exit_codes::AUTH_FAILED);
    }

    #[test]
    fn test_classify_cli_error_and_fallback() {
        let err = anyhow::Error::new(CliError::invalid_input("Key name required"));
        assert_eq!(classify(&err), (exit_codes::INVALID_INPUT, None));

        let err = anyhow::anyhow!("something else");
        assert_eq!(classify(&err), (exit_codes::FAILURE, None));
    }
}
