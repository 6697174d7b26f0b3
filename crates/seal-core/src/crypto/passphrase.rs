//! Passphrase validation.

use crate::error::{Result, SealError};

/// Validate a passphrase chosen for a new key.
///
/// The only requirement is that it is not empty. Unlocking an existing key
/// accepts whatever the user types.
///
/// # Examples
///
/// ```
/// use seal_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase(b"correct horse").is_ok());
/// assert!(validate_passphrase(b"").is_err());
/// ```
pub fn validate_passphrase(passphrase: &[u8]) -> Result<()> {
    if passphrase.is_empty() {
        return Err(SealError::InvalidInput(
            "Passphrase cannot be empty".to_string(),
        ));
    }
    Ok(())
}
