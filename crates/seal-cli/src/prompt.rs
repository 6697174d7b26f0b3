//! Passphrase entry on the terminal.

use std::io::IsTerminal;

use dialoguer::Password;

use seal_core::{Passphrase, PassphrasePrompt, SealError};

use crate::constants::env;

/// Reads passphrases without echo, or once from `SEAL_PASSPHRASE`.
///
/// A rejected environment passphrase is final: there is nobody to re-prompt.
#[derive(Default)]
pub struct TerminalPrompt {
    env_passphrase: Option<Passphrase>,
    last_from_env: bool,
}

impl TerminalPrompt {
    pub fn from_env() -> Self {
        Self {
            env_passphrase: env_passphrase(),
            last_from_env: false,
        }
    }
}

impl PassphrasePrompt for TerminalPrompt {
    fn read_passphrase(&mut self, key_name: &str) -> seal_core::Result<Passphrase> {
        if let Some(passphrase) = self.env_passphrase.take() {
            self.last_from_env = true;
            return Ok(passphrase);
        }
        self.last_from_env = false;

        if !std::io::stdin().is_terminal() {
            return Err(SealError::InvalidInput(format!(
                "No passphrase provided and no TTY available. Set {}.",
                env::PASSPHRASE
            )));
        }
        let value = Password::new()
            .with_prompt(format!("Enter passphrase for key {}", key_name))
            .allow_empty_password(true)
            .interact()
            .map_err(|e| SealError::InvalidInput(format!("Failed to read passphrase: {}", e)))?;
        Ok(Passphrase::from(value.into_bytes()))
    }

    fn rejected(&mut self, _key_name: &str) -> seal_core::Result<()> {
        if self.last_from_env {
            return Err(SealError::IncorrectPassphrase);
        }
        eprintln!("Wrong passphrase. Try again.");
        Ok(())
    }
}

/// Passphrase for a new key: `SEAL_PASSPHRASE`, or asked twice until both match.
pub fn new_passphrase(key_name: &str) -> anyhow::Result<Passphrase> {
    if let Some(passphrase) = env_passphrase() {
        return Ok(passphrase);
    }
    if !std::io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "No passphrase provided and no TTY available. Set {}.",
            env::PASSPHRASE
        ));
    }
    let value = Password::new()
        .with_prompt(format!("Enter passphrase for new key {}", key_name))
        .with_confirmation(
            "Enter same passphrase again",
            "Passphrases do not match. Try again.",
        )
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?;
    Ok(Passphrase::from(value.into_bytes()))
}

/// `SEAL_PASSPHRASE` as raw bytes, unless unset or blank.
fn env_passphrase() -> Option<Passphrase> {
    std::env::var_os(env::PASSPHRASE)
        .and_then(os_bytes)
        .filter(|bytes| !bytes.trim_ascii().is_empty())
        .map(Passphrase::from)
}

#[cfg(unix)]
fn os_bytes(value: std::ffi::OsString) -> Option<Vec<u8>> {
    use std::os::unix::ffi::OsStringExt;
    Some(value.into_vec())
}

#[cfg(not(unix))]
fn os_bytes(value: std::ffi::OsString) -> Option<Vec<u8>> {
    value.into_string().ok().map(String::into_bytes)
}
