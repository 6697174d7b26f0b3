//! The on-disk key store.
//!
//! A key directory (by default `~/.seal`, but always passed in explicitly)
//! holds one identity as two files:
//!
//! - `<name>.publickey`: base32 of the 32-byte public key
//! - `<name>.privatekey`: base32 of `nonce ‖ secretbox(private key)`
//!
//! Loading the private key asks a [`PassphrasePrompt`] until the passphrase
//! unwraps it. There is no retry limit; this is a local single-user tool.

mod locate;

use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretSlice};

use crate::crypto::wrap::{WrappedPrivateKey, WRAPPED_KEY_LEN};
use crate::crypto::validate_passphrase;
use crate::encoding;
use crate::error::{Result, SealError};
use crate::fs::{create_private_dir, write_atomic};
use crate::keys::{KeyPair, PrivateKey, PublicKey, KEY_LEN};

pub use locate::{find_key_file, key_name, PRIVATE_EXTENSION, PUBLIC_EXTENSION};

/// Raw passphrase bytes. Not required to be UTF-8: scrypt sees exactly the
/// bytes that were entered.
pub type Passphrase = SecretSlice<u8>;

/// Source of passphrases for unlocking a private key.
///
/// The terminal implementation reads without echo and never gives up;
/// an implementation may return an error from either method to stop the loop.
pub trait PassphrasePrompt {
    /// Ask for the passphrase of key `key_name`.
    fn read_passphrase(&mut self, key_name: &str) -> Result<Passphrase>;

    /// Called after a passphrase failed to unwrap the key.
    fn rejected(&mut self, key_name: &str) -> Result<()>;
}

/// A named public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicIdentity {
    pub name: String,
    pub key: PublicKey,
}

/// A named, unlocked private key.
#[derive(Debug, Clone)]
pub struct PrivateIdentity {
    pub name: String,
    pub key: PrivateKey,
}

impl PrivateIdentity {
    pub fn public(&self) -> PublicIdentity {
        PublicIdentity {
            name: self.name.clone(),
            key: self.key.public_key(),
        }
    }
}

/// Paths written by [`KeyStore::generate`].
#[derive(Debug, Clone)]
pub struct GeneratedKeys {
    pub created_dir: bool,
    pub public_path: PathBuf,
    pub private_path: PathBuf,
    pub public: PublicIdentity,
}

/// Key files in one directory.
#[derive(Debug, Clone)]
pub struct KeyStore {
    dir: PathBuf,
}

impl KeyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn public_key_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}{}", name, PUBLIC_EXTENSION))
    }

    pub fn private_key_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}{}", name, PRIVATE_EXTENSION))
    }

    pub fn locate_public_key(&self, hint: Option<&str>) -> Result<PathBuf> {
        let path = find_key_file(&self.dir, hint, PUBLIC_EXTENSION)?;
        tracing::debug!(path = %path.display(), "resolved public key");
        Ok(path)
    }

    pub fn locate_private_key(&self, hint: Option<&str>) -> Result<PathBuf> {
        let path = find_key_file(&self.dir, hint, PRIVATE_EXTENSION)?;
        tracing::debug!(path = %path.display(), "resolved private key");
        Ok(path)
    }

    /// Read and decode a `.publickey` file.
    pub fn load_public_key(&self, path: &Path) -> Result<PublicIdentity> {
        let name = key_name(path, PUBLIC_EXTENSION);
        let bytes = read_base32(path)?;
        if bytes.len() != KEY_LEN {
            return Err(SealError::InvalidKeyLength {
                path: path.to_path_buf(),
                expected: KEY_LEN,
                actual: bytes.len(),
            });
        }
        Ok(PublicIdentity {
            name,
            key: PublicKey::from_slice(&bytes)?,
        })
    }

    /// Read a `.privatekey` file and unlock it, prompting until the
    /// passphrase is right.
    pub fn load_private_key(
        &self,
        path: &Path,
        prompt: &mut dyn PassphrasePrompt,
    ) -> Result<PrivateIdentity> {
        let name = key_name(path, PRIVATE_EXTENSION);
        let bytes = read_base32(path)?;
        let wrapped =
            WrappedPrivateKey::from_bytes(&bytes).map_err(|actual| SealError::InvalidKeyLength {
                path: path.to_path_buf(),
                expected: WRAPPED_KEY_LEN,
                actual,
            })?;

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let passphrase = prompt.read_passphrase(&name)?;
            match wrapped.open(passphrase.expose_secret()) {
                Ok(key) => {
                    tracing::debug!(key = %name, attempt, "unlocked private key");
                    return Ok(PrivateIdentity { name, key });
                }
                Err(SealError::IncorrectPassphrase) => {
                    tracing::debug!(key = %name, attempt, "passphrase rejected");
                    prompt.rejected(&name)?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Locate and unlock the private key.
    pub fn unlock(
        &self,
        hint: Option<&str>,
        prompt: &mut dyn PassphrasePrompt,
    ) -> Result<PrivateIdentity> {
        let path = self.locate_private_key(hint)?;
        self.load_private_key(&path, prompt)
    }

    /// Public key for sealing.
    ///
    /// A hint naming a `.privatekey` file is unlocked and its public half
    /// derived, rather than looking for a sibling `.publickey` file.
    pub fn read_public_key(
        &self,
        hint: Option<&str>,
        prompt: &mut dyn PassphrasePrompt,
    ) -> Result<PublicIdentity> {
        if let Some(value) = hint {
            if value.trim().ends_with(PRIVATE_EXTENSION) {
                return Ok(self.unlock(Some(value), prompt)?.public());
            }
        }
        let path = self.locate_public_key(hint)?;
        self.load_public_key(&path)
    }

    /// Generate a keypair and write `<name>.publickey` and `<name>.privatekey`.
    ///
    /// Refuses to replace existing files unless `overwrite` is set.
    pub fn generate(
        &self,
        name: &str,
        passphrase: &Passphrase,
        overwrite: bool,
    ) -> Result<GeneratedKeys> {
        validate_key_name(name)?;
        validate_passphrase(passphrase.expose_secret())?;

        let public_path = self.public_key_path(name);
        let private_path = self.private_key_path(name);
        if !overwrite {
            for path in [&private_path, &public_path] {
                if path.exists() {
                    return Err(SealError::KeyExists { path: path.clone() });
                }
            }
        }

        let created_dir = create_private_dir(&self.dir)?;

        let mut rng = OsRng;
        let pair = KeyPair::generate(&mut rng);
        let wrapped =
            WrappedPrivateKey::seal(passphrase.expose_secret(), &pair.private, &mut rng)?;

        write_atomic(&public_path, encoding::encode_line(pair.public.as_bytes()).as_bytes())?;
        write_atomic(&private_path, wrapped.to_text().as_bytes())?;
        tracing::info!(key = %name, dir = %self.dir.display(), "generated keypair");

        Ok(GeneratedKeys {
            created_dir,
            public_path,
            private_path,
            public: PublicIdentity {
                name: name.to_string(),
                key: pair.public,
            },
        })
    }
}

fn read_base32(path: &Path) -> Result<Vec<u8>> {
    let data = std::fs::read(path).map_err(|e| {
        std::io::Error::new(e.kind(), format!("Failed to read {}: {}", path.display(), e))
    })?;
    encoding::decode(&data).map_err(|e| SealError::Encoding(format!("{}: {}", path.display(), e)))
}

fn validate_key_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SealError::InvalidInput("Key name cannot be empty".to_string()));
    }
    if name.contains('/') || name.contains('\\') || name.starts_with('.') {
        return Err(SealError::InvalidInput(format!(
            "Key name must be a plain file name: {}",
            name
        )));
    }
    Ok(())
}

/// Fixed list of passphrases, for tests and scripted use.
///
/// Every rejected passphrase moves on to the next one; running out is an
/// `IncorrectPassphrase` error.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    passphrases: Vec<Vec<u8>>,
    next: usize,
    pub rejections: usize,
}

#[cfg(any(test, feature = "test-support"))]
impl ScriptedPrompt {
    pub fn new<I, S>(passphrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self {
            passphrases: passphrases
                .into_iter()
                .map(|p| p.as_ref().to_vec())
                .collect(),
            next: 0,
            rejections: 0,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl PassphrasePrompt for ScriptedPrompt {
    fn read_passphrase(&mut self, _key_name: &str) -> Result<Passphrase> {
        let value = self
            .passphrases
            .get(self.next)
            .cloned()
            .ok_or(SealError::IncorrectPassphrase)?;
        self.next += 1;
        Ok(Passphrase::from(value))
    }

    fn rejected(&mut self, _key_name: &str) -> Result<()> {
        self.rejections += 1;
        Ok(())
    }
}
