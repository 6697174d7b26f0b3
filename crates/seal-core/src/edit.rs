//! Decrypt, edit, re-seal.
//!
//! The editor receives a buffer of the form
//!
//! ```text
//! # File: notes.sealed
//! # Key: alice (<base32 public key>)
//! # Do not remove the following line.
//! ------------------------ 8< ------------------------
//! <plaintext>
//! ```
//!
//! and everything after the first separator line is sealed again. Changes to
//! the header are discarded. An empty buffer from the editor means "quit
//! without saving" and leaves the file alone.

use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::envelope;
use crate::error::{Result, SealError};
use crate::fs::write_atomic;
use crate::keys::{PrivateKey, PublicKey};
use crate::keystore::{KeyStore, PassphrasePrompt};

/// Marker between the header and the editable payload.
pub const LINE_SEPARATOR: &str = "------------------------ 8< ------------------------\n";

/// An external editor: takes the composed buffer, returns what the user saved.
///
/// Implemented for closures so callers can substitute a stub.
pub trait Editor {
    fn edit(&mut self, buffer: &[u8]) -> Result<Vec<u8>>;
}

impl<F> Editor for F
where
    F: FnMut(&[u8]) -> Result<Vec<u8>>,
{
    fn edit(&mut self, buffer: &[u8]) -> Result<Vec<u8>> {
        self(buffer)
    }
}

/// Metadata shown above the separator.
#[derive(Debug, Clone)]
pub struct EditHeader<'a> {
    pub file_name: &'a str,
    pub key_name: &'a str,
    pub public_key: &'a PublicKey,
}

impl EditHeader<'_> {
    /// Header text, ending with the separator line.
    pub fn render(&self) -> String {
        format!(
            "# File: {}\n# Key: {} ({})\n# Do not remove the following line.\n{}",
            single_line(self.file_name),
            single_line(self.key_name),
            self.public_key.to_base32(),
            LINE_SEPARATOR
        )
    }
}

/// Header followed by `body`.
pub fn compose_buffer(header: &EditHeader<'_>, body: &[u8]) -> Zeroizing<Vec<u8>> {
    let header = header.render();
    let mut buffer = Zeroizing::new(Vec::with_capacity(header.len() + body.len()));
    buffer.extend_from_slice(header.as_bytes());
    buffer.extend_from_slice(body);
    buffer
}

/// Everything after the first occurrence of the separator.
pub fn extract_payload(buffer: &[u8]) -> Result<&[u8]> {
    let separator = LINE_SEPARATOR.as_bytes();
    buffer
        .windows(separator.len())
        .position(|window| window == separator)
        .map(|start| &buffer[start + separator.len()..])
        .ok_or(SealError::MissingSeparator)
}

/// Header values must not introduce lines of their own.
fn single_line(value: &str) -> String {
    value.replace(['\n', '\r'], " ")
}

/// Result of one edit round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The payload was sealed and written to the file.
    Written { path: PathBuf },
    /// The editor returned nothing; the file was not touched.
    Unchanged { path: PathBuf },
}

/// Keys for one invocation of an edit tool.
///
/// Holds the private key only when some target already exists and must be
/// decrypted first.
#[derive(Debug)]
pub struct EditSession {
    key_name: String,
    public_key: PublicKey,
    private_key: Option<PrivateKey>,
}

impl EditSession {
    /// Load whatever keys `targets` need: the private key if any of them
    /// exists, otherwise just the public key.
    pub fn for_targets(
        store: &KeyStore,
        key_hint: Option<&str>,
        targets: &[PathBuf],
        prompt: &mut dyn PassphrasePrompt,
    ) -> Result<Self> {
        let mut need_private_key = false;
        for target in targets {
            match std::fs::metadata(target) {
                Ok(_) => need_private_key = true,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }

        if need_private_key {
            let identity = store.unlock(key_hint, prompt)?;
            Ok(Self::with_private_key(identity.name, identity.key))
        } else {
            let identity = store.read_public_key(key_hint, prompt)?;
            Ok(Self::with_public_key(identity.name, identity.key))
        }
    }

    pub fn with_public_key(key_name: impl Into<String>, public_key: PublicKey) -> Self {
        Self {
            key_name: key_name.into(),
            public_key,
            private_key: None,
        }
    }

    pub fn with_private_key(key_name: impl Into<String>, private_key: PrivateKey) -> Self {
        Self {
            key_name: key_name.into(),
            public_key: private_key.public_key(),
            private_key: Some(private_key),
        }
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Decrypted contents of `path`, or empty if it does not exist yet.
    pub fn current_plaintext(&self, path: &Path) -> Result<Zeroizing<Vec<u8>>> {
        let sealed = match std::fs::read(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Zeroizing::new(Vec::new()))
            }
            Err(err) => return Err(err.into()),
        };
        let private_key = self
            .private_key
            .as_ref()
            .ok_or_else(|| SealError::PrivateKeyRequired {
                path: path.to_path_buf(),
            })?;
        envelope::open(private_key, &sealed)
    }

    /// Run one edit round trip on `path`, starting from `initial_body`.
    pub fn edit(
        &self,
        path: &Path,
        initial_body: &[u8],
        editor: &mut dyn Editor,
    ) -> Result<EditOutcome> {
        let file_name = path.display().to_string();
        let header = EditHeader {
            file_name: &file_name,
            key_name: &self.key_name,
            public_key: &self.public_key,
        };
        let buffer = compose_buffer(&header, initial_body);

        let edited = Zeroizing::new(editor.edit(&buffer)?);
        if edited.is_empty() {
            tracing::debug!(path = %path.display(), "editor returned nothing");
            return Ok(EditOutcome::Unchanged {
                path: path.to_path_buf(),
            });
        }

        let payload = extract_payload(&edited)?;
        let sealed = envelope::seal(&self.public_key, payload)?;
        write_atomic(path, sealed.as_bytes())?;
        Ok(EditOutcome::Written {
            path: path.to_path_buf(),
        })
    }

    /// Decrypt `path` (if present) and run the edit round trip on its contents.
    pub fn edit_existing(&self, path: &Path, editor: &mut dyn Editor) -> Result<EditOutcome> {
        let plaintext = self.current_plaintext(path)?;
        self.edit(path, &plaintext, editor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn header_for(public_key: &PublicKey) -> EditHeader<'_> {
        EditHeader {
            file_name: "notes.sealed",
            key_name: "alice",
            public_key,
        }
    }

    #[test]
    fn test_header_layout() {
        let pair = KeyPair::generate(&mut StdRng::seed_from_u64(1));
        let text = header_for(&pair.public).render();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# File: notes.sealed");
        assert_eq!(lines[1], format!("# Key: alice ({})", pair.public.to_base32()));
        assert_eq!(lines[2], "# Do not remove the following line.");
        assert_eq!(format!("{}\n", lines[3]), LINE_SEPARATOR);
    }

    #[test]
    fn test_separator_law() {
        let pair = KeyPair::generate(&mut StdRng::seed_from_u64(2));
        let header = header_for(&pair.public);
        let payloads: Vec<Vec<u8>> = vec![
            Vec::new(),
            b"hello\n".to_vec(),
            vec![0u8, 255, 10, 13, 0],
            format!("before\n{}after\n", LINE_SEPARATOR).into_bytes(),
            LINE_SEPARATOR.as_bytes().to_vec(),
        ];
        for payload in payloads {
            let buffer = compose_buffer(&header, &payload);
            assert_eq!(extract_payload(&buffer).unwrap(), payload.as_slice());
        }
    }

    #[test]
    fn test_separator_in_header_values_cannot_split() {
        let pair = KeyPair::generate(&mut StdRng::seed_from_u64(3));
        let sneaky = format!("x\n{}", LINE_SEPARATOR);
        let header = EditHeader {
            file_name: &sneaky,
            key_name: "alice",
            public_key: &pair.public,
        };
        let buffer = compose_buffer(&header, b"payload");
        assert_eq!(extract_payload(&buffer).unwrap(), b"payload");
    }

    #[test]
    fn test_first_separator_anywhere_splits() {
        let buffer = format!(
            "# File: x\n# Key: k (abc)\n# Do not remove the following line.{}secret\n",
            LINE_SEPARATOR
        );
        assert_eq!(extract_payload(buffer.as_bytes()).unwrap(), b"secret\n");

        let buffer = format!("{}one\n{}two\n", LINE_SEPARATOR, LINE_SEPARATOR);
        assert_eq!(
            extract_payload(buffer.as_bytes()).unwrap(),
            format!("one\n{}two\n", LINE_SEPARATOR).as_bytes()
        );
    }

    #[test]
    fn test_missing_separator() {
        assert!(matches!(
            extract_payload(b"# File: x\nno marker here\n"),
            Err(SealError::MissingSeparator)
        ));
        assert!(matches!(extract_payload(b""), Err(SealError::MissingSeparator)));
    }

    #[test]
    fn test_edit_new_file_with_public_key_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new.sealed");
        let pair = KeyPair::generate(&mut StdRng::seed_from_u64(4));
        let session = EditSession::with_public_key("alice", pair.public.clone());

        let mut editor = |buffer: &[u8]| -> Result<Vec<u8>> {
            let mut out = buffer.to_vec();
            out.extend_from_slice(b"fresh secret\n");
            Ok(out)
        };
        let outcome = session.edit_existing(&path, &mut editor).unwrap();
        assert_eq!(outcome, EditOutcome::Written { path: path.clone() });

        let sealed = std::fs::read(&path).unwrap();
        let opened = envelope::open(&pair.private, &sealed).unwrap();
        assert_eq!(opened.as_slice(), b"fresh secret\n");
    }

    #[test]
    fn test_edit_discards_header_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.sealed");
        let pair = KeyPair::generate(&mut StdRng::seed_from_u64(5));
        std::fs::write(&path, envelope::seal(&pair.public, b"old\n").unwrap()).unwrap();

        let session = EditSession::with_private_key("alice", pair.private.clone());
        let mut editor = |buffer: &[u8]| -> Result<Vec<u8>> {
            let text = String::from_utf8(buffer.to_vec()).unwrap();
            assert!(text.ends_with(&format!("{}old\n", LINE_SEPARATOR)));
            Ok(format!("# scribbled over the header\n{}new\n", LINE_SEPARATOR).into_bytes())
        };
        session.edit_existing(&path, &mut editor).unwrap();

        let opened = envelope::open(&pair.private, &std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(opened.as_slice(), b"new\n");
    }

    #[test]
    fn test_empty_editor_output_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.sealed");
        let pair = KeyPair::generate(&mut StdRng::seed_from_u64(6));
        let original = envelope::seal(&pair.public, b"keep me").unwrap();
        std::fs::write(&path, &original).unwrap();

        let session = EditSession::with_private_key("alice", pair.private.clone());
        let mut editor = |_: &[u8]| -> Result<Vec<u8>> { Ok(Vec::new()) };
        let outcome = session.edit_existing(&path, &mut editor).unwrap();

        assert_eq!(outcome, EditOutcome::Unchanged { path: path.clone() });
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_lost_separator_is_fatal_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new.sealed");
        let pair = KeyPair::generate(&mut StdRng::seed_from_u64(7));
        let session = EditSession::with_public_key("alice", pair.public.clone());

        let mut editor = |_: &[u8]| -> Result<Vec<u8>> { Ok(b"just text\n".to_vec()) };
        let result = session.edit_existing(&path, &mut editor);

        assert!(matches!(result, Err(SealError::MissingSeparator)));
        assert!(!path.exists());
    }

    #[test]
    fn test_existing_file_needs_private_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.sealed");
        let pair = KeyPair::generate(&mut StdRng::seed_from_u64(8));
        std::fs::write(&path, envelope::seal(&pair.public, b"x").unwrap()).unwrap();

        let session = EditSession::with_public_key("alice", pair.public.clone());
        assert!(matches!(
            session.current_plaintext(&path),
            Err(SealError::PrivateKeyRequired { .. })
        ));
    }

    #[test]
    fn test_editor_failure_propagates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new.sealed");
        let pair = KeyPair::generate(&mut StdRng::seed_from_u64(9));
        let session = EditSession::with_public_key("alice", pair.public.clone());

        let mut editor =
            |_: &[u8]| -> Result<Vec<u8>> { Err(SealError::Editor("exit status 1".to_string())) };
        assert!(matches!(
            session.edit(&path, b"", &mut editor),
            Err(SealError::Editor(_))
        ));
        assert!(!path.exists());
    }
}
