//! Key file resolution.

use std::path::{Path, PathBuf};

use crate::error::{Result, SealError};

/// Extension of public key files.
pub const PUBLIC_EXTENSION: &str = ".publickey";

/// Extension of passphrase-wrapped private key files.
pub const PRIVATE_EXTENSION: &str = ".privatekey";

/// Resolve a key hint to exactly one existing file.
///
/// - empty hint: the single `*<extension>` file in `dir`
/// - existing path: used as-is
/// - missing absolute path: `KeyFileNotFound`
/// - anything else: `dir/<hint><extension>`, or `KeyNotFound` naming both tries
pub fn find_key_file(dir: &Path, hint: Option<&str>, extension: &str) -> Result<PathBuf> {
    let hint = match hint.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return find_unique(dir, extension),
    };

    let literal = PathBuf::from(hint);
    if literal.exists() {
        return Ok(literal);
    }
    if literal.is_absolute() {
        return Err(SealError::KeyFileNotFound { path: literal });
    }

    let guess = dir.join(with_extension(hint, extension));
    if guess.exists() {
        return Ok(guess);
    }
    Err(SealError::KeyNotFound { literal, guess })
}

/// Strip `extension` from the file name to get the identity label.
pub fn key_name(path: &Path, extension: &str) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.strip_suffix(extension) {
        Some(stem) => stem.to_string(),
        None => file_name,
    }
}

fn find_unique(dir: &Path, extension: &str) -> Result<PathBuf> {
    let mut matches = list_with_extension(dir, extension)?;
    match matches.len() {
        0 => Err(SealError::NoKeysFound {
            dir: dir.to_path_buf(),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(SealError::AmbiguousKeys { matches }),
    }
}

fn list_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.len() > extension.len() && name.ends_with(extension) {
            matches.push(entry.path());
        }
    }
    matches.sort();
    Ok(matches)
}

fn with_extension(path: &str, extension: &str) -> String {
    if path.ends_with(extension) {
        path.to_string()
    } else {
        format!("{}{}", path, extension)
    }
}
