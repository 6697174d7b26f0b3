//! Password generation and password-file helpers.
//!
//! Passwords are drawn uniformly from a charset by rejection sampling over
//! random bytes: with `m = 256 mod n`, byte values `>= 256 - m` are dropped,
//! which leaves every symbol exactly `(256 - m) / n` preimages.

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{Result, SealError};

/// Letters and digits, for the long password.
pub const LONG_CHARSET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Lowercase letters and digits, for the short password.
pub const SHORT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

pub const LONG_LENGTH: usize = 32;
pub const SHORT_LENGTH: usize = 16;

/// Prefix of the line whose value is copied to the clipboard.
pub const CLIPBOARD_PREFIX: &str = "clipboard: ";

const BATCH: usize = 256;

/// Generate a password from the OS random source.
pub fn generate(charset: &[char], length: usize) -> Result<Zeroizing<String>> {
    generate_password(&mut OsRng, charset, length)
}

/// Generate `length` symbols from `charset` without modulo bias.
///
/// The charset must be non-empty, hold at most 256 symbols and contain no
/// duplicates.
pub fn generate_password<R>(rng: &mut R, charset: &[char], length: usize) -> Result<Zeroizing<String>>
where
    R: RngCore + ?Sized,
{
    validate_charset(charset)?;

    let n = charset.len();
    let limit = 256 - (256 % n);
    let mut buf = Zeroizing::new([0u8; BATCH]);
    let mut password = Zeroizing::new(String::with_capacity(length));
    let mut accepted = 0;

    while accepted < length {
        rng.fill_bytes(buf.as_mut_slice());
        for &byte in buf.iter() {
            if accepted == length {
                break;
            }
            let value = byte as usize;
            if value < limit {
                password.push(charset[value % n]);
                accepted += 1;
            }
        }
    }
    Ok(password)
}

fn validate_charset(charset: &[char]) -> Result<()> {
    if charset.is_empty() {
        return Err(SealError::InvalidInput("Charset cannot be empty".to_string()));
    }
    if charset.len() > 256 {
        return Err(SealError::InvalidInput(format!(
            "Charset has {} symbols; at most 256 are supported",
            charset.len()
        )));
    }
    let mut sorted = charset.to_vec();
    sorted.sort_unstable();
    if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(SealError::InvalidInput(
            "Charset contains duplicate symbols".to_string(),
        ));
    }
    Ok(())
}

/// Body offered in the editor when creating a new password file.
pub fn new_secret_scaffold<R>(rng: &mut R) -> Result<Zeroizing<String>>
where
    R: RngCore + ?Sized,
{
    let short_charset: Vec<char> = SHORT_CHARSET.chars().collect();
    let long_charset: Vec<char> = LONG_CHARSET.chars().collect();
    let short = generate_password(rng, &short_charset, SHORT_LENGTH)?;
    let long = generate_password(rng, &long_charset, LONG_LENGTH)?;

    Ok(Zeroizing::new(format!(
        "url:\nusername:\n# Uncomment one of the following randomly generated passwords.\n# {prefix}{}\n# {prefix}{}\n",
        short.as_str(),
        long.as_str(),
        prefix = CLIPBOARD_PREFIX
    )))
}

/// A decrypted password file split for display.
#[derive(Debug, Default)]
pub struct SecretView {
    /// Every line except the clipboard line, newline-terminated.
    pub display: Zeroizing<String>,
    /// Value of the first `clipboard: ` line, trimmed.
    pub clipboard: Option<Zeroizing<String>>,
}

impl SecretView {
    pub fn parse(message: &[u8]) -> Self {
        let text = Zeroizing::new(String::from_utf8_lossy(message).into_owned());
        let mut view = SecretView::default();
        for line in text.lines() {
            match line.strip_prefix(CLIPBOARD_PREFIX) {
                Some(value) if view.clipboard.is_none() => {
                    view.clipboard = Some(Zeroizing::new(value.trim().to_string()));
                }
                _ => {
                    view.display.push_str(line);
                    view.display.push('\n');
                }
            }
        }
        view
    }
}
