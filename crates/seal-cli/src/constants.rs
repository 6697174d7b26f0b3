//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Key file not found or not uniquely identified.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input, malformed key files.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong passphrase from SEAL_PASSPHRASE).
    pub const AUTH_FAILED: i32 = 5;

    /// Ciphertext could not be opened, or the edit buffer lost its separator.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Environment variables read by the CLI.
pub mod env {
    /// Key directory override.
    pub const KEY_DIR: &str = "SEAL_DIR";

    /// Passphrase used once instead of prompting.
    pub const PASSPHRASE: &str = "SEAL_PASSPHRASE";

    /// Editor command run through `sh -c` in pipe mode.
    pub const EDITOR: &str = "SEAL_EDITOR";

    /// Config file override.
    pub const CONFIG: &str = "SEAL_CONFIG";

    /// Log filter for tracing-subscriber.
    pub const LOG: &str = "SEAL_LOG";
}

/// Default key directory name under $HOME.
pub const DEFAULT_KEY_DIR: &str = ".seal";

/// Extension appended by `seal encrypt`.
pub const SEALED_EXTENSION: &str = "sealed";

/// Default clipboard lifetime for `seal pw`.
pub const DEFAULT_CLIPBOARD_SECONDS: u64 = 10;
