use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use seal_core::VERSION;

/// Seal - encrypt files to your own public key, then read and edit them
#[derive(Parser)]
#[command(name = "seal")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Key name, or path to a .publickey/.privatekey file
    #[arg(short, long, global = true, env = "SEAL_KEY")]
    pub key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// One or more files to operate on
#[derive(Args)]
pub struct FilesArgs {
    #[arg(value_name = "FILE", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the `keygen` command
#[derive(Args)]
pub struct KeygenArgs {
    /// Key name (defaults to $USER)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Overwrite existing key files without asking
    #[arg(long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt each FILE to FILE.sealed
    Encrypt(FilesArgs),

    /// Decrypt files to stdout
    Cat(FilesArgs),

    /// Decrypt, edit and re-encrypt files (missing files are created)
    Edit(FilesArgs),

    /// Show a password file and copy its password, or create a new one
    Pw(FilesArgs),

    /// Generate a new keypair in the key directory
    Keygen(KeygenArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
