//! Seal CLI - encrypt files to your own public key, then read and edit them
//!
//! This is the command-line interface for Seal. It resolves keys, editors and
//! passphrases from the environment and hands them to the core library.

mod app;
mod cli;
mod clipboard;
mod commands;
mod config;
mod constants;
mod editor;
mod errors;
mod prompt;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{cat, edit, encrypt, keygen, misc, pw};
use crate::constants::env;
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    init_logging();
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let (code, hint) = errors::classify(&e);
        print_error(ctx.ui(), &format!("{:#}", e), hint.as_deref());
        std::process::exit(code);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(env::LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Encrypt(args) => encrypt::handle_encrypt(ctx, &args.files),
        Commands::Cat(args) => cat::handle_cat(ctx, &args.files),
        Commands::Edit(args) => edit::handle_edit(ctx, &args.files),
        Commands::Pw(args) => pw::handle_pw(ctx, &args.files),
        Commands::Keygen(args) => keygen::handle_keygen(ctx, args),
        Commands::Completions { shell } => misc::handle_completions(*shell),
    }
}
