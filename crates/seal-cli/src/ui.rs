//! Terminal output helpers.
//!
//! Status lines and errors go to stderr so stdout carries only decrypted
//! content.

use std::io::IsTerminal;

use owo_colors::OwoColorize;

/// Terminal facts that decide how messages are rendered.
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    /// Whether stderr is a TTY
    pub is_tty: bool,
    /// Whether color output is enabled
    pub color: bool,
}

impl UiContext {
    pub fn from_env() -> Self {
        let is_tty = std::io::stderr().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        Self {
            is_tty,
            color: is_tty && !no_color_env && !term_is_dumb,
        }
    }
}

pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let label = if ctx.color {
        "Error:".red().bold().to_string()
    } else {
        "Error:".to_string()
    };
    let mut text = format!("{} {}", label, message);
    if let Some(hint) = error_hint {
        text.push('\n');
        if ctx.color {
            text.push_str(&hint.dimmed().to_string());
        } else {
            text.push_str(hint);
        }
    }
    text
}

/// Print an error message to stderr with optional hint.
pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}

/// Print a warning to stderr.
pub fn print_warning(ctx: &UiContext, message: &str) {
    if ctx.color {
        eprintln!("{} {}", "Warning:".yellow().bold(), message);
    } else {
        eprintln!("Warning: {}", message);
    }
}

/// Print a status line to stderr unless quiet.
pub fn print_status(ctx: &UiContext, quiet: bool, message: &str) {
    if quiet {
        return;
    }
    if ctx.color {
        eprintln!("{}", message.green());
    } else {
        eprintln!("{}", message);
    }
}
