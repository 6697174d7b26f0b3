//! Application context for the Seal CLI.
//!
//! Provides a unified context that combines CLI arguments with the
//! lazily-loaded config file.

use std::time::Duration;

use once_cell::unsync::OnceCell;

use seal_core::KeyStore;

use crate::cli::Cli;
use crate::config::{load_config, resolve_key_dir, SealConfig};
use crate::editor::ExternalEditor;
use crate::prompt::TerminalPrompt;
use crate::ui::UiContext;

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<SealConfig>,
    ui: UiContext,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
            ui: UiContext::from_env(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn ui(&self) -> &UiContext {
        &self.ui
    }

    /// The `--key` / `SEAL_KEY` hint, if given.
    pub fn key_hint(&self) -> Option<&str> {
        self.cli.key.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Get the configuration, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&SealConfig> {
        self.config.get_or_try_init(load_config)
    }

    /// Key store rooted at the resolved key directory.
    pub fn key_store(&self) -> anyhow::Result<KeyStore> {
        let dir = resolve_key_dir(self.config()?)?;
        tracing::debug!(dir = %dir.display(), "key directory");
        Ok(KeyStore::new(dir))
    }

    pub fn editor(&self) -> anyhow::Result<ExternalEditor> {
        Ok(ExternalEditor::resolve(&self.config()?.editor))
    }

    pub fn prompt(&self) -> TerminalPrompt {
        TerminalPrompt::from_env()
    }

    /// How long `seal pw` leaves a password on the clipboard.
    pub fn clipboard_duration(&self) -> anyhow::Result<Duration> {
        Ok(Duration::from_secs(
            self.config()?.clipboard.clear_after_seconds,
        ))
    }
}
