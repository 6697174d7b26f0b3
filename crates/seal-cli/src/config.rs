use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{env, DEFAULT_CLIPBOARD_SECONDS, DEFAULT_KEY_DIR};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SealConfig {
    #[serde(default)]
    pub keys: KeysSection,
    #[serde(default)]
    pub editor: EditorSection,
    #[serde(default)]
    pub clipboard: ClipboardSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct KeysSection {
    pub dir: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EditorSection {
    pub command: Option<String>,
    #[serde(default)]
    pub mode: EditorMode,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClipboardSection {
    #[serde(default = "default_clear_after_seconds")]
    pub clear_after_seconds: u64,
}

impl Default for ClipboardSection {
    fn default() -> Self {
        Self {
            clear_after_seconds: DEFAULT_CLIPBOARD_SECONDS,
        }
    }
}

fn default_clear_after_seconds() -> u64 {
    DEFAULT_CLIPBOARD_SECONDS
}

/// How the editor command receives the buffer.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EditorMode {
    /// Buffer on stdin, result on stdout.
    Pipe,
    /// Buffer in a temp file passed as the last argument.
    #[default]
    File,
}

/// `$SEAL_CONFIG`, else the XDG location.
pub fn config_path() -> anyhow::Result<PathBuf> {
    if let Some(value) = non_empty_env(env::CONFIG) {
        return Ok(PathBuf::from(value));
    }
    Ok(xdg_config_dir()?.join("config.toml"))
}

/// Load the config file; a missing file yields the defaults.
pub fn load_config() -> anyhow::Result<SealConfig> {
    let path = config_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(SealConfig::default());
    }
    read_config(&path)
}

pub fn read_config(path: &Path) -> anyhow::Result<SealConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Key directory: `$SEAL_DIR` > `[keys].dir` > `~/.seal`.
pub fn resolve_key_dir(config: &SealConfig) -> anyhow::Result<PathBuf> {
    let home = home_dir()?;
    Ok(key_dir_from(
        non_empty_env(env::KEY_DIR),
        config.keys.dir.as_deref(),
        &home,
    ))
}

fn key_dir_from(env_value: Option<String>, configured: Option<&str>, home: &Path) -> PathBuf {
    if let Some(value) = env_value {
        return expand_tilde(&value, home);
    }
    match configured.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => expand_tilde(value, home),
        None => home.join(DEFAULT_KEY_DIR),
    }
}

pub fn expand_tilde(value: &str, home: &Path) -> PathBuf {
    if value == "~" {
        return home.to_path_buf();
    }
    match value.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(value),
    }
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Some(value) = non_empty_env("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(value).join("seal"));
    }
    Ok(home_dir()?.join(".config").join("seal"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

pub fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
