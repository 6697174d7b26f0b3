//! Running the user's editor on an edit buffer.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use zeroize::Zeroizing;

use seal_core::{Editor, SealError};

use crate::config::{non_empty_env, EditorMode, EditorSection};
use crate::constants::env;

const FALLBACK_EDITOR: &str = "vi";

/// An editor command run through `sh -c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEditor {
    command: String,
    mode: EditorMode,
}

impl ExternalEditor {
    pub fn new(command: impl Into<String>, mode: EditorMode) -> Self {
        Self {
            command: command.into(),
            mode,
        }
    }

    /// `SEAL_EDITOR` (pipe) > config > `$VISUAL` > `$EDITOR` > `vi`.
    pub fn resolve(config: &EditorSection) -> Self {
        Self::resolve_from(
            non_empty_env(env::EDITOR),
            config,
            non_empty_env("VISUAL"),
            non_empty_env("EDITOR"),
        )
    }

    fn resolve_from(
        seal_editor: Option<String>,
        config: &EditorSection,
        visual: Option<String>,
        editor: Option<String>,
    ) -> Self {
        if let Some(command) = seal_editor {
            return Self::new(command, EditorMode::Pipe);
        }
        if let Some(command) = config.command.as_deref().filter(|c| !c.trim().is_empty()) {
            return Self::new(command, config.mode);
        }
        let command = visual
            .or(editor)
            .unwrap_or_else(|| FALLBACK_EDITOR.to_string());
        Self::new(command, EditorMode::File)
    }

    fn run_pipe(&self, buffer: &[u8]) -> seal_core::Result<Vec<u8>> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| SealError::Editor(format!("Failed to launch `{}`: {}", self.command, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SealError::Editor("Editor stdin unavailable".to_string()))?;
        let input = Zeroizing::new(buffer.to_vec());
        // Feed stdin from a second thread so a large buffer cannot deadlock
        // against the editor filling its stdout pipe.
        let writer = std::thread::spawn(move || {
            let result = stdin.write_all(&input);
            drop(stdin);
            result
        });

        let output = child.wait_with_output()?;
        match writer.join() {
            Ok(Ok(())) => {}
            // The command exited without reading everything.
            Ok(Err(err)) if err.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(err)) => return Err(err.into()),
            Err(_) => return Err(SealError::Editor("Editor stdin writer panicked".to_string())),
        }

        if !output.status.success() {
            return Err(SealError::Editor(format!(
                "`{}` exited with {}",
                self.command, output.status
            )));
        }
        Ok(output.stdout)
    }

    fn run_file(&self, buffer: &[u8]) -> seal_core::Result<Vec<u8>> {
        let path = temp_buffer_path()?;
        let result = self.edit_file(&path, buffer);
        if let Err(err) = std::fs::remove_file(&path) {
            tracing::warn!(path = %path.display(), error = %err, "failed to remove edit buffer");
        }
        result
    }

    fn edit_file(&self, path: &Path, buffer: &[u8]) -> seal_core::Result<Vec<u8>> {
        write_private(path, buffer)?;

        let status = Command::new("sh")
            .arg("-c")
            .arg(format!("{} \"$@\"", self.command))
            .arg("sh")
            .arg(path)
            .status()
            .map_err(|e| SealError::Editor(format!("Failed to launch `{}`: {}", self.command, e)))?;
        if !status.success() {
            return Err(SealError::Editor(format!(
                "`{}` exited with {}",
                self.command, status
            )));
        }

        let edited = std::fs::read(path)?;
        if edited == buffer {
            // Saved nothing: treat as quit without save.
            return Ok(Vec::new());
        }
        Ok(edited)
    }
}

impl Editor for ExternalEditor {
    fn edit(&mut self, buffer: &[u8]) -> seal_core::Result<Vec<u8>> {
        tracing::debug!(command = %self.command, mode = ?self.mode, "running editor");
        match self.mode {
            EditorMode::Pipe => self.run_pipe(buffer),
            EditorMode::File => self.run_file(buffer),
        }
    }
}

fn temp_buffer_path() -> seal_core::Result<PathBuf> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| SealError::Editor(format!("System time error: {}", e)))?
        .as_nanos();
    let filename = format!("seal_edit_{}_{}.txt", std::process::id(), nanos);
    Ok(std::env::temp_dir().join(filename))
}

fn write_private(path: &Path, data: &[u8]) -> seal_core::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}
