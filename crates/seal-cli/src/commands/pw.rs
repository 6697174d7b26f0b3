use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::rngs::OsRng;

use seal_core::password::{new_secret_scaffold, SecretView};
use seal_core::EditSession;

use crate::app::AppContext;
use crate::clipboard;
use crate::commands::edit::report_outcome;
use crate::errors::CliError;
use crate::ui;

/// One existing file: show it. One missing file: create it. Several: batch read.
pub fn handle_pw(ctx: &AppContext, files: &[PathBuf]) -> anyhow::Result<()> {
    if let [file] = files {
        return match std::fs::metadata(file) {
            Ok(_) => read_password(ctx, file),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => create_password(ctx, file),
            Err(err) => Err(anyhow::anyhow!("Failed to inspect {}: {}", file.display(), err)),
        };
    }
    read_batch(ctx, files)
}

fn read_password(ctx: &AppContext, file: &Path) -> anyhow::Result<()> {
    let store = ctx.key_store()?;
    let mut prompt = ctx.prompt();
    let identity = store.unlock(ctx.key_hint(), &mut prompt)?;

    let sealed =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let message = seal_core::open(&identity.key, &sealed)
        .with_context(|| format!("Error decrypting {}", file.display()))?;
    let view = SecretView::parse(&message);

    {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        out.write_all(view.display.as_bytes())?;
        out.flush()?;
    }

    if let Some(value) = view.clipboard.as_deref() {
        let copied =
            clipboard::copy_temporarily(ctx.ui(), value, ctx.clipboard_duration()?, ctx.quiet())?;
        if !copied {
            ui::print_warning(
                ctx.ui(),
                "No clipboard tool found (pbcopy, wl-copy, xclip, xsel); password not copied.",
            );
        }
    }
    Ok(())
}

fn create_password(ctx: &AppContext, file: &Path) -> anyhow::Result<()> {
    let store = ctx.key_store()?;
    let mut prompt = ctx.prompt();
    let identity = store.read_public_key(ctx.key_hint(), &mut prompt)?;
    let session = EditSession::with_public_key(identity.name, identity.key);

    let scaffold = new_secret_scaffold(&mut OsRng)?;
    let mut editor = ctx.editor()?;
    let outcome = session
        .edit(file, scaffold.as_bytes(), &mut editor)
        .with_context(|| format!("Error editing {}", file.display()))?;
    report_outcome(ctx, &outcome, session.key_name());
    Ok(())
}

/// Decrypt every file like `cat`, one blank line before each; failures are
/// reported and skipped.
fn read_batch(ctx: &AppContext, files: &[PathBuf]) -> anyhow::Result<()> {
    let store = ctx.key_store()?;
    let mut prompt = ctx.prompt();
    let identity = store.unlock(ctx.key_hint(), &mut prompt)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut failed = 0usize;
    for file in files {
        let result = std::fs::read(file)
            .with_context(|| format!("Failed to read {}", file.display()))
            .and_then(|sealed| {
                seal_core::open(&identity.key, &sealed)
                    .with_context(|| format!("Error decrypting {}", file.display()))
            });
        match result {
            Ok(message) => {
                out.write_all(b"\n")?;
                out.write_all(&message)?;
            }
            Err(err) => {
                failed += 1;
                tracing::debug!(file = %file.display(), "skipping unreadable file");
                out.flush()?;
                ui::print_error(ctx.ui(), &format!("{:#}", err), None);
            }
        }
    }
    out.flush()?;

    if failed > 0 {
        return Err(CliError::integrity_failed(format!(
            "{} of {} files could not be decrypted",
            failed,
            files.len()
        ))
        .into());
    }
    Ok(())
}
