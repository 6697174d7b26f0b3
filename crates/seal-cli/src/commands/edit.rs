use std::path::PathBuf;

use anyhow::Context;

use seal_core::{EditOutcome, EditSession};

use crate::app::AppContext;
use crate::ui;

/// Decrypt, edit and re-seal each file. Missing files start empty.
pub fn handle_edit(ctx: &AppContext, files: &[PathBuf]) -> anyhow::Result<()> {
    let store = ctx.key_store()?;
    let mut prompt = ctx.prompt();
    let session = EditSession::for_targets(&store, ctx.key_hint(), files, &mut prompt)?;
    let mut editor = ctx.editor()?;

    for file in files {
        let outcome = session
            .edit_existing(file, &mut editor)
            .with_context(|| format!("Error editing {}", file.display()))?;
        report_outcome(ctx, &outcome, session.key_name());
    }
    Ok(())
}

/// Status line for one edit round trip.
pub fn report_outcome(ctx: &AppContext, outcome: &EditOutcome, key_name: &str) {
    let message = match outcome {
        EditOutcome::Written { path } => format!(
            "Wrote {} (encrypted with key {})",
            path.display(),
            key_name
        ),
        EditOutcome::Unchanged { path } => {
            format!("Did not modify {} (quit without save)", path.display())
        }
    };
    ui::print_status(ctx.ui(), ctx.quiet(), &message);
}
