use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;

use crate::app::AppContext;

/// Decrypt each file to stdout; the first failure aborts.
pub fn handle_cat(ctx: &AppContext, files: &[PathBuf]) -> anyhow::Result<()> {
    let store = ctx.key_store()?;
    let mut prompt = ctx.prompt();
    let identity = store.unlock(ctx.key_hint(), &mut prompt)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for file in files {
        let sealed =
            std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
        let message = seal_core::open(&identity.key, &sealed)
            .with_context(|| format!("Error decrypting {}", file.display()))?;
        out.write_all(&message)?;
    }
    out.flush()?;
    Ok(())
}
