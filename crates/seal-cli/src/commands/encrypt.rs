use std::path::{Path, PathBuf};

use anyhow::Context;
use zeroize::Zeroizing;

use seal_core::fs::write_atomic;

use crate::app::AppContext;
use crate::constants::SEALED_EXTENSION;

/// Seal each file to `<file>.sealed` with the public key.
pub fn handle_encrypt(ctx: &AppContext, files: &[PathBuf]) -> anyhow::Result<()> {
    let store = ctx.key_store()?;
    let mut prompt = ctx.prompt();
    let identity = store.read_public_key(ctx.key_hint(), &mut prompt)?;

    for file in files {
        let message = Zeroizing::new(
            std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?,
        );
        let sealed = seal_core::seal(&identity.key, &message)?;
        let target = sealed_path(file);
        write_atomic(&target, sealed.as_bytes())?;
        if !ctx.quiet() {
            println!(
                "Wrote {} (encrypted with key {})",
                target.display(),
                identity.name
            );
        }
    }
    Ok(())
}

fn sealed_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(SEALED_EXTENSION);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sealed_path_appends_extension() {
        assert_eq!(
            sealed_path(Path::new("notes.txt")),
            PathBuf::from("notes.txt.sealed")
        );
        assert_eq!(
            sealed_path(Path::new("/tmp/dir/file")),
            PathBuf::from("/tmp/dir/file.sealed")
        );
    }
}
