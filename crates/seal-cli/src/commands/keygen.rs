use std::io::IsTerminal;

use dialoguer::Confirm;

use crate::app::AppContext;
use crate::cli::KeygenArgs;
use crate::config::non_empty_env;
use crate::errors::CliError;
use crate::prompt::new_passphrase;

/// Create `<name>.publickey` and `<name>.privatekey` in the key directory.
pub fn handle_keygen(ctx: &AppContext, args: &KeygenArgs) -> anyhow::Result<()> {
    let name = match args.name.as_deref().filter(|v| !v.trim().is_empty()) {
        Some(name) => name.to_string(),
        None => non_empty_env("USER").ok_or_else(|| {
            CliError::invalid_input("No key name given and USER is not set. Pass --name.")
        })?,
    };

    let store = ctx.key_store()?;
    let existing: Vec<_> = [store.private_key_path(&name), store.public_key_path(&name)]
        .into_iter()
        .filter(|path| path.exists())
        .collect();

    let mut overwrite = args.force;
    if !existing.is_empty() && !overwrite && std::io::stdin().is_terminal() {
        for path in &existing {
            eprintln!("{} already exists.", path.display());
        }
        let confirmed = Confirm::new()
            .with_prompt("Overwrite")
            .default(false)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))?;
        if !confirmed {
            return Err(CliError::invalid_input("Key generation cancelled").into());
        }
        overwrite = true;
    }

    let passphrase = new_passphrase(&name)?;
    let generated = store.generate(&name, &passphrase, overwrite)?;

    if !ctx.quiet() {
        if generated.created_dir {
            println!("Created directory {}", store.dir().display());
        }
        println!("Wrote public key: {}", generated.public_path.display());
        println!("Wrote private key: {}", generated.private_path.display());
    }
    Ok(())
}
