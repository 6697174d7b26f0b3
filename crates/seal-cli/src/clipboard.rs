//! Temporary clipboard copies through the platform's clipboard tools.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use zeroize::Zeroizing;

use crate::ui::{self, UiContext};

/// A pair of commands that write and read the clipboard.
#[derive(Debug, Clone, Copy)]
struct Backend {
    copy: &'static [&'static str],
    paste: &'static [&'static str],
}

const BACKENDS: &[Backend] = &[
    Backend {
        copy: &["pbcopy"],
        paste: &["pbpaste"],
    },
    Backend {
        copy: &["wl-copy"],
        paste: &["wl-paste", "--no-newline"],
    },
    Backend {
        copy: &["xclip", "-selection", "clipboard", "-in"],
        paste: &["xclip", "-selection", "clipboard", "-out"],
    },
    Backend {
        copy: &["xsel", "--clipboard", "--input"],
        paste: &["xsel", "--clipboard", "--output"],
    },
];

impl Backend {
    fn set(&self, data: &[u8]) -> std::io::Result<()> {
        let (program, args) = split(self.copy);
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(data)?;
        }
        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::other(format!("{} exited with {}", program, status)))
        }
    }

    fn get(&self) -> std::io::Result<Zeroizing<Vec<u8>>> {
        let (program, args) = split(self.paste);
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;
        if !output.status.success() {
            return Err(std::io::Error::other(format!(
                "{} exited with {}",
                program, output.status
            )));
        }
        Ok(Zeroizing::new(output.stdout))
    }
}

fn split(command: &'static [&'static str]) -> (&'static str, &'static [&'static str]) {
    match command.split_first() {
        Some((program, args)) => (program, args),
        None => ("", &[]),
    }
}

/// Copy `value` to the clipboard, wait `duration`, then clear it if it
/// still holds `value`.
///
/// Returns `Ok(false)` when no clipboard tool is available.
pub fn copy_temporarily(
    ctx: &UiContext,
    value: &str,
    duration: Duration,
    quiet: bool,
) -> anyhow::Result<bool> {
    let Some(backend) = BACKENDS.iter().find(|backend| match backend.set(value.as_bytes()) {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(tool = backend.copy[0], error = %err, "clipboard tool unavailable");
            false
        }
    }) else {
        return Ok(false);
    };

    ui::print_status(
        ctx,
        quiet,
        &format!(
            "Password copied to clipboard for {} seconds.",
            duration.as_secs()
        ),
    );
    countdown(ctx, duration, quiet);

    match backend.get() {
        Ok(current) if current.as_slice() == value.as_bytes() => {
            backend
                .set(b"")
                .map_err(|e| anyhow::anyhow!("Failed to clear clipboard: {}", e))?;
            tracing::debug!("clipboard cleared");
        }
        Ok(_) => {
            tracing::debug!("clipboard changed since copy; leaving it alone");
        }
        Err(err) => {
            ui::print_warning(ctx, &format!("Could not read clipboard to clear it: {}", err));
        }
    }
    Ok(true)
}

fn countdown(ctx: &UiContext, duration: Duration, quiet: bool) {
    let seconds = duration.as_secs();
    if quiet || !ctx.is_tty {
        std::thread::sleep(duration);
        return;
    }

    let bar = ProgressBar::new(seconds);
    if let Ok(style) = ProgressStyle::default_bar().template("{msg} {bar:20} {pos}/{len}s") {
        bar.set_style(style);
    }
    bar.set_message("Clearing clipboard");
    for _ in 0..seconds {
        std::thread::sleep(Duration::from_secs(1));
        bar.inc(1);
    }
    std::thread::sleep(duration - Duration::from_secs(seconds));
    bar.finish_and_clear();
}
