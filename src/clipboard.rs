use anyhow::{Context, Result};
#[cfg(not(target_os = "linux"))]
use arboard::Clipboard;

/// Hidden argument that turns the binary into a clipboard owner process.
pub const DAEMON_FLAG: &str = "__feed_llm_clipboard_daemon";

// X11/Wayland selections die with their owner, so on Linux a detached child
// holds the text until something else takes the clipboard.
#[cfg(target_os = "linux")]
fn run_daemon_mode() -> Result<()> {
    use arboard::{Clipboard, SetExtLinux};

    let text = std::io::read_to_string(std::io::stdin())?;
    let mut clipboard = Clipboard::new()?;
    clipboard.set().wait().text(text)?;
    Ok(())
}

/// Runs the clipboard daemon when [`DAEMON_FLAG`] is present.
/// Returns `Ok(true)` if it did, in which case the caller should exit.
pub fn check_and_run_daemon_if_requested() -> Result<bool> {
    if !std::env::args().any(|a| a == DAEMON_FLAG) {
        return Ok(false);
    }

    #[cfg(target_os = "linux")]
    run_daemon_mode()?;

    #[cfg(not(target_os = "linux"))]
    tracing::warn!(event = "clipboard.daemon.unsupported", flag = DAEMON_FLAG);

    Ok(true)
}

pub fn copy_text_to_clipboard(text: &str) -> Result<()> {
    #[cfg(not(target_os = "linux"))]
    {
        let mut clipboard = Clipboard::new().context("clipboard unavailable")?;
        clipboard.set_text(text.to_owned())?;
    }

    #[cfg(target_os = "linux")]
    {
        use std::io::Write;
        use std::process::{Command, Stdio};

        if std::env::var_os("DISPLAY").is_none() && std::env::var_os("WAYLAND_DISPLAY").is_none() {
            anyhow::bail!("no X11 or Wayland display available");
        }

        let mut child = Command::new(std::env::current_exe()?)
            .arg(DAEMON_FLAG)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .current_dir("/")
            .spawn()
            .context("failed to spawn clipboard daemon")?;

        let mut stdin = child
            .stdin
            .take()
            .context("failed to get stdin for clipboard daemon")?;
        stdin.write_all(text.as_bytes())?;
        stdin.flush()?;
    }

    tracing::debug!(event = "clipboard.copy.completed", bytes = text.len());
    Ok(())
}
