use anyhow::{Context, Result};
use arboard::Clipboard;

/// Put `text` on the system clipboard.
pub fn copy_text(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("failed to open the system clipboard")?;
    clipboard
        .set_text(text.to_string())
        .context("failed to copy text to the clipboard")?;
    Ok(())
}
