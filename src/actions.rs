use anyhow::{Context, Result};

// Fire-and-forget external actions. Callers report a one-line status and
// never retry.

pub fn open_url(url: &str) -> Result<()> {
    open::that(url).with_context(|| format!("Failed to open {url}"))
}

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
    clipboard
        .set_text(text.to_string())
        .context("Failed to write to clipboard")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires a desktop clipboard
    fn test_clipboard_roundtrip() {
        copy_to_clipboard("jobtrack test").unwrap();
        let mut clipboard = arboard::Clipboard::new().unwrap();
        assert_eq!(clipboard.get_text().unwrap(), "jobtrack test");
    }
}
