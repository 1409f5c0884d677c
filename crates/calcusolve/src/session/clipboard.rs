//! Clipboard access for copying the display

use thiserror::Error;

/// Clipboard write failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Clipboard error: {0}")]
pub struct ClipboardError(pub String);

/// Destination for copied display text
pub trait Clipboard: std::fmt::Debug {
    /// Replaces the clipboard contents with `text`
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard kept in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
    unavailable: bool,
}

impl MemoryClipboard {
    /// Creates an empty clipboard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clipboard that rejects every write
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            contents: None,
            unavailable: true,
        }
    }

    /// Last copied text
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.unavailable {
            return Err(ClipboardError("clipboard unavailable".into()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// The operating system clipboard
#[cfg(feature = "system-clipboard")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| ClipboardError(format!("Failed to access clipboard: {e}")))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError(format!("Failed to copy to clipboard: {e}")))
    }
}
