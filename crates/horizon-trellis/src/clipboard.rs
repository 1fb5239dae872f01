//! Clipboard access for copy/paste in text widgets.
//!
//! The widget tree talks to a [`Clipboard`] trait object. [`MemoryClipboard`]
//! keeps the text in process and is the default; [`SystemClipboard`] wraps the
//! `arboard` crate and is available with the `system-clipboard` feature.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::clipboard::{Clipboard, MemoryClipboard};
//!
//! let mut clipboard = MemoryClipboard::new();
//! clipboard.set_text("Hello, world!").unwrap();
//! assert_eq!(clipboard.get_text().unwrap(), "Hello, world!");
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Error type for clipboard operations.
#[derive(Debug)]
pub struct ClipboardError {
    message: String,
}

impl ClipboardError {
    /// Create an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clipboard error: {}", self.message)
    }
}

impl std::error::Error for ClipboardError {}

/// Text clipboard used by copy, cut and paste.
pub trait Clipboard {
    /// Get the current text content.
    fn get_text(&mut self) -> Result<String, ClipboardError>;

    /// Replace the text content.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard.
///
/// Clones share the same storage, so two GUI instances created with clones
/// of one `MemoryClipboard` can copy and paste between each other.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Arc<Mutex<String>>,
}

impl MemoryClipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        Ok(self.text.lock().clone())
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        *self.text.lock() = text.to_string();
        Ok(())
    }
}

/// The platform clipboard.
///
/// Windows uses the Win32 clipboard API, macOS uses NSPasteboard and Linux
/// uses X11 selections or the Wayland data-control protocol.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    /// Open the system clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard is unavailable or locked by another
    /// process.
    pub fn new() -> Result<Self, ClipboardError> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

#[cfg(feature = "system-clipboard")]
impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.inner.get_text().map_err(Into::into)
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner.set_text(text).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_clones_share_text() {
        let mut a = MemoryClipboard::new();
        let mut b = a.clone();
        assert_eq!(b.get_text().unwrap(), "");
        a.set_text("copied").unwrap();
        assert_eq!(b.get_text().unwrap(), "copied");
    }
}
