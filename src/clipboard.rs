// src/clipboard.rs
//! Access to the external OS clipboard.

use arboard::Clipboard;

use crate::error::Result;

/// Read/write seam over the system clipboard.
///
/// The watch loop and the one-shot commands are written against this trait
/// so tests can drive them with a scripted clipboard.
pub trait ClipboardProvider {
    fn read(&mut self) -> Result<String>;
    fn write(&mut self, text: &str) -> Result<()>;
}

/// The real OS clipboard, backed by `arboard`.
pub struct SystemClipboard {
    inner: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: Clipboard::new()?,
        })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn read(&mut self) -> Result<String> {
        Ok(self.inner.get_text()?)
    }

    fn write(&mut self, text: &str) -> Result<()> {
        Ok(self.inner.set_text(text)?)
    }
}
