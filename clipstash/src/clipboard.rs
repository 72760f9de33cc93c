//! OS clipboard access behind a small trait, so the watcher can run against
//! a scripted clipboard in tests and arboard in production.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard access failed: {0}")]
    Access(String),
}

/// Text read/write against whatever clipboard the process can reach.
pub trait SystemClipboard: Send {
    /// Current clipboard text. An empty clipboard reads as an empty string,
    /// not an error.
    fn read_text(&mut self) -> Result<String, ClipboardError>;

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// arboard-backed implementation for the real OS clipboard.
pub struct ArboardClipboard {
    inner: arboard::Clipboard,
}

impl ArboardClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl SystemClipboard for ArboardClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        match self.inner.get_text() {
            Ok(text) => Ok(text),
            // arboard reports an empty clipboard as an error; the watcher
            // treats it as "nothing to record".
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(ClipboardError::Access(e.to_string())),
        }
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Access(e.to_string()))
    }
}
