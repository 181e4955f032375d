use std::cell::{Cell, RefCell};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Clipboard unavailable")]
    Unavailable,

    #[error("Clipboard write rejected: {0}")]
    Rejected(String),
}

/// Write-only text clipboard
pub trait Clipboard {
    /// Replace the clipboard contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the write.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard kept in memory, with a switch to make writes fail
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: RefCell<Option<String>>,
    fail: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing() -> Self {
        let clipboard = Self::default();
        clipboard.set_failing(true);
        clipboard
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }

    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    /// Successful writes so far
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail.get() {
            return Err(ClipboardError::Unavailable);
        }
        *self.contents.borrow_mut() = Some(text.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
