//! Clipboard access for yank, delete and paste.
//!
//! Failures are reported as [`ClipboardError`] and callers degrade: a failed
//! read pastes nothing, a failed write leaves the buffer edit in place.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("system clipboard unavailable")]
    Unavailable(#[source] arboard::Error),
    #[error("clipboard read failed")]
    Read(#[source] arboard::Error),
    #[error("clipboard write failed")]
    Write(#[source] arboard::Error),
    #[error("clipboard is empty")]
    Empty,
}

pub trait Clipboard {
    fn read(&mut self) -> Result<String, ClipboardError>;
    fn write(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard via arboard.
///
/// The handle is opened on first use and kept, since on X11 the contents we
/// set are only served while it is alive.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.handle.is_none() {
            let clip = arboard::Clipboard::new().map_err(ClipboardError::Unavailable)?;
            self.handle = Some(clip);
        }
        self.handle.as_mut().ok_or(ClipboardError::Empty)
    }
}

impl Clipboard for SystemClipboard {
    fn read(&mut self) -> Result<String, ClipboardError> {
        self.handle()?.get_text().map_err(ClipboardError::Read)
    }

    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?
            .set_text(text.to_string())
            .map_err(ClipboardError::Write)
    }
}

/// Process-local clipboard, used when no system clipboard can be opened.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            contents: Some(text.to_string()),
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn read(&mut self) -> Result<String, ClipboardError> {
        self.contents.clone().ok_or(ClipboardError::Empty)
    }

    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Pick the system clipboard when it can be opened, else an in-memory one.
pub fn detect() -> Box<dyn Clipboard> {
    match arboard::Clipboard::new() {
        Ok(clip) => Box::new(SystemClipboard { handle: Some(clip) }),
        Err(err) => {
            tracing::warn!("system clipboard unavailable, using in-memory clipboard: {err}");
            Box::new(MemoryClipboard::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_round_trip() {
        let mut clip = MemoryClipboard::new();
        assert!(matches!(clip.read(), Err(ClipboardError::Empty)));
        clip.write("SELECT 1;").unwrap();
        assert_eq!(clip.read().unwrap(), "SELECT 1;");
    }
}
