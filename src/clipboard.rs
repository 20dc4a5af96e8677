use crate::error::Result;

/// Clipboard used by the kill/yank/copy bindings.
///
/// Implemented by [`Clipboard`] for the system clipboard and by
/// [`MemoryClipboard`] for headless hosts.
pub trait ClipboardProvider {
    /// Replace the clipboard contents with `text`.
    fn copy(&mut self, text: &str) -> Result<()>;

    /// Current clipboard text.
    fn paste(&mut self) -> Result<String>;
}

/// Clipboard wrapper for console copy/paste operations.
///
/// Provides a simple interface to interact with the system clipboard,
/// supporting both X11 and Wayland on Linux through the arboard crate.
///
/// # Examples
///
/// ```no_run
/// use widget_console::clipboard::{Clipboard, ClipboardProvider};
///
/// let mut clipboard = Clipboard::new().unwrap();
/// clipboard.copy("Hello, World!").unwrap();
/// let text = clipboard.paste().unwrap();
/// println!("Clipboard contents: {}", text);
/// ```
pub struct Clipboard {
    clipboard: arboard::Clipboard,
}

impl Clipboard {
    /// Creates a new clipboard instance.
    ///
    /// On Wayland, this uses the wayland-data-control protocol.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Clipboard`](crate::BridgeError::Clipboard) if the
    /// display server is not accessible or the clipboard system is not
    /// supported.
    pub fn new() -> Result<Self> {
        Ok(Self {
            clipboard: arboard::Clipboard::new()?,
        })
    }

    /// Clears the clipboard contents.
    pub fn clear(&mut self) -> Result<()> {
        self.clipboard.clear()?;
        Ok(())
    }
}

impl ClipboardProvider for Clipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text)?;
        Ok(())
    }

    /// Fails when the clipboard is empty or holds non-text content.
    fn paste(&mut self) -> Result<String> {
        Ok(self.clipboard.get_text()?)
    }
}

/// Process-local clipboard.
///
/// Useful when no display server is available, and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    contents: String,
}

impl MemoryClipboard {
    /// Creates an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// The text last copied, empty if nothing was.
    pub fn contents(&self) -> &str {
        &self.contents
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        self.contents = text.to_string();
        Ok(())
    }

    fn paste(&mut self) -> Result<String> {
        Ok(self.contents.clone())
    }
}
