//! Console configuration.

/// What to do with program output that is malformed for the configured
/// charset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Substitute U+FFFD for each malformed sequence and keep going.
    #[default]
    Replace,

    /// Fail the flush. The bridge becomes unusable afterwards.
    Strict,
}

/// Configuration for creating a [`ConsoleBridge`](crate::ConsoleBridge).
///
/// # Default Values
///
/// | Field | Default |
/// |-------|---------|
/// | `charset` | `"utf-8"` |
/// | `emacs_bindings` | `true` |
/// | `auto_flush` | `true` |
/// | `decode_policy` | [`DecodePolicy::Replace`] |
///
/// # Example
///
/// ```
/// use widget_console::{ConsoleConfig, DecodePolicy};
///
/// let config = ConsoleConfig {
///     charset: "shift_jis".into(),
///     decode_policy: DecodePolicy::Strict,
///     ..ConsoleConfig::default()
/// };
/// assert!(config.emacs_bindings);
/// ```
#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    /// WHATWG label of the charset used for both input and output
    pub charset: String,

    /// Install the Ctrl/Alt editing chords (Ctrl+F, Ctrl+K, Alt+W, ...)
    pub emacs_bindings: bool,

    /// Schedule a flush whenever the program writes a newline
    pub auto_flush: bool,

    /// Handling of malformed bytes in program output
    pub decode_policy: DecodePolicy,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            charset: "utf-8".into(),
            emacs_bindings: true,
            auto_flush: true,
            decode_policy: DecodePolicy::default(),
        }
    }
}
