//! Error types for the console bridge.
//!
//! Only two conditions are ever surfaced to a consumer program as something
//! other than end-of-stream: a bridge that has been poisoned by an earlier
//! fatal failure, and misuse at construction time. A closed pipe is a normal
//! shutdown path and never shows up here.
//!
//! | Error | Raised by | Recoverable |
//! |-------|-----------|-------------|
//! | [`BridgeError::UnsupportedCharset`] | [`ConsoleBridge::new`](crate::ConsoleBridge::new) | No |
//! | [`BridgeError::Decode`] | output flush with [`DecodePolicy::Strict`](crate::DecodePolicy::Strict) | No |
//! | [`BridgeError::Clipboard`] | [`Clipboard`](crate::Clipboard) | Yes |
//! | [`BridgeError::Poisoned`] | stream writes after a fatal flush | No |

use std::io;
use thiserror::Error;

/// Errors produced by the console bridge and its collaborators.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The configured charset label is unknown, or names an encoding that
    /// cannot be used to encode submitted lines.
    #[error("unsupported charset: {0}")]
    UnsupportedCharset(String),

    /// Program output contained a byte sequence that is malformed for the
    /// configured charset.
    #[error("malformed {charset} byte sequence in program output")]
    Decode {
        /// Name of the charset the bytes were decoded with.
        charset: &'static str,
    },

    /// The system clipboard could not be reached.
    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),

    /// An earlier fatal failure made this bridge unusable.
    #[error("console bridge is unusable after an earlier failure: {0}")]
    Poisoned(String),
}

impl BridgeError {
    /// Whether retrying the failed operation on the same bridge can succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BridgeError::Clipboard(_))
    }
}

impl From<BridgeError> for io::Error {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Decode { .. } => io::Error::new(io::ErrorKind::InvalidData, err),
            other => io::Error::other(other),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_clipboard_is_recoverable() {
        assert!(!BridgeError::UnsupportedCharset("x".into()).is_recoverable());
        assert!(!BridgeError::Decode { charset: "UTF-8" }.is_recoverable());
        assert!(!BridgeError::Poisoned("boom".into()).is_recoverable());
        assert!(BridgeError::Clipboard(arboard::Error::ContentNotAvailable).is_recoverable());
    }

    #[test]
    fn test_decode_error_maps_to_invalid_data() {
        let err: io::Error = BridgeError::Decode { charset: "UTF-8" }.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_poisoned_error_message() {
        let err: io::Error = BridgeError::Poisoned("bad bytes".into()).into();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(err.to_string().contains("bad bytes"));
    }
}
