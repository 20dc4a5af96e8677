//! Key events as the console sees them.
//!
//! Hosts translate their toolkit's key events into [`KeyEvent`]s and forward
//! them in two phases, mirroring how text widgets usually work:
//!
//! 1. **Press**: every key goes through
//!    [`ConsoleBridge::key_pressed`](crate::ConsoleBridge::key_pressed). This is
//!    where navigation, deletion and line submission happen.
//! 2. **Typed**: keys that produce a character additionally go through
//!    [`ConsoleBridge::key_typed`](crate::ConsoleBridge::key_typed), which is
//!    where the character gets inserted.
//!
//! # Notation
//!
//! [`KeyEvent::parse`] accepts the same `modifier-key` notation used for
//! keystrokes elsewhere: `"ctrl-k"`, `"alt-w"`, `"shift-end"`, `"enter"`, `"a"`.
//!
//! | Name | Key |
//! |------|-----|
//! | `enter` | [`KeyCode::Enter`] |
//! | `backspace` | [`KeyCode::Backspace`] |
//! | `delete` | [`KeyCode::Delete`] |
//! | `left` / `right` / `up` / `down` | arrow keys |
//! | `home` / `end` | [`KeyCode::Home`] / [`KeyCode::End`] |
//! | `tab` | [`KeyCode::Tab`] |
//! | `escape` | [`KeyCode::Escape`] |
//! | `space` | `KeyCode::Char(' ')` |
//! | any single character | [`KeyCode::Char`] |

use thiserror::Error;

/// Modifier keys held during a key event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Control key
    pub control: bool,
    /// Alt (Option on macOS)
    pub alt: bool,
    /// Shift key
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Modifiers = Modifiers {
        control: false,
        alt: false,
        shift: false,
    };

    /// Only shift held.
    pub const SHIFT: Modifiers = Modifiers {
        control: false,
        alt: false,
        shift: true,
    };
}

/// The key that was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key. Letters are stored lowercase; shift is a modifier.
    Char(char),
    /// Submits the pending line
    Enter,
    /// Deletes the character before the caret
    Backspace,
    /// Deletes the character after the caret
    Delete,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Start of the current line
    Home,
    /// End of the current line
    End,
    /// Inserts `'\t'` in the typed phase
    Tab,
    /// Has no default effect
    Escape,
}

/// A single key event with its modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key itself
    pub code: KeyCode,
    /// Modifiers held while it was pressed
    pub modifiers: Modifiers,
}

/// Error returned by [`KeyEvent::parse`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid key notation: {0:?}")]
pub struct ParseKeyError(String);

impl KeyEvent {
    /// A key event without modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// A key event with shift held.
    pub const fn shifted(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::SHIFT,
        }
    }

    /// Parse `modifier-...-key` notation, e.g. `"ctrl-k"` or `"shift-end"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use widget_console::{KeyCode, KeyEvent};
    ///
    /// let event = KeyEvent::parse("ctrl-k").unwrap();
    /// assert_eq!(event.code, KeyCode::Char('k'));
    /// assert!(event.modifiers.control);
    /// ```
    pub fn parse(source: &str) -> Result<Self, ParseKeyError> {
        let invalid = || ParseKeyError(source.to_string());

        // A trailing "-" is the minus key itself ("ctrl--").
        let (prefix, key) = match source.strip_suffix("--") {
            Some(rest) => (rest, "-"),
            None => match source.rsplit_once('-') {
                Some((prefix, key)) => (prefix, key),
                None => ("", source),
            },
        };

        let mut modifiers = Modifiers::NONE;
        for part in prefix.split('-').filter(|part| !part.is_empty()) {
            match part {
                "ctrl" | "control" => modifiers.control = true,
                "alt" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                _ => return Err(invalid()),
            }
        }

        let code = match key {
            "enter" => KeyCode::Enter,
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "tab" => KeyCode::Tab,
            "escape" => KeyCode::Escape,
            "space" => KeyCode::Char(' '),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => KeyCode::Char(ch.to_ascii_lowercase()),
                    _ => return Err(invalid()),
                }
            }
        };

        Ok(Self { code, modifiers })
    }

    /// The character this event inserts in the typed phase, if any.
    ///
    /// Control and alt chords never insert text.
    pub fn typed_char(&self) -> Option<char> {
        if self.modifiers.control || self.modifiers.alt {
            return None;
        }
        match self.code {
            KeyCode::Char(ch) if self.modifiers.shift => Some(ch.to_ascii_uppercase()),
            KeyCode::Char(ch) => Some(ch),
            KeyCode::Tab => Some('\t'),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_char() {
        let event = KeyEvent::parse("a").unwrap();
        assert_eq!(event, KeyEvent::plain(KeyCode::Char('a')));
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(KeyEvent::parse("enter").unwrap().code, KeyCode::Enter);
        assert_eq!(KeyEvent::parse("backspace").unwrap().code, KeyCode::Backspace);
        assert_eq!(KeyEvent::parse("home").unwrap().code, KeyCode::Home);
        assert_eq!(KeyEvent::parse("space").unwrap().code, KeyCode::Char(' '));
    }

    #[test]
    fn test_parse_modifiers() {
        let event = KeyEvent::parse("ctrl-alt-shift-x").unwrap();
        assert!(event.modifiers.control);
        assert!(event.modifiers.alt);
        assert!(event.modifiers.shift);
        assert_eq!(event.code, KeyCode::Char('x'));
    }

    #[test]
    fn test_parse_minus_key() {
        let event = KeyEvent::parse("ctrl--").unwrap();
        assert!(event.modifiers.control);
        assert_eq!(event.code, KeyCode::Char('-'));
    }

    #[test]
    fn test_parse_uppercase_letter_is_normalized() {
        assert_eq!(KeyEvent::parse("ctrl-K").unwrap().code, KeyCode::Char('k'));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(KeyEvent::parse("hyper-a").is_err());
        assert!(KeyEvent::parse("ctrl-pagedownish").is_err());
        assert!(KeyEvent::parse("").is_err());
    }

    #[test]
    fn test_typed_char() {
        assert_eq!(KeyEvent::parse("a").unwrap().typed_char(), Some('a'));
        assert_eq!(KeyEvent::parse("shift-a").unwrap().typed_char(), Some('A'));
        assert_eq!(KeyEvent::parse("tab").unwrap().typed_char(), Some('\t'));
        assert_eq!(KeyEvent::parse("ctrl-a").unwrap().typed_char(), None);
        assert_eq!(KeyEvent::parse("enter").unwrap().typed_char(), None);
    }

    #[test]
    fn test_parse_error_message() {
        let err = KeyEvent::parse("hyper-x").unwrap_err();
        assert_eq!(err.to_string(), "invalid key notation: \"hyper-x\"");
    }
}
