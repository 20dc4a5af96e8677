//! Emacs-style editing chords for the console.
//!
//! This module provides [`translate`], which maps a small fixed set of
//! modifier chords onto editing actions, and [`Binding::steps`], which spells
//! each action out as synthetic key presses and clipboard operations.
//!
//! # Chords
//!
//! | Chord | Binding | Steps |
//! |-------|---------|-------|
//! | Ctrl+F | [`Binding::ForwardChar`] | press Right |
//! | Ctrl+B | [`Binding::BackwardChar`] | press Left |
//! | Ctrl+N | [`Binding::NextLine`] | press Down |
//! | Ctrl+P | [`Binding::PreviousLine`] | press Up |
//! | Ctrl+E | [`Binding::LineEnd`] | press End |
//! | Ctrl+A | [`Binding::LineStart`] | press Home |
//! | Ctrl+K | [`Binding::KillLine`] | press Shift+End, copy, press Delete |
//! | Ctrl+Y | [`Binding::Yank`] | paste |
//! | Alt+W | [`Binding::CopySelection`] | copy |
//!
//! Control chords win over alt chords: Ctrl+Alt+W is looked up as a control
//! chord and is therefore unbound.
//!
//! # Re-entry
//!
//! Synthetic presses are not applied to the widget directly. The bridge feeds
//! them back through its own key pipeline, so the line discipline sees them
//! exactly like keys the user pressed. A Ctrl+B at the first editable column
//! is therefore suppressed just like a Left arrow would be.
//!
//! # Example
//!
//! ```
//! use widget_console::KeyEvent;
//! use widget_console::bindings::{translate, Binding, Step};
//!
//! let binding = translate(&KeyEvent::parse("ctrl-e").unwrap());
//! assert_eq!(binding, Some(Binding::LineEnd));
//! assert_eq!(binding.unwrap().steps(), vec![Step::Press(KeyEvent::parse("end").unwrap())]);
//!
//! // Plain keys are left alone
//! assert_eq!(translate(&KeyEvent::parse("e").unwrap()), None);
//! ```

use crate::keys::{KeyCode, KeyEvent};

/// An editing action bound to a chord.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    /// Move the caret one character right.
    ForwardChar,
    /// Move the caret one character left.
    BackwardChar,
    /// Move the caret one line down.
    NextLine,
    /// Move the caret one line up.
    PreviousLine,
    /// Move the caret to the end of the line.
    LineEnd,
    /// Move the caret to the start of the line.
    LineStart,
    /// Select to the end of the line, copy the selection, then delete it.
    KillLine,
    /// Paste the clipboard at the caret.
    Yank,
    /// Copy the current selection.
    CopySelection,
}

/// One primitive step of a binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Feed a synthetic key press back through the key pipeline.
    Press(KeyEvent),
    /// Copy the widget's selection to the clipboard.
    Copy,
    /// Insert the clipboard contents at the caret.
    Paste,
}

/// Look up the binding for a key press.
///
/// Returns `None` for anything that is not one of the chords listed in the
/// module documentation; such events must be left to the widget.
pub fn translate(event: &KeyEvent) -> Option<Binding> {
    let KeyCode::Char(ch) = event.code else {
        return None;
    };

    if event.modifiers.control {
        return match ch.to_ascii_lowercase() {
            'f' => Some(Binding::ForwardChar),
            'b' => Some(Binding::BackwardChar),
            'n' => Some(Binding::NextLine),
            'p' => Some(Binding::PreviousLine),
            'e' => Some(Binding::LineEnd),
            'a' => Some(Binding::LineStart),
            'k' => Some(Binding::KillLine),
            'y' => Some(Binding::Yank),
            _ => None,
        };
    }

    if event.modifiers.alt && ch.eq_ignore_ascii_case(&'w') {
        return Some(Binding::CopySelection);
    }

    None
}

impl Binding {
    /// The steps that carry out this binding, in order.
    pub fn steps(self) -> Vec<Step> {
        let press = |code| Step::Press(KeyEvent::plain(code));
        match self {
            Binding::ForwardChar => vec![press(KeyCode::Right)],
            Binding::BackwardChar => vec![press(KeyCode::Left)],
            Binding::NextLine => vec![press(KeyCode::Down)],
            Binding::PreviousLine => vec![press(KeyCode::Up)],
            Binding::LineEnd => vec![press(KeyCode::End)],
            Binding::LineStart => vec![press(KeyCode::Home)],
            Binding::KillLine => vec![
                Step::Press(KeyEvent::shifted(KeyCode::End)),
                Step::Copy,
                press(KeyCode::Delete),
            ],
            Binding::Yank => vec![Step::Paste],
            Binding::CopySelection => vec![Step::Copy],
        }
    }
}
