//! The text container the console lives in.
//!
//! [`TextWidget`] is the seam between the bridge and whatever GUI toolkit
//! hosts it. The host owns the widget on its UI thread; the bridge only ever
//! touches it from there, either directly from a key event or through a task
//! queued with a [`Scheduler`](crate::Scheduler).
//!
//! [`TextArea`] is a complete in-memory implementation backed by a
//! [`ropey::Rope`]. It is what the demo binary and the tests drive, and it is
//! a reasonable model for how a host adapter should behave.
//!
//! All offsets are character offsets (Unicode scalar values), not bytes.

use crate::keys::{KeyCode, KeyEvent};
use ropey::Rope;
use std::ops::Range;

/// A mutable, caret-addressable text buffer.
pub trait TextWidget {
    /// Total length in characters.
    fn len(&self) -> usize;

    /// Whether the buffer holds no text.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The text in `range`. Out-of-range ends are clamped.
    fn text(&self, range: Range<usize>) -> String;

    /// Append text at the end of the buffer. The caret is not moved.
    fn append(&mut self, text: &str);

    /// Current caret offset.
    fn caret(&self) -> usize;

    /// Move the caret and drop any selection.
    fn set_caret(&mut self, offset: usize);

    /// The currently selected text, empty when nothing is selected.
    fn selected_text(&self) -> String;

    /// Replace the selection (or insert at the caret) with `text`, leaving the
    /// caret after the inserted text.
    fn insert_at_caret(&mut self, text: &str);

    /// Remove all text.
    fn clear(&mut self);

    /// The widget's own handling of a key press nobody suppressed: caret
    /// motion, shift-selection, deletion and the newline on Enter.
    fn apply_key(&mut self, event: &KeyEvent);
}

/// In-memory text area with a caret and a shift-extended selection.
///
/// # Example
///
/// ```
/// use widget_console::{KeyEvent, TextArea, TextWidget};
///
/// let mut area = TextArea::new();
/// area.insert_at_caret("hello");
/// area.apply_key(&KeyEvent::parse("shift-home").unwrap());
/// assert_eq!(area.selected_text(), "hello");
/// ```
#[derive(Clone, Debug, Default)]
pub struct TextArea {
    rope: Rope,
    caret: usize,
    anchor: Option<usize>,
}

impl TextArea {
    /// Create an empty text area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a text area holding `text`, caret at the end.
    pub fn with_text(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let caret = rope.len_chars();
        Self {
            rope,
            caret,
            anchor: None,
        }
    }

    /// The whole buffer as a string.
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// The selected range, if a non-empty selection exists.
    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        if anchor == self.caret {
            return None;
        }
        Some(anchor.min(self.caret)..anchor.max(self.caret))
    }

    fn move_caret(&mut self, to: usize, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.caret);
        } else {
            self.anchor = None;
        }
        self.caret = to.min(self.rope.len_chars());
    }

    fn delete_selection(&mut self) -> bool {
        let Some(range) = self.selection() else {
            return false;
        };
        self.rope.remove(range.clone());
        self.caret = range.start;
        self.anchor = None;
        true
    }

    fn line_start(&self, offset: usize) -> usize {
        self.rope.line_to_char(self.rope.char_to_line(offset))
    }

    fn line_end(&self, offset: usize) -> usize {
        let line = self.rope.char_to_line(offset);
        let start = self.rope.line_to_char(line);
        let mut end = start + self.rope.line(line).len_chars();
        while end > start && matches!(self.rope.char(end - 1), '\n' | '\r') {
            end -= 1;
        }
        end
    }

    /// Offset on the line `delta` lines away, keeping the column where the
    /// target line is long enough.
    fn vertical_target(&self, delta: isize) -> usize {
        let line = self.rope.char_to_line(self.caret);
        let Some(target) = line.checked_add_signed(delta) else {
            return self.caret;
        };
        if target >= self.rope.len_lines() {
            return self.caret;
        }
        let column = self.caret - self.line_start(self.caret);
        let start = self.rope.line_to_char(target);
        (start + column).min(self.line_end(start))
    }
}

impl TextWidget for TextArea {
    fn len(&self) -> usize {
        self.rope.len_chars()
    }

    fn text(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.rope.len_chars());
        let start = range.start.min(end);
        self.rope.slice(start..end).to_string()
    }

    fn append(&mut self, text: &str) {
        self.rope.insert(self.rope.len_chars(), text);
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn set_caret(&mut self, offset: usize) {
        self.move_caret(offset, false);
    }

    fn selected_text(&self) -> String {
        self.selection()
            .map(|range| self.rope.slice(range).to_string())
            .unwrap_or_default()
    }

    fn insert_at_caret(&mut self, text: &str) {
        self.delete_selection();
        self.rope.insert(self.caret, text);
        self.caret += text.chars().count();
        self.anchor = None;
    }

    fn clear(&mut self) {
        self.rope = Rope::new();
        self.caret = 0;
        self.anchor = None;
    }

    fn apply_key(&mut self, event: &KeyEvent) {
        let extend = event.modifiers.shift;
        match event.code {
            KeyCode::Left => self.move_caret(self.caret.saturating_sub(1), extend),
            KeyCode::Right => self.move_caret(self.caret + 1, extend),
            KeyCode::Up => self.move_caret(self.vertical_target(-1), extend),
            KeyCode::Down => self.move_caret(self.vertical_target(1), extend),
            KeyCode::Home => self.move_caret(self.line_start(self.caret), extend),
            KeyCode::End => self.move_caret(self.line_end(self.caret), extend),
            KeyCode::Backspace => {
                if !self.delete_selection() {
                    if self.caret > 0 {
                        self.rope.remove(self.caret - 1..self.caret);
                        self.caret -= 1;
                    }
                    self.anchor = None;
                }
            }
            KeyCode::Delete => {
                if !self.delete_selection() {
                    if self.caret < self.rope.len_chars() {
                        self.rope.remove(self.caret..self.caret + 1);
                    }
                    self.anchor = None;
                }
            }
            KeyCode::Enter => self.insert_at_caret("\n"),
            // Characters are inserted in the typed phase
            KeyCode::Char(_) | KeyCode::Tab | KeyCode::Escape => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press(area: &mut TextArea, notation: &str) {
        area.apply_key(&KeyEvent::parse(notation).unwrap());
    }

    #[test]
    fn test_new_area_is_empty() {
        let area = TextArea::new();
        assert!(area.is_empty());
        assert_eq!(area.caret(), 0);
    }

    #[test]
    fn test_append_does_not_move_caret() {
        let mut area = TextArea::new();
        area.append("abc");
        assert_eq!(area.contents(), "abc");
        assert_eq!(area.caret(), 0);
    }

    #[test]
    fn test_text_range_is_clamped() {
        let area = TextArea::with_text("héllo");
        assert_eq!(area.text(1..3), "él");
        assert_eq!(area.text(3..100), "lo");
        assert_eq!(area.text(50..100), "");
    }

    #[test]
    fn test_horizontal_motion() {
        let mut area = TextArea::with_text("ab");
        press(&mut area, "left");
        assert_eq!(area.caret(), 1);
        press(&mut area, "left");
        press(&mut area, "left");
        assert_eq!(area.caret(), 0);
        press(&mut area, "right");
        press(&mut area, "right");
        press(&mut area, "right");
        assert_eq!(area.caret(), 2);
    }

    #[test]
    fn test_home_and_end_stay_on_line() {
        let mut area = TextArea::with_text("first\nsecond\nthird");
        area.set_caret(9);
        press(&mut area, "home");
        assert_eq!(area.caret(), 6);
        press(&mut area, "end");
        assert_eq!(area.caret(), 12);
    }

    #[test]
    fn test_end_skips_crlf() {
        let mut area = TextArea::with_text("ab\r\ncd");
        area.set_caret(0);
        press(&mut area, "end");
        assert_eq!(area.caret(), 2);
    }

    #[test]
    fn test_vertical_motion_keeps_column() {
        let mut area = TextArea::with_text("abcdef\nxy\nlonger line");
        area.set_caret(4);
        press(&mut area, "down");
        assert_eq!(area.caret(), 9);
        press(&mut area, "down");
        assert_eq!(area.caret(), 12);
        press(&mut area, "up");
        press(&mut area, "up");
        assert_eq!(area.caret(), 2);
        press(&mut area, "up");
        assert_eq!(area.caret(), 2);
    }

    #[test]
    fn test_shift_selection() {
        let mut area = TextArea::with_text("hello world");
        area.set_caret(6);
        press(&mut area, "shift-end");
        assert_eq!(area.selected_text(), "world");
        assert_eq!(area.selection(), Some(6..11));
        press(&mut area, "left");
        assert_eq!(area.selection(), None);
    }

    #[test]
    fn test_delete_removes_selection() {
        let mut area = TextArea::with_text("hello world");
        area.set_caret(5);
        press(&mut area, "shift-end");
        press(&mut area, "delete");
        assert_eq!(area.contents(), "hello");
        assert_eq!(area.caret(), 5);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut area = TextArea::with_text("abc");
        press(&mut area, "backspace");
        assert_eq!(area.contents(), "ab");
        area.set_caret(0);
        press(&mut area, "delete");
        assert_eq!(area.contents(), "b");
        press(&mut area, "backspace");
        assert_eq!(area.contents(), "b");
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut area = TextArea::with_text("abc");
        area.set_caret(0);
        press(&mut area, "shift-right");
        area.insert_at_caret("XY");
        assert_eq!(area.contents(), "XYbc");
        assert_eq!(area.caret(), 2);
    }

    #[test]
    fn test_enter_inserts_newline() {
        let mut area = TextArea::with_text("abc");
        press(&mut area, "enter");
        assert_eq!(area.contents(), "abc\n");
        assert_eq!(area.caret(), 4);
    }

    #[test]
    fn test_empty_selection_does_not_linger() {
        let mut area = TextArea::with_text("ab");
        press(&mut area, "shift-end");
        assert_eq!(area.selection(), None);
        press(&mut area, "backspace");
        area.insert_at_caret("c");
        area.insert_at_caret("d");
        assert_eq!(area.contents(), "acd");
        assert_eq!(area.caret(), 3);
    }

    #[test]
    fn test_insert_after_selection_replace_keeps_text() {
        let mut area = TextArea::with_text("abc");
        press(&mut area, "shift-left");
        area.insert_at_caret("X");
        area.insert_at_caret("Y");
        assert_eq!(area.contents(), "abXY");
    }

    #[test]
    fn test_clear() {
        let mut area = TextArea::with_text("abc");
        area.clear();
        assert!(area.is_empty());
        assert_eq!(area.caret(), 0);
    }
}
