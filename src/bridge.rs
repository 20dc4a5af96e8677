//! The console bridge: a text widget on one side, a program's stdin and
//! stdout on the other.
//!
//! [`ConsoleBridge`] owns the state both stream adapters share and runs the
//! key pipeline the host forwards its key events into.
//!
//! # Key Pipeline
//!
//! ```text
//! key press ─► LineDiscipline ─┬─ Submit   ─► submit_line, then widget default (newline)
//!                              ├─ Suppress ─► dropped
//!                              └─ Pass ─► bindings ─┬─ bound   ─► steps (presses re-enter the pipeline)
//!                                                   └─ unbound ─► widget default
//!
//! key typed ─► LineDiscipline ─┬─ Suppress ─► dropped
//!                              └─ Pass     ─► insert character
//! ```
//!
//! # Consumed Boundary
//!
//! The boundary is the widget offset before which the user can no longer
//! edit. It only moves forward, except on [`ConsoleBridge::clear`]:
//!
//! - submitting a line moves it to one past the end of the buffer, reserving
//!   the position of the newline the widget inserts for the Enter key;
//! - flushing program output moves it to the end of the appended text.
//!
//! Both moves happen under one lock, shared with the output adapter.
//!
//! # Threading
//!
//! The bridge itself lives on the UI thread next to the widget. The handles it
//! gives out ([`ConsoleInput`], [`ConsoleOutput`]) are `Send` and are meant for
//! the program's thread.
//!
//! # Example
//!
//! ```
//! use std::io::{BufRead, Write};
//! use widget_console::{ConsoleBridge, ConsoleConfig, MemoryClipboard, TextArea, ui_channel};
//!
//! let (scheduler, queue) = ui_channel();
//! let mut bridge = ConsoleBridge::new(ConsoleConfig::default(), scheduler).unwrap();
//! let mut input = bridge.take_input().unwrap();
//! let mut output = bridge.output();
//!
//! let mut area = TextArea::new();
//! let mut clipboard = MemoryClipboard::new();
//!
//! // The program prints a prompt...
//! write!(output, "Name? ").unwrap();
//! output.flush().unwrap();
//! queue.run_pending(&mut area);
//!
//! // ...the user answers...
//! bridge.type_text(&mut area, &mut clipboard, "alice").unwrap();
//! bridge.type_key(&mut area, &mut clipboard, "enter").unwrap();
//!
//! // ...and the program reads the line.
//! let mut line = String::new();
//! input.read_line(&mut line).unwrap();
//! assert_eq!(line, "alice\r\n");
//! assert_eq!(area.contents(), "Name? alice\n");
//! ```

use crate::bindings::{self, Binding, Step};
use crate::charset::Charset;
use crate::clipboard::ClipboardProvider;
use crate::config::ConsoleConfig;
use crate::discipline::{LineDiscipline, Verdict};
use crate::error::{BridgeError, Result};
use crate::input::{self, ConsoleInput};
use crate::keys::{KeyCode, KeyEvent};
use crate::output::ConsoleOutput;
use crate::scheduler::Scheduler;
use crate::widget::TextWidget;
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Appended to every submitted line, whatever the platform.
pub const LINE_TERMINATOR: &str = "\r\n";

/// State guarded by the bridge lock.
pub(crate) struct BridgeState {
    /// Offset of the first editable character.
    pub(crate) boundary: usize,

    /// Write end of the input pipe; `None` once closed.
    pub(crate) pipe: Option<flume::Sender<Vec<u8>>>,
}

/// State shared by the bridge and both stream adapters.
pub(crate) struct BridgeShared {
    pub(crate) charset: Charset,
    pub(crate) state: Mutex<BridgeState>,
    failure: OnceLock<String>,
}

impl BridgeShared {
    /// Fails once the bridge has been poisoned.
    pub(crate) fn check(&self) -> Result<()> {
        match self.failure.get() {
            Some(reason) => Err(BridgeError::Poisoned(reason.clone())),
            None => Ok(()),
        }
    }

    /// Record a fatal failure. Only the first one is kept.
    pub(crate) fn poison(&self, reason: String) {
        let _ = self.failure.set(reason);
    }
}

/// What the key pipeline did with an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The pending line was sent to the program.
    Submitted,
    /// The line discipline refused the event.
    Suppressed,
    /// An editing chord handled the event.
    Bound(Binding),
    /// The widget's default handling ran.
    Default,
}

/// Connects a [`TextWidget`] to a program's input and output streams.
pub struct ConsoleBridge {
    shared: Arc<BridgeShared>,
    input: Option<ConsoleInput>,
    output: ConsoleOutput,
    discipline: LineDiscipline,
    emacs_bindings: bool,
}

impl ConsoleBridge {
    /// Create a bridge.
    ///
    /// `scheduler` must run tasks on the thread that owns the widget, in
    /// order. See [`ui_channel`](crate::ui_channel) for a ready-made one.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnsupportedCharset`] if `config.charset` cannot
    /// be used. No stream exists yet at that point.
    pub fn new(config: ConsoleConfig, scheduler: impl Scheduler + 'static) -> Result<Self> {
        let charset = Charset::for_label(&config.charset)?;
        let (pipe, input) = input::pipe();
        let shared = Arc::new(BridgeShared {
            charset,
            state: Mutex::new(BridgeState {
                boundary: 0,
                pipe: Some(pipe),
            }),
            failure: OnceLock::new(),
        });
        let output = ConsoleOutput::new(
            Arc::clone(&shared),
            Arc::new(scheduler),
            charset.new_decoder(config.decode_policy),
            config.auto_flush,
        );

        debug!(charset = charset.name(), "console bridge created");

        Ok(Self {
            shared,
            input: Some(input),
            output,
            discipline: LineDiscipline,
            emacs_bindings: config.emacs_bindings,
        })
    }

    /// The charset used for both streams.
    pub fn charset(&self) -> Charset {
        self.shared.charset
    }

    /// Hand out the program's input stream. Returns `None` after the first call.
    pub fn take_input(&mut self) -> Option<ConsoleInput> {
        self.input.take()
    }

    /// A handle to the program's output stream.
    pub fn output(&self) -> ConsoleOutput {
        self.output.clone()
    }

    /// Offset of the first character the user may edit.
    pub fn boundary(&self) -> usize {
        self.shared.state.lock().boundary
    }

    /// Run a key press through the pipeline.
    ///
    /// # Errors
    ///
    /// Fails only if the press submits a line and the bridge is poisoned.
    pub fn key_pressed(
        &self,
        widget: &mut dyn TextWidget,
        clipboard: &mut dyn ClipboardProvider,
        event: &KeyEvent,
    ) -> Result<Dispatch> {
        match self
            .discipline
            .on_key_pressed(event, widget.caret(), self.boundary())
        {
            Verdict::Submit => {
                self.submit_line(widget)?;
                widget.apply_key(event);
                return Ok(Dispatch::Submitted);
            }
            Verdict::Suppress => return Ok(Dispatch::Suppressed),
            Verdict::Pass => {}
        }

        if self.emacs_bindings
            && let Some(binding) = bindings::translate(event)
        {
            for step in binding.steps() {
                self.run_step(widget, clipboard, step)?;
            }
            return Ok(Dispatch::Bound(binding));
        }

        widget.apply_key(event);
        Ok(Dispatch::Default)
    }

    /// Run a typed character through the pipeline.
    pub fn key_typed(&self, widget: &mut dyn TextWidget, ch: char) -> Dispatch {
        if self.discipline.on_key_typed(widget.caret(), self.boundary()) == Verdict::Suppress {
            return Dispatch::Suppressed;
        }
        widget.insert_at_caret(ch.encode_utf8(&mut [0u8; 4]));
        Dispatch::Default
    }

    /// Press a key given in `modifier-key` notation, followed by its typed
    /// phase if it produces a character. Returns the verdict of the press.
    ///
    /// # Errors
    ///
    /// Fails on malformed notation, or when [`key_pressed`](Self::key_pressed)
    /// fails.
    pub fn type_key(
        &self,
        widget: &mut dyn TextWidget,
        clipboard: &mut dyn ClipboardProvider,
        notation: &str,
    ) -> anyhow::Result<Dispatch> {
        let event = KeyEvent::parse(notation)?;
        let dispatch = self.key_pressed(widget, clipboard, &event)?;
        if let Some(ch) = event.typed_char() {
            self.key_typed(widget, ch);
        }
        Ok(dispatch)
    }

    /// Type `text` character by character, press and typed phase each.
    ///
    /// Newlines are pressed as Enter and therefore submit.
    pub fn type_text(
        &self,
        widget: &mut dyn TextWidget,
        clipboard: &mut dyn ClipboardProvider,
        text: &str,
    ) -> Result<()> {
        for ch in text.chars() {
            let event = match ch {
                '\n' => KeyEvent::plain(KeyCode::Enter),
                '\t' => KeyEvent::plain(KeyCode::Tab),
                ch => KeyEvent::plain(KeyCode::Char(ch)),
            };
            self.key_pressed(widget, clipboard, &event)?;
            if ch != '\n' {
                self.key_typed(widget, ch);
            }
        }
        Ok(())
    }

    fn run_step(
        &self,
        widget: &mut dyn TextWidget,
        clipboard: &mut dyn ClipboardProvider,
        step: Step,
    ) -> Result<()> {
        match step {
            Step::Press(event) => {
                self.key_pressed(widget, clipboard, &event)?;
            }
            Step::Copy => {
                let selected = widget.selected_text();
                if !selected.is_empty()
                    && let Err(err) = clipboard.copy(&selected)
                {
                    warn!(%err, "copy to clipboard failed");
                }
            }
            Step::Paste => match clipboard.paste() {
                Ok(text) => {
                    if self.discipline.on_key_typed(widget.caret(), self.boundary())
                        == Verdict::Pass
                    {
                        widget.insert_at_caret(&text);
                    }
                }
                Err(err) => warn!(%err, "paste from clipboard failed"),
            },
        }
        Ok(())
    }

    /// Send the pending line to the program.
    ///
    /// The caret is forced to the end first, so the whole line is sent even if
    /// the user moved the caret back before pressing Enter. The line is
    /// encoded together with [`LINE_TERMINATOR`] and written to the pipe as one
    /// chunk, so a reader never sees half a line.
    ///
    /// If the program's input has been closed the line is dropped and the
    /// boundary stays where it is.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Poisoned`] after a fatal output failure.
    pub fn submit_line(&self, widget: &mut dyn TextWidget) -> Result<()> {
        self.shared.check()?;
        let mut state = self.shared.state.lock();

        let end = widget.len();
        widget.set_caret(end);
        let line = widget.text(state.boundary.min(end)..end);
        let bytes = self
            .shared
            .charset
            .encode(&format!("{line}{LINE_TERMINATOR}"));
        let len = bytes.len();

        let Some(pipe) = state.pipe.as_ref() else {
            debug!("console input closed, dropping submitted line");
            return Ok(());
        };
        if pipe.send(bytes).is_err() {
            debug!("console input reader gone, dropping submitted line");
            return Ok(());
        }

        state.boundary = state.boundary.max(end + 1);
        debug!(bytes = len, boundary = state.boundary, "line submitted");
        Ok(())
    }

    /// Clear the console: empty the widget and reset the boundary to zero.
    ///
    /// Both happen under the bridge lock, so an output flush or a submit
    /// cannot interleave.
    pub fn clear(&self, widget: &mut dyn TextWidget) {
        let mut state = self.shared.state.lock();
        widget.clear();
        state.boundary = 0;
        debug!("console cleared");
    }

    /// Close the write end of the program's input.
    ///
    /// A program blocked reading input sees end-of-stream once everything
    /// already submitted has been read.
    pub fn close_input(&self) {
        if self.shared.state.lock().pipe.take().is_some() {
            debug!("console input closed by host");
        }
    }
}

impl Drop for ConsoleBridge {
    /// Tearing down the console ends the program's input, even while output
    /// handles are still alive.
    fn drop(&mut self) {
        self.close_input();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::scheduler::{UiQueue, ui_channel};
    use crate::widget::TextArea;
    use pretty_assertions::assert_eq;
    use std::io::{BufRead, Read, Write};

    struct Harness {
        bridge: ConsoleBridge,
        queue: UiQueue,
        area: TextArea,
        clipboard: MemoryClipboard,
        input: ConsoleInput,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_config(ConsoleConfig::default())
        }

        fn with_config(config: ConsoleConfig) -> Self {
            let (scheduler, queue) = ui_channel();
            let mut bridge = ConsoleBridge::new(config, scheduler).unwrap();
            let input = bridge.take_input().unwrap();
            Self {
                bridge,
                queue,
                area: TextArea::new(),
                clipboard: MemoryClipboard::new(),
                input,
            }
        }

        fn press(&mut self, notation: &str) -> Dispatch {
            self.bridge
                .type_key(&mut self.area, &mut self.clipboard, notation)
                .unwrap()
        }

        fn type_text(&mut self, text: &str) {
            self.bridge
                .type_text(&mut self.area, &mut self.clipboard, text)
                .unwrap();
        }

        fn print(&mut self, text: &str) {
            let mut out = self.bridge.output();
            out.write_all(text.as_bytes()).unwrap();
            out.flush().unwrap();
            self.queue.run_pending(&mut self.area);
        }

        fn read_line(&mut self) -> String {
            let mut line = String::new();
            self.input.read_line(&mut line).unwrap();
            line
        }
    }

    #[test]
    fn test_submit_sends_line_with_crlf() {
        let mut h = Harness::new();
        h.type_text("hello");
        assert_eq!(h.press("enter"), Dispatch::Submitted);

        assert_eq!(h.read_line(), "hello\r\n");
        assert_eq!(h.input.available(), 0);
        assert_eq!(h.area.contents(), "hello\n");
        assert_eq!(h.bridge.boundary(), 6);
    }

    #[test]
    fn test_submit_sends_only_text_after_boundary() {
        let mut h = Harness::new();
        h.print("Name? ");
        h.type_text("bob\n");
        assert_eq!(h.read_line(), "bob\r\n");

        h.print("Hello, bob\nAge? ");
        h.type_text("42\n");
        assert_eq!(h.read_line(), "42\r\n");
        assert_eq!(h.area.contents(), "Name? bob\nHello, bob\nAge? 42\n");
    }

    #[test]
    fn test_submit_forces_caret_to_end() {
        let mut h = Harness::new();
        h.type_text("abc");
        h.press("left");
        h.press("left");
        assert_eq!(h.area.caret(), 1);

        h.press("enter");
        assert_eq!(h.read_line(), "abc\r\n");
        assert_eq!(h.area.contents(), "abc\n");
    }

    #[test]
    fn test_empty_submit() {
        let mut h = Harness::new();
        h.press("enter");
        assert_eq!(h.read_line(), "\r\n");
        assert_eq!(h.bridge.boundary(), 1);
    }

    #[test]
    fn test_submit_encodes_with_charset() {
        let mut h = Harness::with_config(ConsoleConfig {
            charset: "shift_jis".into(),
            ..ConsoleConfig::default()
        });
        h.type_text("あ\n");

        let mut buf = [0u8; 8];
        let n = h.input.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], &[0x82, 0xA0, b'\r', b'\n']);
    }

    #[test]
    fn test_backspace_cannot_cross_boundary() {
        let mut h = Harness::new();
        h.print("> ");
        assert_eq!(h.press("backspace"), Dispatch::Suppressed);
        assert_eq!(h.area.contents(), "> ");

        h.type_text("ab");
        h.press("backspace");
        h.press("backspace");
        assert_eq!(h.press("backspace"), Dispatch::Suppressed);
        assert_eq!(h.area.contents(), "> ");
    }

    #[test]
    fn test_typing_inside_consumed_text_is_suppressed() {
        let mut h = Harness::new();
        h.print("output");
        h.area.set_caret(2);

        assert_eq!(h.bridge.key_typed(&mut h.area, 'x'), Dispatch::Suppressed);
        assert_eq!(h.press("delete"), Dispatch::Suppressed);
        assert_eq!(h.area.contents(), "output");
    }

    #[test]
    fn test_typing_at_boundary_is_allowed() {
        let mut h = Harness::new();
        h.print("out");
        assert_eq!(h.area.caret(), h.bridge.boundary());

        h.type_text("x");
        assert_eq!(h.area.contents(), "outx");
    }

    #[test]
    fn test_emacs_motion_respects_boundary() {
        let mut h = Harness::new();
        h.print("$ ");
        h.type_text("ls");

        assert_eq!(h.press("ctrl-b"), Dispatch::Bound(Binding::BackwardChar));
        assert_eq!(h.area.caret(), 3);
        h.press("ctrl-b");
        assert_eq!(h.area.caret(), 2);
        // At the boundary the chord itself is refused
        assert_eq!(h.press("ctrl-b"), Dispatch::Suppressed);
        assert_eq!(h.area.caret(), 2);
    }

    #[test]
    fn test_ctrl_a_lands_on_line_start_inside_editable_text() {
        let mut h = Harness::new();
        h.type_text("abc");
        assert_eq!(h.press("ctrl-a"), Dispatch::Bound(Binding::LineStart));
        assert_eq!(h.area.caret(), 0);
        assert_eq!(h.press("ctrl-e"), Dispatch::Suppressed);
    }

    #[test]
    fn test_kill_and_yank() {
        let mut h = Harness::new();
        h.print("> ");
        h.type_text("hello world");
        for _ in 0..5 {
            h.press("left");
        }

        assert_eq!(h.press("ctrl-k"), Dispatch::Bound(Binding::KillLine));
        assert_eq!(h.area.contents(), "> hello ");
        assert_eq!(h.clipboard.contents(), "world");

        assert_eq!(h.press("ctrl-y"), Dispatch::Bound(Binding::Yank));
        assert_eq!(h.area.contents(), "> hello world");
        assert_eq!(h.area.caret(), 13);
    }

    #[test]
    fn test_kill_at_line_end_leaves_no_selection() {
        let mut h = Harness::new();
        h.type_text("a");
        assert_eq!(h.press("ctrl-k"), Dispatch::Bound(Binding::KillLine));
        assert_eq!(h.clipboard.contents(), "");
        h.press("backspace");
        h.type_text("b");
        assert_eq!(h.area.contents(), "b");

        h.type_text("c");
        h.press("ctrl-k");
        h.type_text("de");
        assert_eq!(h.area.contents(), "bcde");
    }

    #[test]
    fn test_alt_w_copies_selection() {
        let mut h = Harness::new();
        h.type_text("copy me");
        h.press("shift-left");
        h.press("shift-left");
        assert_eq!(h.press("alt-w"), Dispatch::Bound(Binding::CopySelection));
        assert_eq!(h.clipboard.contents(), "me");
        assert_eq!(h.area.contents(), "copy me");
    }

    #[test]
    fn test_bindings_can_be_disabled() {
        let mut h = Harness::with_config(ConsoleConfig {
            emacs_bindings: false,
            ..ConsoleConfig::default()
        });
        h.type_text("abc");
        assert_eq!(h.press("ctrl-b"), Dispatch::Default);
        assert_eq!(h.area.caret(), 3);
    }

    #[test]
    fn test_clear_resets_state() {
        let mut h = Harness::new();
        h.print("banner\n");
        h.type_text("first\n");
        assert_eq!(h.read_line(), "first\r\n");

        h.bridge.clear(&mut h.area);
        assert_eq!(h.bridge.boundary(), 0);
        assert!(h.area.is_empty());

        h.type_text("again\n");
        assert_eq!(h.read_line(), "again\r\n");
        assert_eq!(h.area.contents(), "again\n");
        assert_eq!(h.bridge.boundary(), 6);
    }

    #[test]
    fn test_closed_input_drops_lines() {
        let mut h = Harness::new();
        h.bridge.close_input();
        h.type_text("ignored");
        h.press("enter");

        assert_eq!(h.bridge.boundary(), 0);
        assert_eq!(h.input.read(&mut [0u8; 8]).unwrap(), 0);
    }

    #[test]
    fn test_reader_close_is_not_an_error_for_submit() {
        let mut h = Harness::new();
        h.input.close();
        h.type_text("abc");
        assert_eq!(h.press("enter"), Dispatch::Submitted);
    }

    #[test]
    fn test_drop_releases_blocked_reader() {
        let (scheduler, _queue) = ui_channel();
        let mut bridge = ConsoleBridge::new(ConsoleConfig::default(), scheduler).unwrap();
        let mut input = bridge.take_input().unwrap();
        let output = bridge.output();
        let (done_tx, done_rx) = flume::bounded(1);

        std::thread::spawn(move || {
            let _output = output;
            let n = input.read(&mut [0u8; 8]).unwrap();
            let _ = done_tx.send(n);
        });

        std::thread::sleep(std::time::Duration::from_millis(20));
        drop(bridge);
        assert_eq!(done_rx.recv_timeout(std::time::Duration::from_secs(5)), Ok(0));
    }

    #[test]
    fn test_take_input_once() {
        let mut h = Harness::new();
        assert!(h.bridge.take_input().is_none());
    }

    #[test]
    fn test_unsupported_charset_fails_construction() {
        let (scheduler, _queue) = ui_channel();
        let config = ConsoleConfig {
            charset: "utf-16le".into(),
            ..ConsoleConfig::default()
        };
        assert!(matches!(
            ConsoleBridge::new(config, scheduler),
            Err(BridgeError::UnsupportedCharset(_))
        ));
    }

    #[test]
    fn test_poisoned_bridge_refuses_submit() {
        let mut h = Harness::new();
        h.bridge.shared.poison("decode failure".into());
        h.type_text("x");
        let err = h
            .bridge
            .key_pressed(&mut h.area, &mut h.clipboard, &KeyEvent::parse("enter").unwrap())
            .unwrap_err();
        assert!(matches!(err, BridgeError::Poisoned(_)));
    }
}
