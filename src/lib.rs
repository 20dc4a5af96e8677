//! # widget-console
//!
//! Turn an editable text widget into an interactive console for a program.
//!
//! This library provides [`ConsoleBridge`], which exposes a text widget as a
//! pair of byte streams: a blocking [`ConsoleInput`] the program reads its
//! input from, and a buffered [`ConsoleOutput`] the program writes to. The
//! user types into the widget, presses Enter, and the program reads that line;
//! the program prints, and the text appears in the widget.
//!
//! ## Features
//!
//! - **Std Streams**: [`ConsoleInput`] implements [`std::io::Read`] and
//!   [`std::io::BufRead`], [`ConsoleOutput`] implements [`std::io::Write`]
//! - **Edit Protection**: text already submitted or printed cannot be edited
//! - **Charsets**: any WHATWG encoding that can encode, via
//!   [encoding_rs](https://docs.rs/encoding_rs)
//! - **Emacs Chords**: Ctrl+F/B/N/P/E/A motion, Ctrl+K kill, Ctrl+Y yank,
//!   Alt+W copy
//! - **Toolkit Agnostic**: the widget sits behind [`TextWidget`] and UI-thread
//!   work goes through an injected [`Scheduler`]
//!
//! ## Quick Start
//!
//! ```
//! use std::io::{BufRead, Write};
//! use std::thread;
//! use widget_console::{ConsoleBridge, ConsoleConfig, MemoryClipboard, TextArea, ui_channel};
//!
//! let (scheduler, queue) = ui_channel();
//! let mut bridge = ConsoleBridge::new(ConsoleConfig::default(), scheduler).unwrap();
//!
//! // The program runs on its own thread and only sees the two streams
//! let mut input = bridge.take_input().unwrap();
//! let mut output = bridge.output();
//! let program = thread::spawn(move || {
//!     let mut line = String::new();
//!     input.read_line(&mut line).unwrap();
//!     writeln!(output, "you said {}", line.trim_end()).unwrap();
//! });
//!
//! // The UI thread owns the widget and forwards key events
//! let mut area = TextArea::new();
//! let mut clipboard = MemoryClipboard::new();
//! bridge.type_text(&mut area, &mut clipboard, "hi\n").unwrap();
//!
//! program.join().unwrap();
//! queue.run_pending(&mut area);
//! assert_eq!(area.contents(), "hi\nyou said hi\n");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    Host UI thread (owns widget)                  │
//! │   key events ──► ConsoleBridge::key_pressed / key_typed          │
//! │   UiQueue::run_pending ◄── scheduled flushes                     │
//! └──────────────────────────────────────────────────────────────────┘
//!        │                          │                         ▲
//!        ▼                          ▼                         │
//! ┌───────────────┐   ┌──────────────────────────┐   ┌────────────────┐
//! │ LineDiscipline│   │ BridgeShared             │   │ Scheduler      │
//! │ bindings      │   │ ├─ consumed boundary     │   │ (run_later)    │
//! │ TextWidget    │   │ ├─ input pipe (flume)    │   └────────────────┘
//! └───────────────┘   │ └─ Charset               │            ▲
//!                     └──────────────────────────┘            │
//!                          │                │                 │
//!                          ▼                ▼                 │
//!                 ┌───────────────┐  ┌────────────────┐       │
//!                 │ ConsoleInput  │  │ ConsoleOutput  │───────┘
//!                 │ (Read)        │  │ (Write)        │
//!                 └───────────────┘  └────────────────┘
//!                          ▲                │
//!                          └── program ─────┘
//! ```
//!
//! ### Data Flow
//!
//! 1. **Input**: Enter forces the caret to the end, takes the text after the
//!    consumed boundary, encodes it with a `\r\n` terminator and sends it down
//!    a [flume](https://docs.rs/flume) channel. The program's blocked read wakes
//!    up with the whole line.
//!
//! 2. **Output**: Writes accumulate in a buffer. A flush hands a task to the
//!    [`Scheduler`]; on the UI thread the task decodes the bytes, appends them,
//!    and moves both the caret and the consumed boundary to the end.
//!
//! 3. **Editing**: Every key press passes through the [`LineDiscipline`] first,
//!    then through the emacs chords, and only then reaches the widget.
//!
//! ## Configuration
//!
//! ```
//! use widget_console::{ConsoleConfig, DecodePolicy};
//!
//! let config = ConsoleConfig {
//!     // Any WHATWG label: "utf-8", "latin1", "shift_jis", "euc-kr", ...
//!     charset: "windows-1252".into(),
//!
//!     // Ctrl+F/B/N/P/E/A/K/Y and Alt+W
//!     emacs_bindings: true,
//!
//!     // Flush whenever the program writes a newline
//!     auto_flush: true,
//!
//!     // Malformed output becomes U+FFFD instead of failing the stream
//!     decode_policy: DecodePolicy::Replace,
//! };
//! ```
//!
//! ## Logging
//!
//! The crate logs through [tracing](https://docs.rs/tracing). Submitted lines,
//! flushes and pipe closures are logged at `debug`, replaced output bytes and
//! clipboard failures at `warn`, and fatal flush failures at `error`. Nothing
//! is printed unless the host installs a subscriber.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bridge`] | The coordinator ([`ConsoleBridge`], [`Dispatch`]) |
//! | [`input`] | Program input stream ([`ConsoleInput`]) |
//! | [`output`] | Program output stream ([`ConsoleOutput`]) |
//! | [`discipline`] | Edit protection and submission ([`LineDiscipline`]) |
//! | [`bindings`] | Emacs-style chords |
//! | [`keys`] | Key events and notation ([`KeyEvent`]) |
//! | [`widget`] | Widget seam and in-memory implementation ([`TextWidget`], [`TextArea`]) |
//! | [`scheduler`] | UI-thread scheduling ([`Scheduler`], [`ui_channel`]) |
//! | [`charset`] | Encoding and streaming decoding ([`Charset`]) |
//! | [`clipboard`] | Clipboard access ([`Clipboard`], [`MemoryClipboard`]) |
//! | [`config`] | [`ConsoleConfig`] |
//! | [`error`] | [`BridgeError`] |

pub mod bindings;
pub mod bridge;
pub mod charset;
pub mod clipboard;
pub mod config;
pub mod discipline;
pub mod error;
pub mod input;
pub mod keys;
pub mod output;
pub mod scheduler;
pub mod widget;

// Re-export main types for convenience
pub use bindings::{Binding, Step};
pub use bridge::{ConsoleBridge, Dispatch, LINE_TERMINATOR};
pub use charset::{Charset, StreamDecoder};
pub use clipboard::{Clipboard, ClipboardProvider, MemoryClipboard};
pub use config::{ConsoleConfig, DecodePolicy};
pub use discipline::{LineDiscipline, Verdict};
pub use error::{BridgeError, Result};
pub use input::ConsoleInput;
pub use keys::{KeyCode, KeyEvent, Modifiers, ParseKeyError};
pub use output::ConsoleOutput;
pub use scheduler::{ChannelScheduler, Scheduler, UiQueue, UiTask, ui_channel};
pub use widget::{TextArea, TextWidget};
