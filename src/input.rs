//! The program's standard input.
//!
//! Submitted lines travel from the UI thread to the program through an
//! unbounded [flume](https://docs.rs/flume) channel of byte chunks. An
//! unbounded pipe means the user can keep submitting lines while the program
//! is busy without ever blocking the UI thread.
//!
//! [`ConsoleInput`] is the receiving end. It implements [`Read`] and
//! [`BufRead`], so a program can use it anywhere it would use stdin:
//!
//! ```ignore
//! let mut input = bridge.take_input().unwrap();
//! let mut line = String::new();
//! input.read_line(&mut line)?;  // blocks until the user presses Enter
//! ```
//!
//! # End of Stream
//!
//! A closed pipe is how the console shuts down, so it is never reported as an
//! error. Reads return `Ok(0)` once the write end has been dropped (see
//! [`ConsoleBridge::close_input`](crate::ConsoleBridge::close_input)) and all
//! buffered bytes have been consumed, or after [`ConsoleInput::close`].

use std::io::{self, BufRead, Read};
use tracing::debug;

/// Create a connected pipe: the sending half for submitted lines and the
/// reading half for the program.
pub(crate) fn pipe() -> (flume::Sender<Vec<u8>>, ConsoleInput) {
    let (tx, rx) = flume::unbounded();
    let input = ConsoleInput {
        rx: Some(rx),
        buf: Vec::new(),
        pos: 0,
    };
    (tx, input)
}

/// Blocking byte stream fed by lines the user submits.
pub struct ConsoleInput {
    /// `None` once the stream is closed from either side.
    rx: Option<flume::Receiver<Vec<u8>>>,

    /// The chunk currently being read, plus anything pulled in by `available`.
    buf: Vec<u8>,

    /// Read position in `buf`.
    pos: usize,
}

impl ConsoleInput {
    /// Number of bytes that can be read without blocking.
    pub fn available(&mut self) -> usize {
        if self.pos == self.buf.len() {
            self.buf.clear();
            self.pos = 0;
        }
        if let Some(rx) = &self.rx {
            for chunk in rx.try_iter() {
                self.buf.extend_from_slice(&chunk);
            }
        }
        self.buf.len() - self.pos
    }

    /// Close the stream. Any further read returns end-of-stream.
    ///
    /// Lines submitted after this are dropped by the bridge.
    pub fn close(&mut self) {
        if self.rx.take().is_some() {
            debug!("console input closed by reader");
        }
        self.buf.clear();
        self.pos = 0;
    }

    /// Whether the stream has reached a permanent end.
    pub fn is_closed(&self) -> bool {
        self.rx.is_none() && self.pos == self.buf.len()
    }
}

impl BufRead for ConsoleInput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos == self.buf.len() {
            self.buf.clear();
            self.pos = 0;
            match self.rx.as_ref().map(|rx| rx.recv()) {
                Some(Ok(chunk)) => self.buf = chunk,
                Some(Err(flume::RecvError::Disconnected)) => {
                    debug!("console input pipe closed, reporting end of stream");
                    self.rx = None;
                }
                None => {}
            }
        }
        Ok(&self.buf[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.buf.len());
    }
}

impl Read for ConsoleInput {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        let ready = self.fill_buf()?;
        let n = ready.len().min(out.len());
        out[..n].copy_from_slice(&ready[..n]);
        self.consume(n);
        Ok(n)
    }
}
