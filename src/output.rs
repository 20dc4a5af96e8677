//! The program's standard output (and, usually, standard error).
//!
//! [`ConsoleOutput`] buffers whatever the program writes. Nothing reaches the
//! widget until a flush, and the flush itself does not touch the widget: it
//! queues a task on the UI thread through the bridge's
//! [`Scheduler`](crate::Scheduler) and returns immediately.
//!
//! # Flush Pipeline
//!
//! ```text
//! program thread                       UI thread
//! ──────────────                       ─────────
//! write(b"Hel")   ─► pending bytes
//! write(b"lo\n")  ─► pending bytes
//! flush()         ─► run_later ──────► take pending bytes
//!                                      decode (streaming)
//!                                      append to widget
//!                                      caret → end, boundary → end
//! ```
//!
//! Decoding is deferred to the UI-side flush so that a character split over
//! several writes is decoded as a whole. Flushes run in the order they were
//! scheduled because the scheduler is FIFO.
//!
//! # Auto-flush
//!
//! With [`ConsoleConfig::auto_flush`](crate::ConsoleConfig::auto_flush) enabled,
//! any write containing a newline schedules a flush, the way a line-oriented
//! print stream behaves.

use crate::bridge::BridgeShared;
use crate::charset::StreamDecoder;
use crate::error::Result;
use crate::scheduler::Scheduler;
use crate::widget::TextWidget;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, error};

/// Bytes written since the last flush, and the decoder that will consume them.
struct PendingWrites {
    bytes: Vec<u8>,
    decoder: StreamDecoder,
}

struct OutputInner {
    bridge: Arc<BridgeShared>,
    scheduler: Arc<dyn Scheduler>,
    pending: Mutex<PendingWrites>,
    auto_flush: bool,
}

/// Writable byte stream that appends to the console widget.
///
/// Cloning yields another handle to the same stream, so a program's stdout
/// and stderr can share one console.
#[derive(Clone)]
pub struct ConsoleOutput {
    inner: Arc<OutputInner>,
}

impl ConsoleOutput {
    pub(crate) fn new(
        bridge: Arc<BridgeShared>,
        scheduler: Arc<dyn Scheduler>,
        decoder: StreamDecoder,
        auto_flush: bool,
    ) -> Self {
        Self {
            inner: Arc::new(OutputInner {
                bridge,
                scheduler,
                pending: Mutex::new(PendingWrites {
                    bytes: Vec::new(),
                    decoder,
                }),
                auto_flush,
            }),
        }
    }

    /// Number of bytes written but not yet handed to the UI thread.
    pub fn pending_len(&self) -> usize {
        self.inner.pending.lock().bytes.len()
    }

    /// Final flush. Everything written so far is scheduled for display, and
    /// a character left unfinished at the end is settled by the decode policy:
    /// U+FFFD under [`DecodePolicy::Replace`](crate::DecodePolicy::Replace),
    /// a poisoned bridge under [`DecodePolicy::Strict`](crate::DecodePolicy::Strict).
    ///
    /// The stream stays usable and starts decoding afresh.
    pub fn close(&mut self) -> io::Result<()> {
        self.inner.bridge.check()?;
        self.inner.schedule_flush(true);
        Ok(())
    }
}

impl OutputInner {
    /// Queue a flush on the UI thread. `last` marks the end of the stream.
    fn schedule_flush(self: &Arc<Self>, last: bool) {
        let inner = Arc::clone(self);
        self.scheduler
            .run_later(Box::new(move |widget: &mut dyn TextWidget| {
                if let Err(err) = inner.flush_impl(widget, last) {
                    error!(%err, "console output flush failed");
                    inner.bridge.poison(err.to_string());
                }
            }));
    }

    /// Runs on the UI thread.
    fn flush_impl(&self, widget: &mut dyn TextWidget, last: bool) -> Result<()> {
        let mut state = self.bridge.state.lock();
        let text = {
            let mut pending = self.pending.lock();
            if pending.bytes.is_empty() && !last {
                return Ok(());
            }
            let bytes = std::mem::take(&mut pending.bytes);
            let mut text = pending.decoder.decode(&bytes)?;
            if last {
                text.push_str(&pending.decoder.finish()?);
            }
            text
        };
        // Only part of a multi-byte character so far
        if text.is_empty() {
            return Ok(());
        }

        widget.append(&text);
        let end = widget.len();
        widget.set_caret(end);
        state.boundary = state.boundary.max(end);
        debug!(chars = text.chars().count(), boundary = state.boundary, "program output flushed");
        Ok(())
    }
}

impl Write for ConsoleOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.bridge.check()?;
        if buf.is_empty() {
            return Ok(0);
        }
        self.inner.pending.lock().bytes.extend_from_slice(buf);
        if self.inner.auto_flush && buf.contains(&b'\n') {
            self.inner.schedule_flush(false);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.bridge.check()?;
        self.inner.schedule_flush(false);
        Ok(())
    }
}
