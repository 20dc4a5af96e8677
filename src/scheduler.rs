//! Running work on the thread that owns the widget.
//!
//! Program output is produced on arbitrary threads, but only the UI thread may
//! touch the widget. The bridge therefore never mutates the widget from a
//! writer thread; it hands a [`UiTask`] to an injected [`Scheduler`], and the
//! host runs that task on its UI thread with the widget in hand.
//!
//! # Scheduler Contract
//!
//! - `run_later` must not block waiting for the task to run.
//! - Tasks must run in the order they were scheduled.
//! - Tasks must run on the thread that owns the widget.
//!
//! # Channel Scheduler
//!
//! [`ui_channel`] provides a ready-made implementation on top of a
//! [flume](https://docs.rs/flume) channel. GUI hosts usually have their own
//! "run on the main thread" primitive and can wrap that instead.
//!
//! ```text
//! writer thread ── ChannelScheduler::run_later ──► flume ──► UiQueue::run_pending(widget)
//!                                                               (UI thread)
//! ```
//!
//! # Example
//!
//! ```
//! use widget_console::{Scheduler, TextArea, TextWidget, ui_channel};
//!
//! let (scheduler, queue) = ui_channel();
//! scheduler.run_later(Box::new(|widget: &mut dyn TextWidget| widget.append("hi")));
//!
//! let mut area = TextArea::new();
//! assert_eq!(queue.run_pending(&mut area), 1);
//! assert_eq!(area.contents(), "hi");
//! ```

use crate::widget::TextWidget;
use std::time::Duration;

/// A unit of work that runs on the UI thread with the widget.
pub type UiTask = Box<dyn FnOnce(&mut dyn TextWidget) + Send>;

/// Enqueues work onto the single execution context that owns the widget.
pub trait Scheduler: Send + Sync {
    /// Queue `task` to run later on the UI thread. Must not block.
    fn run_later(&self, task: UiTask);
}

impl<F> Scheduler for F
where
    F: Fn(UiTask) + Send + Sync,
{
    fn run_later(&self, task: UiTask) {
        self(task)
    }
}

/// Sending half of [`ui_channel`]. Cheap to clone; usable from any thread.
#[derive(Clone)]
pub struct ChannelScheduler {
    tx: flume::Sender<UiTask>,
}

impl Scheduler for ChannelScheduler {
    fn run_later(&self, task: UiTask) {
        // A dropped queue means the UI is gone; there is nothing left to update.
        let _ = self.tx.send(task);
    }
}

/// Receiving half of [`ui_channel`], owned by the UI thread.
pub struct UiQueue {
    rx: flume::Receiver<UiTask>,
}

impl UiQueue {
    /// Run every task queued so far, in order, without blocking.
    ///
    /// Returns the number of tasks that ran.
    pub fn run_pending(&self, widget: &mut dyn TextWidget) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task(&mut *widget);
            ran += 1;
        }
        ran
    }

    /// Wait up to `timeout` for one task and run it.
    ///
    /// Returns `false` if nothing arrived in time or every scheduler has been
    /// dropped.
    pub fn run_next_timeout(&self, widget: &mut dyn TextWidget, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(task) => {
                task(&mut *widget);
                true
            }
            Err(_) => false,
        }
    }

    /// Number of tasks waiting to run.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether no task is waiting to run.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Create a channel-backed scheduler and the queue the UI thread drains.
pub fn ui_channel() -> (ChannelScheduler, UiQueue) {
    let (tx, rx) = flume::unbounded();
    (ChannelScheduler { tx }, UiQueue { rx })
}
