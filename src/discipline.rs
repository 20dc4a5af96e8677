//! Line discipline: what the user may edit, and when a line is submitted.
//!
//! The widget buffer is split by the consumed boundary. Everything before it
//! has already been delivered to the program or printed by it; everything from
//! the boundary on is the line being typed.
//!
//! ```text
//!   "Name? alice\nHello, alice\nNext? bo"
//!    ───────────────────────────────┬───
//!          consumed (read-only)     │ editable
//!                                boundary
//! ```
//!
//! The two checks are deliberately asymmetric:
//!
//! - a key press (navigation, deletion) is refused when the caret is **at or
//!   before** the boundary, so Backspace and Left cannot step into consumed text;
//! - a typed character is refused only when the caret is **strictly before**
//!   the boundary, so typing at the boundary itself works.
//!
//! Enter is never refused. It submits the pending line wherever the caret is.

use crate::keys::{KeyCode, KeyEvent};

/// Outcome of running an event through the line discipline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The pending line must be submitted to the program.
    Submit,
    /// The event must not reach the widget.
    Suppress,
    /// The event may continue down the pipeline.
    Pass,
}

/// Stateless filter applied to every key event before the widget sees it.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineDiscipline;

impl LineDiscipline {
    /// Judge a key press with the caret at `caret`, before the press has had
    /// any effect.
    pub fn on_key_pressed(&self, event: &KeyEvent, caret: usize, boundary: usize) -> Verdict {
        if event.code == KeyCode::Enter {
            return Verdict::Submit;
        }
        if caret <= boundary {
            Verdict::Suppress
        } else {
            Verdict::Pass
        }
    }

    /// Judge a character insertion (typed phase or paste) at `caret`.
    pub fn on_key_typed(&self, caret: usize, boundary: usize) -> Verdict {
        if caret < boundary {
            Verdict::Suppress
        } else {
            Verdict::Pass
        }
    }
}
