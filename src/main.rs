//! Headless console demo using the widget-console library.
//!
//! A greeter program runs on its own thread and talks only to the bridge
//! streams. The main thread plays the UI: it owns an in-memory text area,
//! types every line read from the real stdin into it key by key, and echoes
//! program output to the real stdout.
//!
//! Run with `RUST_LOG=widget_console=debug` to watch the bridge at work.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use widget_console::{
    ConsoleBridge, ConsoleConfig, ConsoleInput, ConsoleOutput, MemoryClipboard, TextArea,
    TextWidget, ui_channel,
};

/// How long the UI loop waits for program output before polling stdin again.
const UI_TICK: Duration = Duration::from_millis(20);

/// The "program" behind the console. It knows nothing about widgets.
fn greeter(mut input: ConsoleInput, mut output: ConsoleOutput) -> io::Result<()> {
    write!(output, "What is your name? ")?;
    output.flush()?;

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let name = line.trim_end();
        if name.is_empty() {
            writeln!(output, "Goodbye!")?;
            break;
        }
        info!(name, "greeting");
        writeln!(output, "Hello, {name}!")?;
        write!(output, "Another name (empty to quit)? ")?;
        output.flush()?;
    }

    output.close()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let (scheduler, queue) = ui_channel();
    let mut bridge = ConsoleBridge::new(ConsoleConfig::default(), scheduler)?;
    let input = bridge.take_input().context("console input already taken")?;
    let output = bridge.output();

    let program = thread::Builder::new()
        .name("greeter".into())
        .spawn(move || greeter(input, output))
        .context("failed to spawn program thread")?;

    // Real stdin is read on its own thread so the UI loop never blocks on it
    let (line_tx, line_rx) = flume::unbounded::<String>();
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("failed to spawn stdin thread")?;

    let mut area = TextArea::new();
    let mut clipboard = MemoryClipboard::new();
    let mut stdout = io::stdout();

    loop {
        // Echo only what the program printed; typed text is already on screen
        let before = area.len();
        if queue.run_next_timeout(&mut area, UI_TICK) {
            queue.run_pending(&mut area);
            stdout.write_all(area.text(before..area.len()).as_bytes())?;
            stdout.flush()?;
        }

        match line_rx.try_recv() {
            Ok(line) => bridge.type_text(&mut area, &mut clipboard, &format!("{line}\n"))?,
            Err(flume::TryRecvError::Disconnected) => bridge.close_input(),
            Err(flume::TryRecvError::Empty) => {}
        }

        if program.is_finished() && queue.is_empty() {
            break;
        }
    }

    match program.join() {
        Ok(result) => result.context("greeter failed")?,
        Err(_) => anyhow::bail!("greeter thread panicked"),
    }

    info!(chars = area.len(), "console closed");
    Ok(())
}
