//! Operator input for the run loop
//!
//! Commands arrive as text lines on stdin (`t`, `r`, `q`) or as ctrl-c,
//! and are forwarded over a channel the loop drains once per frame.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Operator command applied between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Switch between agent and timer control
    ToggleAi,
    /// Discard the world and the agent and start over
    Reset,
    /// Stop the run loop
    Quit,
}

/// Parse one input line into a command
pub fn parse_command(line: &str) -> Option<ControlEvent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "t" | "toggle" => Some(ControlEvent::ToggleAi),
        "r" | "reset" => Some(ControlEvent::Reset),
        "q" | "quit" | "exit" => Some(ControlEvent::Quit),
        _ => None,
    }
}

/// Source of commands polled once per frame
pub trait InputSource {
    /// Return the commands received since the last poll, oldest first
    fn poll(&mut self) -> Vec<ControlEvent>;
}

/// Input fed by background tasks over an unbounded channel
pub struct ChannelInput {
    rx: mpsc::UnboundedReceiver<ControlEvent>,
}

impl ChannelInput {
    /// Create the input together with a sender for producers
    pub fn new() -> (mpsc::UnboundedSender<ControlEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

impl InputSource for ChannelInput {
    fn poll(&mut self) -> Vec<ControlEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Forward stdin commands until stdin closes or the receiver is dropped
pub fn spawn_stdin_reader(tx: mpsc::UnboundedSender<ControlEvent>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_command(&line) {
                    Some(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => warn!("Unknown command {:?} (use t, r or q)", line.trim()),
                },
                Ok(None) => {
                    debug!("stdin closed");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });
}

/// Turn ctrl-c into a quit command
pub fn spawn_ctrl_c_handler(tx: mpsc::UnboundedSender<ControlEvent>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(ControlEvent::Quit);
        }
    });
}
