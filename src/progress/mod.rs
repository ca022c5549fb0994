//! Progress narration for discovery runs
//!
//! The engine reports milestones (root resolution, subdirectories entered or
//! pruned, matches found) through a [`ProgressSink`]. Reporting is one-way
//! and fire-and-forget: a sink never fails the run and the engine never
//! waits on what the sink does with a message.

use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

/// One-way channel the engine narrates a discovery run into
pub trait ProgressSink: Send + Sync {
    /// Records a human-readable progress message
    fn report(&self, message: &str);
}

/// Discards every message
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&self, _message: &str) {}
}

/// Forwards messages to the `tracing` subscriber at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn report(&self, message: &str) {
        tracing::info!(target: "artifact_scout::progress", "{}", message);
    }
}

/// Pushes messages into a tokio channel, e.g. towards a connected client
///
/// A closed receiver is ignored: the requester going away does not stop the
/// run, cancellation does.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new(sender: UnboundedSender<String>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelSink {
    fn report(&self, message: &str) {
        if self.sender.send(message.to_string()).is_err() {
            tracing::trace!("Progress receiver dropped: {}", message);
        }
    }
}

/// Keeps every message in memory, in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the messages recorded so far
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl ProgressSink for RecordingSink {
    fn report(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
