//! In-memory sink

use tracing::debug;

use super::{Message, PatchError, PatchSink};

/// Keeps every message instead of delivering it
///
/// Lets a host or a test inspect the traffic a session produces.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Vec<Message>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent float sent to `dest`
    pub fn last_float(&self, dest: &str) -> Option<f32> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Float { dest: d, value } if d == dest => Some(*value),
            _ => None,
        })
    }

    /// Forget everything recorded so far
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl PatchSink for RecordingSink {
    fn send(&mut self, message: Message) -> Result<(), PatchError> {
        debug!(?message, "recorded");
        self.messages.push(message);
        Ok(())
    }
}
