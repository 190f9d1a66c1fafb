//! Bridge to the patch runtime
//!
//! The metronome itself lives in a Pd patch. All this crate does is send
//! it named scalar messages, and optionally listen to what it prints.

mod fudi;
mod listener;
mod recording;

pub use fudi::{decode, encode, FudiDecoder, FudiSink};
pub use listener::{listen, PatchListener, TraceListener};
pub use recording::RecordingSink;

use thiserror::Error;

/// Errors raised while talking to the patch
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("patch connection failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid receive name {0:?}")]
    InvalidName(String),
}

/// A message addressed to a receive object in the patch
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A float to `[r name]`
    Float { dest: String, value: f32 },
    /// A bang to `[r name]`
    Bang { dest: String },
    /// Switch audio computation on or off
    Dsp(bool),
}

impl Message {
    /// Receive name this message goes to, `pd` for DSP switches
    pub fn dest(&self) -> &str {
        match self {
            Message::Float { dest, .. } | Message::Bang { dest } => dest,
            Message::Dsp(_) => "pd",
        }
    }
}

/// Anything that can deliver messages to a running patch
pub trait PatchSink {
    /// Deliver one message
    fn send(&mut self, message: Message) -> Result<(), PatchError>;

    /// Send a float to `[r dest]`
    fn send_float(&mut self, dest: &str, value: f32) -> Result<(), PatchError> {
        check_name(dest)?;
        self.send(Message::Float {
            dest: dest.to_string(),
            value,
        })
    }

    /// Send a bang to `[r dest]`
    fn send_bang(&mut self, dest: &str) -> Result<(), PatchError> {
        check_name(dest)?;
        self.send(Message::Bang {
            dest: dest.to_string(),
        })
    }

    /// Turn audio computation on or off
    fn set_dsp(&mut self, on: bool) -> Result<(), PatchError> {
        self.send(Message::Dsp(on))
    }
}

impl<S: PatchSink + ?Sized> PatchSink for Box<S> {
    fn send(&mut self, message: Message) -> Result<(), PatchError> {
        (**self).send(message)
    }
}

/// Receive names are single symbols: no whitespace, no separators
fn check_name(name: &str) -> Result<(), PatchError> {
    let valid = !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ';' | ',' | '\\'));
    if valid {
        Ok(())
    } else {
        Err(PatchError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_float_rejects_bad_names() {
        let mut sink = RecordingSink::new();
        assert!(matches!(
            sink.send_float("two words", 1.0),
            Err(PatchError::InvalidName(_))
        ));
        assert!(sink.send_bang("").is_err());
        assert!(sink.send_float("a;b", 1.0).is_err());
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn test_boxed_sink_forwards() {
        let mut sink: Box<RecordingSink> = Box::new(RecordingSink::new());
        sink.send_bang("1001-play").unwrap();
        assert_eq!(sink.messages()[0].dest(), "1001-play");
    }

    #[test]
    fn test_dsp_message_dest() {
        assert_eq!(Message::Dsp(true).dest(), "pd");
    }
}
