//! FUDI, the plain-text message format of Pd's `[netreceive]`
//!
//! A message is a list of whitespace separated atoms terminated by `;`.
//! Backslash escapes a separator inside an atom.

use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};

use tracing::{debug, info};

use super::{Message, PatchError, PatchSink};

/// Render a message as one FUDI line
pub fn encode(message: &Message) -> String {
    match message {
        Message::Float { dest, value } => format!("{} {};\n", escape(dest), value),
        Message::Bang { dest } => format!("{} bang;\n", escape(dest)),
        Message::Dsp(on) => format!("pd dsp {};\n", u8::from(*on)),
    }
}

/// Split complete messages out of `text`, ignoring a trailing partial one
pub fn decode(text: &str) -> Vec<Vec<String>> {
    let mut decoder = FudiDecoder::new();
    decoder.feed(text)
}

fn escape(atom: &str) -> String {
    let mut out = String::with_capacity(atom.len());
    for c in atom.chars() {
        if c.is_whitespace() || matches!(c, ';' | ',' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Incremental decoder for a FUDI byte stream
///
/// Input may arrive split at any point; atoms and messages are kept
/// until their terminator shows up.
#[derive(Debug, Default)]
pub struct FudiDecoder {
    atoms: Vec<String>,
    atom: String,
    escaped: bool,
}

impl FudiDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume `text` and return every message it completes
    pub fn feed(&mut self, text: &str) -> Vec<Vec<String>> {
        let mut messages = Vec::new();

        for c in text.chars() {
            if self.escaped {
                self.atom.push(c);
                self.escaped = false;
                continue;
            }
            match c {
                '\\' => self.escaped = true,
                ';' => {
                    self.end_atom();
                    if !self.atoms.is_empty() {
                        messages.push(std::mem::take(&mut self.atoms));
                    }
                }
                c if c.is_whitespace() => self.end_atom(),
                c => self.atom.push(c),
            }
        }

        messages
    }

    fn end_atom(&mut self) {
        if !self.atom.is_empty() {
            self.atoms.push(std::mem::take(&mut self.atom));
        }
    }
}

/// Sends messages as FUDI text to any writer
///
/// Over TCP this talks to a `[netreceive]` object in the patch. The patch
/// is expected to route the first atom to the matching receive name,
/// `pd` included.
pub struct FudiSink<W: Write> {
    writer: W,
}

impl<W: Write> FudiSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl FudiSink<TcpStream> {
    /// Connect to a `[netreceive]` listening on `addr`
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self, PatchError> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        info!(peer = ?stream.peer_addr().ok(), "connected to patch");
        Ok(Self::new(stream))
    }
}

impl<W: Write> PatchSink for FudiSink<W> {
    fn send(&mut self, message: Message) -> Result<(), PatchError> {
        let line = encode(&message);
        debug!(message = line.trim_end(), "send");
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_messages() {
        let float = Message::Float {
            dest: "1003-vol".to_string(),
            value: 0.35,
        };
        assert_eq!(encode(&float), "1003-vol 0.35;\n");

        let bang = Message::Bang {
            dest: "play".to_string(),
        };
        assert_eq!(encode(&bang), "play bang;\n");

        assert_eq!(encode(&Message::Dsp(true)), "pd dsp 1;\n");
        assert_eq!(encode(&Message::Dsp(false)), "pd dsp 0;\n");
    }

    #[test]
    fn test_encode_whole_numbers_without_fraction() {
        let met = Message::Float {
            dest: "met".to_string(),
            value: 875.0,
        };
        assert_eq!(encode(&met), "met 875;\n");
    }

    #[test]
    fn test_decode_multiple_messages() {
        let messages = decode("print hello world;\nmet 500;\n");
        assert_eq!(
            messages,
            vec![
                vec!["print".to_string(), "hello".to_string(), "world".to_string()],
                vec!["met".to_string(), "500".to_string()],
            ]
        );
    }

    #[test]
    fn test_decode_escapes() {
        let messages = decode("say semi\\;colon back\\\\slash;");
        assert_eq!(messages, vec![vec!["say", "semi;colon", "back\\slash"]]);
    }

    #[test]
    fn test_decode_drops_trailing_partial() {
        let messages = decode("a 1; b");
        assert_eq!(messages, vec![vec!["a", "1"]]);
    }

    #[test]
    fn test_decoder_across_chunks() {
        let mut decoder = FudiDecoder::new();
        assert!(decoder.feed("tick 1").is_empty());
        assert!(decoder.feed("2").is_empty());
        assert_eq!(decoder.feed(";\n;"), vec![vec!["tick", "12"]]);
    }

    #[test]
    fn test_sink_writes_lines() {
        let mut sink = FudiSink::new(Vec::new());
        sink.send_float("accent", 12.0).unwrap();
        sink.send_bang("play").unwrap();
        sink.set_dsp(true).unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "accent 12;\nplay bang;\npd dsp 1;\n");
    }

    #[test]
    fn test_escape_round_trip() {
        let line = format!("{};", escape("odd name;here"));
        assert_eq!(decode(&line), vec![vec!["odd name;here"]]);
    }
}
