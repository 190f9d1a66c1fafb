//! Messages coming back from the patch

use std::io::Read;
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use super::FudiDecoder;

/// Callback object for output of the patch runtime
///
/// Kept apart from any UI type so the listener can outlive, or run on a
/// different thread than, whatever drives the controls.
pub trait PatchListener {
    /// Text the patch printed, atoms joined by spaces
    fn print(&mut self, message: &str);
}

/// Forwards patch output to the log
#[derive(Debug, Default)]
pub struct TraceListener;

impl PatchListener for TraceListener {
    fn print(&mut self, message: &str) {
        info!(target: "patch", "{}", message);
    }
}

/// Decode FUDI from `reader` on a new thread, handing each message to `listener`
///
/// The thread ends when the reader reaches end of stream or fails.
pub fn listen<R, L>(mut reader: R, mut listener: L) -> std::io::Result<JoinHandle<()>>
where
    R: Read + Send + 'static,
    L: PatchListener + Send + 'static,
{
    thread::Builder::new()
        .name("patch-listener".to_string())
        .spawn(move || {
            let mut decoder = FudiDecoder::new();
            let mut buf = [0u8; 1024];
            let mut pending = Vec::new();
            loop {
                let n = match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        warn!("patch listener stopped: {}", e);
                        break;
                    }
                };
                pending.extend_from_slice(&buf[..n]);

                let text = take_text(&mut pending);
                for atoms in decoder.feed(&text) {
                    listener.print(&atoms.join(" "));
                }
            }
        })
}

/// Remove and return the decodable text at the front of `pending`
///
/// Invalid bytes are skipped; an incomplete sequence at the end stays
/// behind for the next read.
fn take_text(pending: &mut Vec<u8>) -> String {
    let mut text = String::new();
    let mut start = 0;
    while start < pending.len() {
        match std::str::from_utf8(&pending[start..]) {
            Ok(rest) => {
                text.push_str(rest);
                start = pending.len();
            }
            Err(e) => {
                let valid = start + e.valid_up_to();
                text.push_str(&String::from_utf8_lossy(&pending[start..valid]));
                match e.error_len() {
                    Some(len) => {
                        warn!(bytes = len, "dropping undecodable patch output");
                        start = valid + len;
                    }
                    None => {
                        start = valid;
                        break;
                    }
                }
            }
        }
    }
    pending.drain(..start);
    text
}
