//! Incremental line framing
//!
//! Accumulates bytes from the gateway UART and yields complete lines.
//! Robust against noise: an over-long line is discarded up to the next
//! terminator, and invalid UTF-8 is dropped rather than surfaced.

use heapless::{String, Vec};

/// Maximum accepted line length in bytes
pub const MAX_LINE_LEN: usize = 64;

/// State machine for splitting a byte stream into lines
#[derive(Debug, Clone, Default)]
pub struct LineReader {
    buffer: Vec<u8, MAX_LINE_LEN>,
    overflowed: bool,
}

impl LineReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; returns a complete line when a terminator arrives
    ///
    /// Trailing `\r` is stripped, empty lines are swallowed, and a line
    /// that overflowed the buffer is discarded in full.
    pub fn push(&mut self, byte: u8) -> Option<String<MAX_LINE_LEN>> {
        if byte != b'\n' {
            if self.buffer.push(byte).is_err() {
                self.overflowed = true;
            }
            return None;
        }

        let overflowed = core::mem::take(&mut self.overflowed);
        let mut bytes = core::mem::take(&mut self.buffer);

        if overflowed {
            return None;
        }

        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        if bytes.is_empty() {
            return None;
        }

        let text = core::str::from_utf8(&bytes).ok()?;
        let mut line = String::new();
        line.push_str(text).ok()?;
        Some(line)
    }
}
