//! Carriage-return line framing for the hub's telemetry stream
//!
//! Bytes arrive in arbitrary chunks (whatever the serial driver had ready
//! when the read returned). The framer accumulates them and hands out every
//! complete line, keeping the unterminated tail for the next chunk.

use crate::protocol::LINE_DELIMITER;

/// Accumulates serial bytes and splits them into delimiter-terminated lines
///
/// After every [`feed`](Self::feed) the pending buffer holds only bytes of a
/// line whose delimiter has not been seen yet.
#[derive(Debug, Clone)]
pub struct LineFramer {
    buffer: Vec<u8>,
    delimiter: u8,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    /// Create a framer using the protocol's carriage-return delimiter
    pub fn new() -> Self {
        Self::with_delimiter(LINE_DELIMITER)
    }

    /// Create a framer splitting on an arbitrary delimiter byte
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            buffer: Vec::new(),
            delimiter,
        }
    }

    /// Append a chunk and return every line it completed, in order
    ///
    /// Empty lines (back-to-back delimiters) are skipped. An empty chunk is
    /// a no-op.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        if chunk.is_empty() {
            return Vec::new();
        }

        self.buffer.extend_from_slice(chunk);

        let Some(last) = self.buffer.iter().rposition(|&b| b == self.delimiter) else {
            return Vec::new();
        };

        let lines = self.buffer[..last]
            .split(|&b| b == self.delimiter)
            .filter(|line| !line.is_empty())
            .map(<[u8]>::to_vec)
            .collect();

        self.buffer.drain(..=last);
        lines
    }

    /// Bytes of the line currently being accumulated
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }
}
