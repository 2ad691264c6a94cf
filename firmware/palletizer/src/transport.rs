use core::fmt::{self, Display, Formatter};

use ufmt_macros::uDebug;

/// Destination for whole lines of text.
pub trait LineSink {
    /// Sends `line` followed by a newline.
    fn send_line(&mut self, line: &str);
}

/// Byte-oriented duplex link, newline framed.
pub trait Transport: LineSink {
    /// Returns the next received byte, if one is waiting. Never blocks.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Sink that discards everything.
pub struct NullSink;
impl LineSink for NullSink {
    fn send_line(&mut self, _line: &str) {}
}

/// Errors that might occur when reading lines.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum LineError {
    /// The line did not fit in the buffer and was discarded.
    BufferOverflow,
}

impl Display for LineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LineError::BufferOverflow => write!(f, "line too long"),
        }
    }
}

/// A received line.
pub type Line<const N: usize> = heapless::String<N>;

/// Transport with a line buffer.
///
/// Bytes are accumulated until a newline arrives. A trailing carriage return
/// is stripped. When a line overflows the buffer, the rest of it is
/// discarded and the overflow is reported once the newline arrives.
///
/// # Type Parameters
///
/// - `T`: underlying transport
/// - `N`: number of characters in the buffer
pub struct LineChannel<T, const N: usize> {
    transport: T,
    buffer: heapless::String<N>,
    overflowed: bool,
}
impl<T: Transport, const N: usize> LineChannel<T, N> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            buffer: heapless::String::new(),
            overflowed: false,
        }
    }

    /// Reads waiting bytes until a line is complete.
    ///
    /// # Returns
    ///
    /// - `Some(Ok(line))`: a complete line.
    /// - `Some(Err(LineError::BufferOverflow))`: a line was too long.
    /// - `None`: no complete line is available yet.
    pub fn poll_line(&mut self) -> Option<Result<Line<N>, LineError>> {
        while let Some(byte) = self.transport.read_byte() {
            if let Some(result) = self.push(byte) {
                return Some(result);
            }
        }
        None
    }

    /// Sends a line on the transport.
    pub fn send_line(&mut self, line: &str) {
        self.transport.send_line(line);
    }

    fn push(&mut self, byte: u8) -> Option<Result<Line<N>, LineError>> {
        if byte == b'\n' {
            let result = if self.overflowed {
                Err(LineError::BufferOverflow)
            } else {
                let line = self.buffer.trim_end_matches('\r');
                let mut out = Line::new();
                // Cannot fail: `out` has the same capacity as the buffer.
                let _ = out.push_str(line);
                Ok(out)
            };
            self.buffer.clear();
            self.overflowed = false;
            return Some(result);
        }
        if !self.overflowed && self.buffer.push(byte as char).is_err() {
            self.overflowed = true;
        }
        None
    }
}
