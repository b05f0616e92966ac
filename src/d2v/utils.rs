//! Low-level line reading utilities

use std::io::BufRead;
use log::trace;
use super::types::error::{D2vError, FormatError, Result};

/// Forward-only line supplier over any buffered reader.
///
/// Lines come back trimmed of the terminator and surrounding whitespace.
/// Keeps the 1-based number of the last line handed out so grammar errors
/// can point at it.
pub(crate) struct LineReader<R> {
    inner: R,
    buf: String,
    line_number: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: String::new(),
            line_number: 0,
        }
    }

    /// Returns the next trimmed line, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        if self.inner.read_line(&mut self.buf)? == 0 {
            trace!("End of input after line {}", self.line_number);
            return Ok(None);
        }
        self.line_number += 1;
        Ok(Some(self.buf.trim().to_string()))
    }

    /// Like [`next_line`](Self::next_line), but end of input reads as an empty line.
    ///
    /// Sections that end on a blank line also end at end of input.
    pub fn next_line_or_empty(&mut self) -> Result<String> {
        Ok(self.next_line()?.unwrap_or_default())
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Wraps a grammar error with the current line number.
    pub fn error(&self, source: FormatError) -> D2vError {
        D2vError::Format {
            line: self.line_number,
            source,
        }
    }
}

/// Parses a single hex byte token such as `51` or `FF`.
pub(crate) fn parse_hex_byte(token: &str) -> std::result::Result<u8, FormatError> {
    u8::from_str_radix(token, 16).map_err(|_| FormatError::InvalidHexByte {
        token: token.to_string(),
    })
}

/// Parses a hex info token, which may be wider than a byte (e.g. `900`).
pub(crate) fn parse_hex_value(token: &str) -> std::result::Result<u32, FormatError> {
    u32::from_str_radix(token, 16).map_err(|_| FormatError::InvalidHexByte {
        token: token.to_string(),
    })
}
