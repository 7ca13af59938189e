//! Output sinks for accepted lines.

use std::io::{self, Write};

/// Receives accepted archive lines, verbatim, one per call.
///
/// Lines are raw bytes without their terminator; they need not be valid UTF-8.
pub trait LineSink {
    /// Writes one line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be written.
    fn write_line(&mut self, line: &[u8]) -> io::Result<()>;

    /// Flushes buffered lines. Called after every page.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes lines to any [`Write`], newline-terminated.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wraps a writer.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.writer.write_all(line)?;
        self.writer.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Collects lines in memory.
impl LineSink for Vec<Vec<u8>> {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.push(line.to_vec());
        Ok(())
    }
}
