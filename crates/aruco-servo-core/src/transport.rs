//! JSON-lines event source and command sink.
//!
//! Each input line is one [`PoseEvent`]; each published command is written
//! as one [`VelocityCommand`] line. Blank lines are ignored.

use crate::{CommandSink, EventSource, PoseEvent, SinkError, TransportError, VelocityCommand};
use std::io::{BufRead, Write};

/// Reads one [`PoseEvent`] per line.
pub struct JsonLinesEvents<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesEvents<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> EventSource for JsonLinesEvents<R> {
    fn next_event(&mut self) -> Result<Option<PoseEvent>, TransportError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            return serde_json::from_str(text)
                .map(Some)
                .map_err(|source| TransportError::Malformed {
                    line: self.line,
                    source,
                });
        }
    }
}

/// Writes one [`VelocityCommand`] per line and flushes after each.
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CommandSink for JsonLinesSink<W> {
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, command)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
