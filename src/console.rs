//! Console I/O
//!
//! The dispatcher and driver only need two capabilities: read one line and
//! write text. Terminal implementations live here next to in-memory ones
//! used for scripted sessions and tests.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

/// Source of input lines. `Ok(None)` signals end of input.
pub trait LineReader {
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Sink for user-visible text.
pub trait LineWriter {
    fn write(&mut self, text: &str) -> io::Result<()>;

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.write(line)?;
        self.write("\n")
    }
}

/// Reads lines from standard input.
#[derive(Debug, Default)]
pub struct StdinReader;

impl LineReader for StdinReader {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        let read = io::stdin().lock().read_line(&mut buf)?;
        if read == 0 {
            return Ok(None);
        }
        let line = buf.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(line))
    }
}

/// Writes to standard output, flushing so prompts show before a read.
#[derive(Debug, Default)]
pub struct StdoutWriter;

impl LineWriter for StdoutWriter {
    fn write(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

#[derive(Debug, Default)]
pub struct StderrWriter;

impl LineWriter for StderrWriter {
    fn write(&mut self, text: &str) -> io::Result<()> {
        let mut err = io::stderr().lock();
        err.write_all(text.as_bytes())?;
        err.flush()
    }
}

/// Replays a fixed list of lines, then reports end of input.
#[derive(Debug, Default, Clone)]
pub struct ScriptedReader {
    lines: VecDeque<String>,
}

impl ScriptedReader {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { lines: lines.into_iter().map(Into::into).collect() }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Shared in-memory buffer; clones write to the same text.
#[derive(Debug, Default, Clone)]
pub struct BufferWriter {
    buf: Arc<Mutex<String>>,
}

impl BufferWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buf.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }
}

impl LineWriter for BufferWriter {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.buf.lock().unwrap_or_else(|e| e.into_inner()).push_str(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_reader_ends() {
        let mut reader = ScriptedReader::new(["one", "two"]);
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("one"));
        assert_eq!(reader.remaining(), 1);
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("two"));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn test_buffer_writer_shared_between_clones() {
        let writer = BufferWriter::new();
        let mut handle = writer.clone();
        handle.write("> ").unwrap();
        handle.write_line("hello").unwrap();
        assert_eq!(writer.contents(), "> hello\n");
        assert_eq!(writer.lines(), vec!["> hello".to_string()]);
    }
}
