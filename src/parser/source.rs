//! Sequential line supply for the block parser
//!
//! A line keeps its terminator, so a blank line is `"\n"` while the end of input
//! is the empty string. Sources keep returning `""` once exhausted.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ParseError, ParseResult};

pub trait LineSource {
    /// Read the next line, or `""` at end of input
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Io`] if the underlying reader fails
    fn next_line(&mut self) -> ParseResult<String>;

    /// 1-based number of the line most recently returned
    fn line_number(&self) -> u64;

    /// Name used in error messages
    fn name(&self) -> &str;
}

/// Lines of an in-memory string
#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    text: String,
    offset: usize,
    line_number: u64,
}

impl TextSource {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::named("<string>", text)
    }

    #[must_use]
    pub fn named(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            offset: 0,
            line_number: 0,
        }
    }
}

impl LineSource for TextSource {
    fn next_line(&mut self) -> ParseResult<String> {
        let rest = &self.text[self.offset..];
        if rest.is_empty() {
            return Ok(String::new());
        }
        let end = rest.find('\n').map_or(rest.len(), |i| i + 1);
        let line = rest[..end].to_string();
        self.offset += end;
        self.line_number += 1;
        Ok(line)
    }

    fn line_number(&self) -> u64 {
        self.line_number
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Lines of a UTF-8 file; the file is closed when the source is dropped
#[derive(Debug)]
pub struct FileSource {
    name: String,
    reader: BufReader<File>,
    line_number: u64,
}

impl FileSource {
    /// Open `path` for reading
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Io`] if the file cannot be opened
    pub fn open(path: impl AsRef<Path>) -> ParseResult<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| ParseError::io(&name, &e))?;
        Ok(Self {
            name,
            reader: BufReader::new(file),
            line_number: 0,
        })
    }
}

impl LineSource for FileSource {
    fn next_line(&mut self) -> ParseResult<String> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| ParseError::io(&self.name, &e))?;
        if read > 0 {
            self.line_number += 1;
        }
        Ok(line)
    }

    fn line_number(&self) -> u64 {
        self.line_number
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn text_source_keeps_terminators_and_signals_end() {
        let mut source = TextSource::new("a\n\nb");
        assert_eq!(source.next_line().unwrap(), "a\n");
        assert_eq!(source.next_line().unwrap(), "\n");
        assert_eq!(source.next_line().unwrap(), "b");
        assert_eq!(source.line_number(), 3);
        assert_eq!(source.next_line().unwrap(), "");
        assert_eq!(source.next_line().unwrap(), "");
        assert_eq!(source.line_number(), 3);
    }

    #[test]
    fn file_source_reads_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "sam: doc\n\nend\n").unwrap();

        let mut source = FileSource::open(file.path()).unwrap();
        assert_eq!(source.next_line().unwrap(), "sam: doc\n");
        assert_eq!(source.next_line().unwrap(), "\n");
        assert_eq!(source.next_line().unwrap(), "end\n");
        assert_eq!(source.next_line().unwrap(), "");
        assert_eq!(source.line_number(), 3);
        assert_eq!(source.name(), file.path().display().to_string());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::open(dir.path().join("absent.sam")).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}
