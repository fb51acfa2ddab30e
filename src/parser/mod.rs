//! SAM parsing
//!
//! Parsing runs two state machines built on [`machine::StateMachine`]:
//! - [`block`] reads one line at a time and grows the [`DocTree`]
//! - [`inline`] turns each finished paragraph into a [`crate::models::Flow`]
//!
//! Every error is fatal; no partial tree is returned.

pub mod block;
pub mod inline;
pub mod machine;
pub mod source;

pub use inline::InlineParser;
pub use machine::{Handler, MachineState, StateMachine};
pub use source::{FileSource, LineSource, TextSource};

use core::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::SamConfig;
use crate::document::DocTree;
use crate::error::ParseResult;

/// Kind of list a list body line must continue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum ListKind {
    /// `* item`
    Bullet,
    /// `1. item`
    Numbered,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullet => f.write_str("list"),
            Self::Numbered => f.write_str("numbered list"),
        }
    }
}

/// Entry point for parsing SAM documents
#[derive(Default)]
pub struct SamParser {
    config: SamConfig,
    inline: InlineParser,
}

impl SamParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: SamConfig) -> Self {
        Self {
            config,
            inline: InlineParser::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SamConfig {
        &self.config
    }

    /// Parse every line of `source`
    ///
    /// The source is consumed and dropped before this returns, on success or error.
    ///
    /// # Errors
    ///
    /// Returns the first [`crate::error::ParseError`] encountered
    pub fn parse<S: LineSource>(&self, mut source: S) -> ParseResult<DocTree> {
        block::parse(&mut source, &self.inline, &self.config)
    }

    /// Parse an in-memory document
    ///
    /// # Errors
    ///
    /// Returns the first [`crate::error::ParseError`] encountered
    pub fn parse_str(&self, text: &str) -> ParseResult<DocTree> {
        self.parse(TextSource::new(text))
    }

    /// Parse the file at `path`
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ParseError::Io`] if the file cannot be read, or the
    /// first structural error in its contents
    pub fn parse_file(&self, path: impl AsRef<Path>) -> ParseResult<DocTree> {
        self.parse(FileSource::open(path)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::ParseError;

    #[test]
    fn parse_str_builds_tree() {
        let tree = SamParser::new().parse_str("sam: doc\nsection: intro\n").unwrap();
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn parse_file_names_source_in_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "sam: doc\n* one\noops\n").unwrap();

        let err = SamParser::new().parse_file(file.path()).unwrap_err();
        assert_eq!(
            err,
            ParseError::broken_list(3, file.path().display().to_string(), ListKind::Bullet)
        );
    }

    #[test]
    fn parse_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SamParser::new().parse_file(dir.path().join("none.sam")).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }

    #[test]
    fn list_kind_display() {
        assert_eq!(ListKind::Bullet.to_string(), "list");
        assert_eq!(ListKind::Numbered.to_string(), "numbered list");
    }
}
