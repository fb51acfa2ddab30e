//! Error types for the sam library
//!
//! Every failure is fatal: parsing stops at the first error and the error carries
//! whatever location context was available at that point.

use thiserror::Error;

use crate::parser::ListKind;

/// Parse-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error, uniffi::Error)]
pub enum ParseError {
    /// The first line is not a `sam:` declaration
    #[error("Not a SAM file: {source_name} does not start with a `sam:` declaration")]
    MissingDeclaration { source_name: String },

    /// A non-blank line that is not an item interrupted a list
    #[error("Broken {kind} at line {line} of {source_name}")]
    BrokenList {
        line: u64,
        source_name: String,
        kind: ListKind,
    },

    /// A line matched none of the classification rules
    #[error("Unrecognized line {line} of {source_name}")]
    UnrecognizedLine { line: u64, source_name: String },

    /// Input ended before the closing fence of a codeblock
    #[error("Codeblock opened at line {line} of {source_name} is never closed")]
    UnterminatedCodeblock { line: u64, source_name: String },

    /// A node was inserted before the root existed
    #[error("No root element found")]
    MissingRoot,

    /// A second root was created
    #[error("Document already has a root element")]
    DuplicateRoot,

    /// The state machine reached a state without a handler
    #[error("No handler registered for state {0}")]
    UnhandledState(String),

    /// The line source failed to read
    #[error("I/O error reading {source_name}: {message}")]
    Io { source_name: String, message: String },
}

impl ParseError {
    /// Create a broken list error
    pub fn broken_list(line: u64, source_name: impl Into<String>, kind: ListKind) -> Self {
        Self::BrokenList {
            line,
            source_name: source_name.into(),
            kind,
        }
    }

    /// Create an I/O error
    pub fn io(source_name: impl Into<String>, err: &std::io::Error) -> Self {
        Self::Io {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error, uniffi::Error)]
pub enum SerializationError {
    /// Unsupported format
    #[error("Unknown serialization format: {0}")]
    UnsupportedFormat(String),
}

impl SerializationError {
    /// Create an unsupported format error
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat(format.into())
    }
}

/// Result type for serialization operations
pub type SerializationResult<T> = Result<T, SerializationError>;

/// Main unified error type that can represent any sam error
#[derive(Debug, Error, uniffi::Error)]
pub enum SamError {
    /// Parsing error
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Serialization error
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

/// Result type for sam operations
pub type SamResult<T> = Result<T, SamError>;
