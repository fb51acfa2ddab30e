#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

uniffi::setup_scaffolding!();

pub mod config;
pub mod document;
pub mod error;
pub mod ffi;
pub mod formats;
pub mod models;
pub mod parser;

pub use config::{IdentifierMatching, SamConfig};
pub use document::{DocTree, Indent, Node, NodeId};
pub use ffi::{SamDocument, sam_to_xml};
pub use formats::{DocumentSerializer, OutputFormat, XmlSerializer};
pub use parser::{FileSource, LineSource, ListKind, SamParser, TextSource};

// Re-export common error types for convenience
pub use error::{
    ParseError, ParseResult, SamError, SamResult, SerializationError, SerializationResult,
};
