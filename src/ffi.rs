//! `UniFFI` bindings for the SAM parser
//!
//! This module provides a FFI interface to parse SAM documents and render them
//! from different platforms (iOS, Android, Python, etc.)
#![allow(clippy::cast_possible_truncation)]

use crate::config::{IdentifierMatching, SamConfig};
use crate::document::DocTree;
use crate::error::SamResult;
use crate::formats::{self, DocumentSerializer, XmlSerializer};
use crate::parser::SamParser;

/// A parsed SAM document
#[derive(Debug, uniffi::Object)]
pub struct SamDocument {
    tree: DocTree,
    matching: IdentifierMatching,
}

#[uniffi::export]
impl SamDocument {
    /// Parse a document with the default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid SAM document
    #[uniffi::constructor]
    pub fn parse(text: &str) -> SamResult<Self> {
        Self::parse_with_config(text, SamConfig::default())
    }

    /// Parse a document with custom element names and indents
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid SAM document
    #[uniffi::constructor]
    pub fn parse_with_config(text: &str, config: SamConfig) -> SamResult<Self> {
        let tree = SamParser::with_config(config).parse_str(text)?;
        Ok(Self {
            tree,
            matching: IdentifierMatching::detect(),
        })
    }

    /// Render the document as XML
    pub fn to_xml(&self) -> String {
        XmlSerializer::new(self.matching).serialize(&self.tree)
    }

    /// Render the document in the format named `format`
    ///
    /// # Errors
    ///
    /// Returns an error if the format is not supported
    pub fn serialize(&self, format: &str) -> SamResult<String> {
        Ok(formats::serialize(&self.tree, format, self.matching)?)
    }

    /// Bracketed outline of the document tree
    pub fn outline(&self) -> String {
        self.tree.to_string()
    }

    /// Number of nodes in the tree, root included
    pub fn node_count(&self) -> u32 {
        self.tree.len() as u32
    }
}

/// Parse `text` and render it as XML in one call
///
/// # Errors
///
/// Returns an error if the text is not a valid SAM document
#[uniffi::export]
pub fn sam_to_xml(text: &str) -> SamResult<String> {
    Ok(SamDocument::parse(text)?.to_xml())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, SamError, SerializationError};

    #[test]
    fn document_round_trip_through_bindings() {
        let doc = SamDocument::parse("sam: doc\nsection: intro\n").unwrap();
        assert_eq!(doc.node_count(), 2);
        assert_eq!(doc.outline(), "[sam:'doc'\n[section:'intro']]");
        assert!(doc.to_xml().ends_with("<section>intro</section>\n"));
        assert_eq!(doc.serialize("XML").unwrap(), doc.to_xml());
    }

    #[test]
    fn config_reaches_the_parser() {
        let config = SamConfig::default().with_numbered_list_element("ol");
        let doc = SamDocument::parse_with_config("sam: doc\n1. one\n", config).unwrap();
        assert!(doc.to_xml().contains("<ol>\n<li>one</li>\n</ol>\n"));
    }

    #[test]
    fn errors_cross_the_boundary() {
        assert!(matches!(
            SamDocument::parse("no declaration\n"),
            Err(SamError::Parse(ParseError::MissingDeclaration { .. }))
        ));

        let doc = SamDocument::parse("sam: doc\n").unwrap();
        assert!(matches!(
            doc.serialize("json"),
            Err(SamError::Serialization(SerializationError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn one_shot_conversion() {
        let xml = sam_to_xml("sam: doc\nsection: intro\n").unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<section>intro</section>\n"
        );
    }
}
