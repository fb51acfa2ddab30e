use std::borrow::Cow;
use std::fmt::Debug;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::IdentifierMatching;
use crate::document::DocTree;
use crate::error::{SerializationError, SerializationResult};

pub mod xml;

pub use xml::XmlSerializer;

/// Output formats a document tree can be rendered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum OutputFormat {
    Xml,
}

impl OutputFormat {
    /// Serializer for this format
    #[must_use]
    pub fn serializer(self, matching: IdentifierMatching) -> Box<dyn DocumentSerializer> {
        match self {
            Self::Xml => Box::new(XmlSerializer::new(matching)),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SerializationError;

    fn from_str(name: &str) -> SerializationResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            _ => Err(SerializationError::unsupported_format(name)),
        }
    }
}

pub trait DocumentSerializer: Send + Sync + Debug {
    /// Lazily render `tree` as a sequence of text fragments
    fn fragments<'a>(&'a self, tree: &'a DocTree) -> Box<dyn Iterator<Item = Cow<'a, str>> + 'a>;

    /// Render `tree` into one string
    fn serialize(&self, tree: &DocTree) -> String {
        self.fragments(tree).collect()
    }
}

/// Render `tree` in the format named `format`
///
/// # Errors
///
/// Returns [`SerializationError::UnsupportedFormat`] for any name other than `xml`
pub fn serialize(
    tree: &DocTree,
    format: &str,
    matching: IdentifierMatching,
) -> SerializationResult<String> {
    let format: OutputFormat = format.parse()?;
    Ok(format.serializer(matching).serialize(tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("xml")]
    #[case("XML")]
    #[case("Xml")]
    fn format_names_are_case_insensitive(#[case] name: &str) {
        assert_eq!(name.parse::<OutputFormat>(), Ok(OutputFormat::Xml));
    }

    #[rstest]
    #[case("json")]
    #[case("html")]
    #[case("")]
    fn unknown_formats_are_rejected(#[case] name: &str) {
        assert_eq!(
            name.parse::<OutputFormat>(),
            Err(SerializationError::UnsupportedFormat(name.to_string()))
        );
    }

    #[test]
    fn serialize_rejects_unknown_format_before_rendering() {
        let tree = DocTree::new();
        let err = serialize(&tree, "yaml", IdentifierMatching::Ascii).unwrap_err();
        assert_eq!(err, SerializationError::unsupported_format("yaml"));
    }
}
