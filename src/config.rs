//! Parser configuration and runtime capabilities

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parser::ListKind;

/// Element names and indent offsets used while building the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct SamConfig {
    /// Container element for `*` lists
    pub list_element: String,
    /// Container element for `1.` lists
    pub numbered_list_element: String,
    /// Element for each list item
    pub item_element: String,
    /// Indent offset of an item below its list container
    pub item_indent: u32,
    /// Indent offset of a record field below its row
    pub field_indent: u32,
}

impl Default for SamConfig {
    fn default() -> Self {
        Self {
            list_element: "ul".to_string(),
            numbered_list_element: "ul".to_string(),
            item_element: "li".to_string(),
            item_indent: 4,
            field_indent: 4,
        }
    }
}

impl SamConfig {
    /// Use a distinct container element for numbered lists
    #[must_use]
    pub fn with_numbered_list_element(mut self, element: impl Into<String>) -> Self {
        self.numbered_list_element = element.into();
        self
    }

    /// Container element for the given list kind
    #[must_use]
    pub fn list_element_for(&self, kind: ListKind) -> &str {
        match kind {
            ListKind::Bullet => &self.list_element,
            ListKind::Numbered => &self.numbered_list_element,
        }
    }
}

/// How block content is tested for identifier shape during serialization
///
/// `Unicode` accepts any lowercase letter (`\p{Ll}`) as the first character,
/// `Ascii` only `a-z`. Both accept a leading underscore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum IdentifierMatching {
    Unicode,
    Ascii,
}

/// Compiled id and id-plus-label patterns for one matching mode
#[derive(Debug)]
pub struct IdentifierPatterns {
    pub id: Regex,
    pub id_and_label: Regex,
}

impl IdentifierPatterns {
    fn compile(first_char: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            id: Regex::new(&format!(r"^{first_char}\S*$"))?,
            id_and_label: Regex::new(&format!(r#"^({first_char}\S*)\s*["'](.+)["']$"#))?,
        })
    }
}

static UNICODE_PATTERNS: Lazy<Option<IdentifierPatterns>> =
    Lazy::new(|| IdentifierPatterns::compile(r"[\p{Ll}_]").ok());

static ASCII_PATTERNS: Lazy<IdentifierPatterns> = Lazy::new(|| {
    IdentifierPatterns::compile("[a-z_]").expect("ASCII identifier patterns are valid")
});

static DETECTED: Lazy<IdentifierMatching> = Lazy::new(|| {
    if UNICODE_PATTERNS.is_some() {
        IdentifierMatching::Unicode
    } else {
        log::warn!(
            "Regular expression support for Unicode categories not available. \
             IDs starting with non-ASCII lowercase letters will not be recognized \
             and will be treated as titles."
        );
        IdentifierMatching::Ascii
    }
});

impl IdentifierMatching {
    /// Probe the regex engine once per process
    #[must_use]
    pub fn detect() -> Self {
        *DETECTED
    }

    /// Patterns for this mode, falling back to ASCII if Unicode classes are missing
    #[must_use]
    pub fn patterns(self) -> &'static IdentifierPatterns {
        match self {
            Self::Unicode => UNICODE_PATTERNS.as_ref().unwrap_or(&ASCII_PATTERNS),
            Self::Ascii => &ASCII_PATTERNS,
        }
    }
}

impl Default for IdentifierMatching {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_shares_list_element() {
        let config = SamConfig::default();
        assert_eq!(config.list_element_for(ListKind::Bullet), "ul");
        assert_eq!(config.list_element_for(ListKind::Numbered), "ul");
    }

    #[test]
    fn numbered_list_element_can_differ() {
        let config = SamConfig::default().with_numbered_list_element("ol");
        assert_eq!(config.list_element_for(ListKind::Numbered), "ol");
        assert_eq!(config.list_element_for(ListKind::Bullet), "ul");
    }

    #[test]
    fn regex_engine_supports_unicode_classes() {
        assert_eq!(IdentifierMatching::detect(), IdentifierMatching::Unicode);
    }

    #[test]
    fn unicode_mode_accepts_non_ascii_lowercase() {
        let patterns = IdentifierMatching::Unicode.patterns();
        assert!(patterns.id.is_match("éclair"));
        assert!(!IdentifierMatching::Ascii.patterns().id.is_match("éclair"));
    }

    #[test]
    fn id_and_label_captures_both_parts() {
        let caps = IdentifierMatching::Ascii
            .patterns()
            .id_and_label
            .captures(r#"intro "Introduction""#)
            .unwrap();
        assert_eq!(&caps[1], "intro");
        assert_eq!(&caps[2], "Introduction");
    }
}
