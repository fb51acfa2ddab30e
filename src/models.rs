use core::fmt;

use serde::{Deserialize, Serialize};

/// Kind of an inline decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum DecorationKind {
    Bold,
    Italic,
}

impl DecorationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
        }
    }
}

impl fmt::Display for DecorationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `[text](type "canonical" (namespace))`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Annotation {
    pub annotation_type: String,
    pub text: String,
    pub canonical: Option<String>,
    pub namespace: Option<String>,
}

impl Annotation {
    #[must_use]
    pub fn new(annotation_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            text: text.into(),
            canonical: None,
            namespace: None,
        }
    }

    #[must_use]
    pub fn with_canonical(mut self, canonical: impl Into<String>) -> Self {
        self.canonical = Some(canonical.into());
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]({} \"{}\" ({}))",
            self.text,
            self.annotation_type,
            self.canonical.as_deref().unwrap_or_default(),
            self.namespace.as_deref().unwrap_or_default()
        )
    }
}

/// `*bold*` or `_italic_` text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub text: String,
}

impl Decoration {
    #[must_use]
    pub fn new(kind: DecorationKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]({})", self.text, self.kind)
    }
}

/// One item of a paragraph flow
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Inline {
    Text(String),
    Annotation(Annotation),
    Decoration(Decoration),
}

impl fmt::Display for Inline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Annotation(annotation) => annotation.fmt(f),
            Self::Decoration(decoration) => decoration.fmt(f),
        }
    }
}

/// Ordered inline content of a paragraph
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Flow {
    items: Vec<Inline>,
}

impl Flow {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item; empty text spans are dropped
    pub fn push(&mut self, item: Inline) {
        if matches!(&item, Inline::Text(text) if text.is_empty()) {
            return;
        }
        self.items.push(item);
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.push(Inline::Text(text.into()));
    }

    #[must_use]
    pub fn items(&self) -> &[Inline] {
        &self.items
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for item in &self.items {
            item.fmt(f)?;
        }
        f.write_str("]")
    }
}

/// Payload of a document tree node
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum NodeKind {
    /// The `sam:` declaration; never rendered
    Root { name: String, content: String },
    Block { name: String, content: String },
    Comment { content: String },
    Flow { flow: Flow },
    /// Verbatim codeblock body
    Pre { text: String },
}

impl NodeKind {
    /// Element name for roots and blocks
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Root { name, .. } | Self::Block { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Content string for roots, blocks and comments
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Root { content, .. }
            | Self::Block { content, .. }
            | Self::Comment { content } => Some(content),
            _ => None,
        }
    }

    /// Flows and pre-formatted text hold inline items rather than child blocks
    #[must_use]
    pub const fn is_inline_holder(&self) -> bool {
        matches!(self, Self::Flow { .. } | Self::Pre { .. })
    }
}

macro_rules! impl_kind_helpers {
    ($($variant:ident),*) => {
        $(
            impl NodeKind {
                paste::paste! {
                    #[must_use]
                    pub const fn [<is_ $variant:snake>](&self) -> bool {
                        matches!(self, Self::$variant { .. })
                    }
                }
            }
        )*
    };
}

impl_kind_helpers!(Root, Block, Comment, Flow, Pre);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_text_is_dropped() {
        let mut flow = Flow::new();
        flow.push_text("");
        assert!(flow.is_empty());

        flow.push_text("a");
        flow.push_text(String::new());
        assert_eq!(flow.len(), 1);
    }

    #[test]
    fn structured_items_are_kept() {
        let mut flow = Flow::new();
        flow.push(Inline::Decoration(Decoration::new(DecorationKind::Bold, "x")));
        flow.push(Inline::Annotation(Annotation::new("link", "y")));
        assert_eq!(flow.len(), 2);
    }

    #[test]
    fn flow_display_matches_outline_form() {
        let mut flow = Flow::new();
        flow.push_text("see ");
        flow.push(Inline::Annotation(
            Annotation::new("country", "Spain")
                .with_canonical("ES")
                .with_namespace("geo"),
        ));
        flow.push_text(" and ");
        flow.push(Inline::Decoration(Decoration::new(DecorationKind::Italic, "this")));
        assert_eq!(
            flow.to_string(),
            r#"[see [Spain](country "ES" (geo)) and [this](italic)]"#
        );
    }

    #[test]
    fn kind_helpers() {
        let pre = NodeKind::Pre {
            text: String::new(),
        };
        assert!(pre.is_pre());
        assert!(pre.is_inline_holder());
        assert!(!pre.is_block());
        assert_eq!(pre.name(), None);

        let block = NodeKind::Block {
            name: "section".into(),
            content: "intro".into(),
        };
        assert!(block.is_block());
        assert_eq!(block.name(), Some("section"));
        assert_eq!(block.content(), Some("intro"));
    }

    proptest! {
        #[test]
        fn pushing_empty_text_never_grows_flow(
            texts in proptest::collection::vec(".{0,4}", 0..20),
        ) {
            let mut flow = Flow::new();
            for text in texts {
                let before = flow.len();
                let empty = text.is_empty();
                flow.push_text(text);
                if empty {
                    prop_assert_eq!(flow.len(), before);
                } else {
                    prop_assert_eq!(flow.len(), before + 1);
                }
            }
        }
    }
}
