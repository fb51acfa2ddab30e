//! XML rendering of a document tree
//!
//! Output is produced lazily: [`XmlFragments`] walks the tree with an explicit
//! stack and yields one fragment at a time, borrowing text from the tree where it
//! can.

use std::borrow::Cow;

use crate::config::{IdentifierMatching, IdentifierPatterns};
use crate::document::{DocTree, NodeId};
use crate::formats::DocumentSerializer;
use crate::models::{Annotation, Decoration, Flow, Inline, NodeKind};

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlSerializer {
    matching: IdentifierMatching,
}

impl XmlSerializer {
    #[must_use]
    pub const fn new(matching: IdentifierMatching) -> Self {
        Self { matching }
    }
}

impl Default for XmlSerializer {
    fn default() -> Self {
        Self::new(IdentifierMatching::detect())
    }
}

impl DocumentSerializer for XmlSerializer {
    fn fragments<'a>(&'a self, tree: &'a DocTree) -> Box<dyn Iterator<Item = Cow<'a, str>> + 'a> {
        Box::new(XmlFragments::new(tree, self.matching.patterns()))
    }
}

enum Step<'a> {
    Visit(NodeId),
    Emit(Cow<'a, str>),
}

/// Depth-first fragment iterator over a [`DocTree`]
pub struct XmlFragments<'a> {
    tree: &'a DocTree,
    patterns: &'static IdentifierPatterns,
    stack: Vec<Step<'a>>,
}

impl<'a> XmlFragments<'a> {
    #[must_use]
    pub fn new(tree: &'a DocTree, patterns: &'static IdentifierPatterns) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.extend(tree.children(root).iter().rev().map(|&id| Step::Visit(id)));
        }
        stack.push(Step::Emit(Cow::Borrowed(DECLARATION)));
        Self { tree, patterns, stack }
    }

    fn expand(&mut self, id: NodeId) {
        let tree = self.tree;
        let node = tree.node(id);
        let mut steps = Vec::new();

        match &node.kind {
            NodeKind::Root { .. } => {
                steps.extend(node.children().iter().map(|&child| Step::Visit(child)));
            }
            NodeKind::Comment { content } => {
                steps.push(Step::Emit(Cow::Owned(format!("<!-- {content} -->\n"))));
            }
            NodeKind::Pre { text } => {
                steps.push(Step::Emit(Cow::Borrowed("<![CDATA[")));
                steps.push(Step::Emit(Cow::Borrowed(text)));
                steps.push(Step::Emit(Cow::Borrowed("]]>")));
            }
            NodeKind::Flow { flow } => {
                steps.extend(flow_fragments(flow).map(Step::Emit));
            }
            NodeKind::Block { name, content } => match node.children().first() {
                None => steps.push(Step::Emit(Cow::Owned(format!("<{name}>{content}</{name}>\n")))),
                Some(&first) => {
                    let first_kind = &tree.node(first).kind;
                    steps.push(Step::Emit(Cow::Owned(self.open_tag(name, content, first_kind))));
                    steps.extend(node.children().iter().map(|&child| Step::Visit(child)));
                    steps.push(Step::Emit(Cow::Owned(format!("</{name}>\n"))));
                }
            },
        }

        self.stack.extend(steps.into_iter().rev());
    }

    /// Opening tag of a block with children, plus whatever its content renders as
    fn open_tag(&self, name: &str, content: &str, first_child: &NodeKind) -> String {
        if name == "codeblock" && (!content.is_empty() || first_child.is_pre()) {
            return format!("<{name} language=\"{content}\">");
        }
        if content.is_empty() {
            return if first_child.is_inline_holder() {
                format!("<{name}>")
            } else {
                format!("<{name}>\n")
            };
        }
        if self.patterns.id.is_match(content) {
            return format!("<{name}>\n<id>{content}</id>\n");
        }
        if let Some(caps) = self.patterns.id_and_label.captures(content) {
            return format!("<{name}>\n<id>{}</id>\n<label>{}</label>\n", &caps[1], &caps[2]);
        }
        format!("<{name}>\n<title>{content}</title>\n")
    }
}

impl<'a> Iterator for XmlFragments<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stack.pop()? {
                Step::Emit(fragment) => return Some(fragment),
                Step::Visit(id) => self.expand(id),
            }
        }
    }
}

fn flow_fragments(flow: &Flow) -> impl Iterator<Item = Cow<'_, str>> {
    flow.items().iter().map(|item| match item {
        Inline::Text(text) => escape_text(text),
        Inline::Annotation(annotation) => Cow::Owned(annotation_xml(annotation)),
        Inline::Decoration(decoration) => Cow::Owned(decoration_xml(decoration)),
    })
}

/// Replace `&`, `<` and `>` with their entities; borrows when nothing changes
fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn annotation_xml(annotation: &Annotation) -> String {
    let mut xml = format!("<annotation type=\"{}\"", annotation.annotation_type);
    if let Some(canonical) = &annotation.canonical {
        xml.push_str(&format!(" canonical=\"{canonical}\""));
    }
    if let Some(namespace) = &annotation.namespace {
        xml.push_str(&format!(" namespace=\"{namespace}\""));
    }
    xml.push_str(&format!(">{}</annotation>", annotation.text));
    xml
}

fn decoration_xml(decoration: &Decoration) -> String {
    format!(
        "<decoration type=\"{}\">{}</decoration>",
        decoration.kind, decoration.text
    )
}
