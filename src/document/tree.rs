#![allow(clippy::missing_panics_doc)]

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};
use crate::models::{Flow, NodeKind};

/// Handle of a node inside a [`DocTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

const ROOT: NodeId = NodeId(0);

/// Indentation of a node; the root sits below every real column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Indent {
    Root,
    Column(usize),
}

impl Indent {
    /// The indent `step` columns deeper than this one
    #[must_use]
    pub const fn deeper(self, step: usize) -> Self {
        match self {
            Self::Root => Self::Column(step),
            Self::Column(column) => Self::Column(column + step),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub indent: Indent,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, indent: Indent) -> Self {
        Self {
            kind,
            indent,
            parent: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Arena of document nodes plus the current insertion point
///
/// Nodes are never removed; a `NodeId` stays valid for the life of the tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocTree {
    nodes: Vec<Node>,
    current: Option<NodeId>,
}

impl DocTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            current: None,
        }
    }

    /// Create the root node; must be the first node of the tree
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::DuplicateRoot`] if the tree already has a root
    pub fn new_root(
        &mut self,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> ParseResult<NodeId> {
        if !self.nodes.is_empty() {
            return Err(ParseError::DuplicateRoot);
        }
        self.nodes.push(Node::new(
            NodeKind::Root {
                name: name.into(),
                content: content.into(),
            },
            Indent::Root,
        ));
        self.current = Some(ROOT);
        Ok(ROOT)
    }

    /// Insert a block at `indent` relative to the insertion point and move the
    /// insertion point to it
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingRoot`] before [`DocTree::new_root`] was called
    pub fn new_block(
        &mut self,
        name: impl Into<String>,
        content: impl Into<String>,
        indent: usize,
    ) -> ParseResult<NodeId> {
        let kind = NodeKind::Block {
            name: name.into(),
            content: content.into(),
        };
        let id = self.insert_at_indent(Node::new(kind, Indent::Column(indent)))?;
        self.current = Some(id);
        Ok(id)
    }

    /// Attach a paragraph flow to the insertion point
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingRoot`] before [`DocTree::new_root`] was called
    pub fn new_flow(&mut self, flow: Flow) -> ParseResult<NodeId> {
        self.attach_to_current(NodeKind::Flow { flow })
    }

    /// Attach verbatim codeblock text to the insertion point
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingRoot`] before [`DocTree::new_root`] was called
    pub fn new_pre(&mut self, text: impl Into<String>) -> ParseResult<NodeId> {
        self.attach_to_current(NodeKind::Pre { text: text.into() })
    }

    /// Attach a comment to the insertion point without moving it
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingRoot`] before [`DocTree::new_root`] was called
    pub fn new_comment(&mut self, content: impl Into<String>) -> ParseResult<NodeId> {
        self.attach_to_current(NodeKind::Comment {
            content: content.into(),
        })
    }

    /// Insert one record row at `indent` with one leaf child per field.
    ///
    /// The insertion point ends on the row's parent, so the next row at the same
    /// indent lands beside this one.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingRoot`] before [`DocTree::new_root`] was called
    pub fn new_record<I, K, V>(
        &mut self,
        element: &str,
        indent: usize,
        field_indent: usize,
        fields: I,
    ) -> ParseResult<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let row_indent = Indent::Column(indent);
        let row = self.insert_at_indent(Node::new(
            NodeKind::Block {
                name: element.to_string(),
                content: String::new(),
            },
            row_indent,
        ))?;
        for (name, content) in fields {
            let field = Node::new(
                NodeKind::Block {
                    name: name.into(),
                    content: content.into(),
                },
                row_indent.deeper(field_indent),
            );
            self.push_child(row, field);
        }
        self.current = self.nodes[row.0].parent;
        Ok(row)
    }

    fn attach_to_current(&mut self, kind: NodeKind) -> ParseResult<NodeId> {
        let current = self.current.ok_or(ParseError::MissingRoot)?;
        let indent = self.nodes[current.0].indent;
        Ok(self.push_child(current, Node::new(kind, indent)))
    }

    /// Place `node` using the indent rule:
    /// deeper than the insertion point becomes its child, equal becomes its
    /// sibling, shallower attaches to the nearest ancestor with a smaller indent.
    fn insert_at_indent(&mut self, node: Node) -> ParseResult<NodeId> {
        let current = self.current.ok_or(ParseError::MissingRoot)?;
        let current_node = &self.nodes[current.0];
        let parent = match current_node.indent.cmp(&node.indent) {
            Ordering::Less => current,
            Ordering::Equal => current_node.parent.unwrap_or(ROOT),
            Ordering::Greater => self
                .ancestors(current)
                .skip(1)
                .find(|id| self.nodes[id.0].indent < node.indent)
                .unwrap_or(ROOT),
        };
        Ok(self.push_child(parent, node))
    }

    fn push_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// `id` followed by each of its ancestors up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(Some(id), |id| self.nodes[id.0].parent)
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(ROOT)
    }

    /// The insertion point
    #[must_use]
    pub const fn current(&self) -> Option<NodeId> {
        self.current
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Flow { flow } => return fmt::Display::fmt(flow, f),
            NodeKind::Pre { text } => return write!(f, "[{text}]"),
            NodeKind::Comment { content } => return write!(f, "[#comment:'{content}']"),
            NodeKind::Root { name, content } => write!(f, "[{name}:'{content}'")?,
            NodeKind::Block { name, content } => {
                if let Indent::Column(column) = node.indent {
                    write!(f, "{:column$}", "")?;
                }
                write!(f, "[{name}:'{content}'")?;
            }
        }
        for &child in &node.children {
            writeln!(f)?;
            self.write_node(f, child)?;
        }
        f.write_str("]")
    }
}

/// Bracketed outline of the tree, one node per line
impl fmt::Display for DocTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => self.write_node(f, root),
            None => Ok(()),
        }
    }
}
