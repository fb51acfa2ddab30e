//! In-memory document tree built by the parser

pub mod tree;

pub use tree::{DocTree, Indent, Node, NodeId};
