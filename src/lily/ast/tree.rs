//! A complete parse result

use super::node::Node;
use super::range::{Position, SourceLocation};
use crate::lily::parsing::ParseStats;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SyntaxTree {
    #[serde(skip)]
    source: String,
    root: Node,
    stats: ParseStats,
}

impl SyntaxTree {
    pub(crate) fn new(source: &str, root: Node, stats: ParseStats) -> Self {
        Self {
            source: source.to_string(),
            root,
            stats,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    pub fn text(&self, node: &Node) -> &str {
        node.text(&self.source)
    }

    pub fn position(&self, offset: usize) -> Position {
        SourceLocation::new(&self.source).position(offset)
    }

    pub fn to_sexp(&self) -> String {
        self.root.to_sexp()
    }

    /// The same tree with comments and other extras dropped.
    pub fn without_extras(&self) -> SyntaxTree {
        SyntaxTree {
            source: self.source.clone(),
            root: self.root.without_extras(),
            stats: self.stats,
        }
    }

    /// All nodes of the given kind, in document order.
    pub fn find_all(&self, kind: &str) -> Vec<&Node> {
        self.root.find_all(kind)
    }
}
