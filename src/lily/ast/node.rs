//! Syntax tree nodes
//!
//! A [`Node`] is produced for every invocation of a visible (not `_`-prefixed) rule and for
//! every alias. Anonymous literals and patterns are consumed without leaving a node. Each
//! child may carry the field label it was captured under.
//!
//! Extras that the grammar keeps addressable (comments, version statements) appear as
//! ordinary children flagged `extra`, at their textual position.

use serde::Serialize;
use std::ops::Range as ByteRange;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: String,
    pub span: ByteRange<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Child>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub extra: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Child {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(flatten)]
    pub node: Node,
}

impl Child {
    pub fn new(node: Node) -> Self {
        Self { field: None, node }
    }
}

impl Node {
    pub fn new(kind: impl Into<String>, span: ByteRange<usize>, children: Vec<Child>) -> Self {
        Self {
            kind: kind.into(),
            span,
            children,
            extra: false,
        }
    }

    pub fn leaf(kind: impl Into<String>, span: ByteRange<usize>) -> Self {
        Self::new(kind, span, Vec::new())
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is_extra(&self) -> bool {
        self.extra
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Child nodes that are not extras.
    pub fn named_children(&self) -> impl Iterator<Item = &Node> {
        self.children
            .iter()
            .map(|child| &child.node)
            .filter(|node| !node.extra)
    }

    pub fn child_by_field(&self, field: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|child| child.field.as_deref() == Some(field))
            .map(|child| &child.node)
    }

    pub fn children_by_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children
            .iter()
            .filter(move |child| child.field.as_deref() == Some(field))
            .map(|child| &child.node)
    }

    /// The source text this node covers.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.span.clone()).unwrap_or("")
    }

    /// This node and every node below it, in pre-order.
    pub fn descendants(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            for child in node.children.iter().rev() {
                stack.push(&child.node);
            }
        }
        out
    }

    pub fn find_all<'a>(&'a self, kind: &str) -> Vec<&'a Node> {
        self.descendants()
            .into_iter()
            .filter(|node| node.kind == kind)
            .collect()
    }

    /// Tree-sitter style s-expression, with field labels.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        out.push_str(&self.kind);
        for child in &self.children {
            out.push(' ');
            if let Some(field) = &child.field {
                out.push_str(field);
                out.push_str(": ");
            }
            child.node.write_sexp(out);
        }
        out.push(')');
    }

    /// A copy of this subtree with extra nodes removed at every level.
    pub fn without_extras(&self) -> Node {
        Node {
            kind: self.kind.clone(),
            span: self.span.clone(),
            children: self
                .children
                .iter()
                .filter(|child| !child.node.extra)
                .map(|child| Child {
                    field: child.field.clone(),
                    node: child.node.without_extras(),
                })
                .collect(),
            extra: self.extra,
        }
    }

    /// Kind-and-field skeleton without spans or extras; two parses of the same document
    /// with different spacing or comments have the same shape.
    pub fn shape(&self) -> String {
        let mut out = String::new();
        self.write_shape(&mut out);
        out
    }

    fn write_shape(&self, out: &mut String) {
        out.push('(');
        out.push_str(&self.kind);
        for child in self.children.iter().filter(|child| !child.node.extra) {
            out.push(' ');
            if let Some(field) = &child.field {
                out.push_str(field);
                out.push_str(": ");
            }
            child.node.write_shape(out);
        }
        out.push(')');
    }
}
