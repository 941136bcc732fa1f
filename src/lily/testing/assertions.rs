//! Fluent assertion API for syntax trees

use super::matchers::TextMatch;
use crate::lily::ast::{Node, SyntaxTree};
use std::ops::Range;

// ============================================================================
// Entry Point
// ============================================================================

/// Start asserting on the root node of a parsed tree.
pub fn assert_tree(tree: &SyntaxTree) -> NodeAssertion<'_> {
    NodeAssertion {
        tree,
        node: tree.root(),
        context: tree.root().kind().to_string(),
    }
}

// ============================================================================
// Node Assertions
// ============================================================================

pub struct NodeAssertion<'a> {
    tree: &'a SyntaxTree,
    node: &'a Node,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn kind(self, expected: &str) -> Self {
        assert_eq!(
            self.node.kind(),
            expected,
            "{}: Expected node kind '{}', found '{}'",
            self.context,
            expected,
            self.node.kind()
        );
        self
    }

    pub fn text(self, expected: impl Into<TextMatch>) -> Self {
        expected
            .into()
            .assert(self.tree.text(self.node), &self.context);
        self
    }

    pub fn span(self, expected: Range<usize>) -> Self {
        assert_eq!(
            self.node.span, expected,
            "{}: Expected span {:?}, found {:?}",
            self.context, expected, self.node.span
        );
        self
    }

    /// Assert the number of non-extra children
    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.node.named_children().count();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} children, found {}: [{}]",
            self.context,
            expected,
            actual,
            summarize(self.node)
        );
        self
    }

    /// Assert the number of extra children (comments, version statements)
    pub fn extra_count(self, expected: usize) -> Self {
        let actual = self.node.children().iter().filter(|c| c.node.is_extra()).count();
        assert_eq!(
            actual, expected,
            "{}: Expected {} extras, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn is_extra(self) -> Self {
        assert!(
            self.node.is_extra(),
            "{}: Expected an extra node",
            self.context
        );
        self
    }

    /// Assert on the `index`th non-extra child
    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let tree = self.tree;
        let node: &'a Node = self.node;
        let child = node.named_children().nth(index).unwrap_or_else(|| {
            panic!(
                "{}: Child index {} out of bounds: [{}]",
                self.context,
                index,
                summarize(node)
            )
        });
        assertion(NodeAssertion {
            tree,
            node: child,
            context: format!("{}[{}]", self.context, index),
        });
        self
    }

    /// Assert on the `index`th child of any kind, extras included
    pub fn raw_child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let node: &'a Node = self.node;
        let child = node.children().get(index).unwrap_or_else(|| {
            panic!(
                "{}: Raw child index {} out of bounds ({} children)",
                self.context,
                index,
                node.children().len()
            )
        });
        assertion(NodeAssertion {
            tree: self.tree,
            node: &child.node,
            context: format!("{}.children[{}]", self.context, index),
        });
        self
    }

    pub fn field<F>(self, name: &str, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let node: &'a Node = self.node;
        let child = node.child_by_field(name).unwrap_or_else(|| {
            panic!(
                "{}: Expected field '{}' in [{}]",
                self.context,
                name,
                summarize(node)
            )
        });
        assertion(NodeAssertion {
            tree: self.tree,
            node: child,
            context: format!("{}.{}", self.context, name),
        });
        self
    }

    pub fn no_field(self, name: &str) -> Self {
        assert!(
            self.node.child_by_field(name).is_none(),
            "{}: Expected no field '{}'",
            self.context,
            name
        );
        self
    }
}

fn summarize(node: &Node) -> String {
    node.children()
        .iter()
        .map(|child| match &child.field {
            Some(field) => format!("{}: {}", field, child.node.kind()),
            None => child.node.kind().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
