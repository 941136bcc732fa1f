//! AST building
//!
//!     The engine never builds nodes itself. Every successful match returns a [`Fragment`]:
//!     where it ended, which bytes it actually consumed as tokens (its *significant* range,
//!     extras excluded) and the parts it produced so far. The functions here turn
//!     fragments into nodes:
//!
//!     - terminals produce no parts, only a significant range
//!     - `field` labels the fragment's non-extra parts
//!     - `alias` renames a single produced node, or wraps the whole match in a new one
//!     - a visible rule wraps its fragment into one node; extras found at the leading or
//!       trailing edge are hoisted out so the node's span starts and ends on real tokens
//!     - a hidden (`_`-prefixed) rule passes its fragment through untouched
//!
//!     While parsing, finished subtrees are reference counted. A fragment clone (a packrat
//!     memo entry or a memo hit) copies only its top-level parts. [`root`] turns the shared
//!     tree into owned [`Node`]s once the parse has succeeded.

use super::node::{Child, Node};
use std::ops::Range as ByteRange;
use std::rc::Rc;

/// A finished node, shared between every fragment that contains it.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Built {
    pub kind: String,
    pub span: ByteRange<usize>,
    pub children: Vec<Part>,
}

/// A node as seen from its parent: label and extra flag belong to the position, not to the
/// shared node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Part {
    pub field: Option<String>,
    pub extra: bool,
    pub node: Rc<Built>,
}

impl Part {
    fn new(kind: &str, span: ByteRange<usize>, children: Vec<Part>) -> Self {
        Self {
            field: None,
            extra: false,
            node: Rc::new(Built {
                kind: kind.to_string(),
                span,
                children,
            }),
        }
    }

    fn to_child(&self) -> Child {
        // as deep as the parse went, which may be deeper than the caller's stack allows
        stacker::maybe_grow(64 * 1024, 1024 * 1024, || Child {
            field: self.field.clone(),
            node: Node {
                kind: self.node.kind.clone(),
                span: self.node.span.clone(),
                children: self.node.children.iter().map(Part::to_child).collect(),
                extra: self.extra,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fragment {
    pub end: usize,
    pub significant: Option<ByteRange<usize>>,
    pub parts: Vec<Part>,
}

impl Fragment {
    /// A zero-width success at `at`.
    pub fn empty(at: usize) -> Self {
        Self {
            end: at,
            significant: None,
            parts: Vec::new(),
        }
    }

    /// A consumed terminal.
    pub fn token(span: ByteRange<usize>) -> Self {
        let significant = if span.is_empty() {
            None
        } else {
            Some(span.clone())
        };
        Self {
            end: span.end,
            significant,
            parts: Vec::new(),
        }
    }

    /// Extras skipped at a boundary: they advance the cursor but are not significant.
    pub fn extras(end: usize, mut parts: Vec<Part>) -> Self {
        for part in &mut parts {
            part.extra = true;
        }
        Self {
            end,
            significant: None,
            parts,
        }
    }

    /// Continue this fragment with one that starts where it ended.
    pub fn append(&mut self, next: Fragment) {
        self.end = next.end;
        self.significant = match (self.significant.take(), next.significant) {
            (Some(a), Some(b)) => Some(a.start.min(b.start)..a.end.max(b.end)),
            (a, b) => a.or(b),
        };
        self.parts.extend(next.parts);
    }
}

pub(crate) fn is_hidden(rule: &str) -> bool {
    rule.starts_with('_')
}

/// Label every non-extra part that has no label yet.
pub(crate) fn label(mut fragment: Fragment, field: &str) -> Fragment {
    for part in &mut fragment.parts {
        if !part.extra && part.field.is_none() {
            part.field = Some(field.to_string());
        }
    }
    fragment
}

/// Present the match as a node of kind `tag`.
pub(crate) fn alias(fragment: Fragment, tag: &str, start: usize) -> Fragment {
    let produced: Vec<usize> = fragment
        .parts
        .iter()
        .enumerate()
        .filter(|(_, part)| !part.extra)
        .map(|(i, _)| i)
        .collect();
    if let [only] = produced.as_slice() {
        let mut fragment = fragment;
        let part = &mut fragment.parts[*only];
        part.node = Rc::new(Built {
            kind: tag.to_string(),
            span: part.node.span.clone(),
            children: part.node.children.clone(),
        });
        return fragment;
    }
    wrap(fragment, tag, start)
}

/// Wrap a rule's fragment into a node, hoisting edge extras.
pub(crate) fn rule_node(fragment: Fragment, rule: &str, start: usize) -> Fragment {
    if is_hidden(rule) {
        return fragment;
    }
    wrap(fragment, rule, start)
}

fn wrap(fragment: Fragment, kind: &str, start: usize) -> Fragment {
    let Fragment {
        end,
        significant,
        parts,
    } = fragment;
    let span = significant.clone().unwrap_or(start..start);

    let mut leading = Vec::new();
    let mut inner = Vec::new();
    let mut trailing = Vec::new();
    for part in parts {
        if part.extra && part.node.span.end <= span.start {
            leading.push(part);
        } else if part.extra && part.node.span.start >= span.end {
            trailing.push(part);
        } else {
            inner.push(part);
        }
    }

    let mut parts = leading;
    parts.push(Part::new(kind, span, inner));
    parts.extend(trailing);
    Fragment {
        end,
        significant,
        parts,
    }
}

/// The single root node of a complete parse. Extras before and after the start rule become
/// its first and last children, and its span covers the whole input.
pub(crate) fn root(fragment: Fragment, rule: &str, source_len: usize) -> Node {
    let visible: Vec<usize> = fragment
        .parts
        .iter()
        .enumerate()
        .filter(|(_, part)| !part.extra)
        .map(|(i, _)| i)
        .collect();

    let parts: Vec<&Part> = match visible.as_slice() {
        [only] if fragment.parts[*only].node.kind == rule => {
            let (before, rest) = fragment.parts.split_at(*only);
            before
                .iter()
                .chain(rest[0].node.children.iter())
                .chain(rest[1..].iter())
                .collect()
        }
        _ => fragment.parts.iter().collect(),
    };
    Node::new(
        rule,
        0..source_len,
        parts.into_iter().map(Part::to_child).collect(),
    )
}
