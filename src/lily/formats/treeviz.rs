//! Treeviz formatter
//!
//! One line per node, with box-drawing connectors for nesting:
//!
//!     └─ source_file: { c4 }
//!       └─ music: { c4 }
//!         └─ note: c4
//!           ├─ name: note_name: c
//!           └─ duration: steno_duration: 4
//!
//! Field labels precede the kind, extras are marked with `~`, and node text is truncated to
//! 30 characters with line breaks shown as `↵`.

use super::registry::{FormatError, Formatter};
use crate::lily::ast::{Child, Node, SyntaxTree};

const MAX_LABEL: usize = 30;

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, tree: &SyntaxTree) -> Result<String, FormatError> {
        Ok(to_treeviz_str(tree))
    }

    fn description(&self) -> &str {
        "One line per node with tree connectors"
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    let flat = s.replace('\n', "↵");
    if flat.chars().count() > max_chars {
        let mut truncated = flat.chars().take(max_chars).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        flat
    }
}

pub fn to_treeviz_str(tree: &SyntaxTree) -> String {
    let mut result = String::new();
    append_node(&mut result, tree, tree.root(), None, "", true);
    result
}

fn append_node(
    result: &mut String,
    tree: &SyntaxTree,
    node: &Node,
    field: Option<&str>,
    prefix: &str,
    is_last: bool,
) {
    let connector = if is_last { "└─" } else { "├─" };
    let marker = if node.is_extra() { "~" } else { "" };
    let field = field.map(|f| format!("{}: ", f)).unwrap_or_default();
    let label = truncate(tree.text(node), MAX_LABEL);

    result.push_str(&format!(
        "{}{} {}{}{}: {}\n",
        prefix, connector, field, marker, node.kind(), label
    ));

    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    append_children(result, tree, node.children(), &new_prefix);
}

fn append_children(result: &mut String, tree: &SyntaxTree, children: &[Child], prefix: &str) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        append_node(result, tree, &child.node, child.field.as_deref(), prefix, is_last);
    }
}
