//! Parse errors
//!
//! A parse either matches the requested rule over the whole input or fails. On failure the
//! engine reports the furthest offset any attempt reached, together with what was being
//! tried there, which is enough to render an "expected X, found Y" message. A parse that
//! nests rules deeper than its limit stops at the offending offset instead.

use super::range::{Position, SourceLocation};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    /// Nothing the grammar allows matches at `offset`
    Syntax,
    /// Rule invocations nested deeper than `limit`
    NestingTooDeep { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset of the furthest failure
    pub offset: usize,
    pub position: Position,
    /// Visible rules (and aliases) whose invocation started at `offset`
    pub expected_rules: BTreeSet<String>,
    /// Literal tokens that were tried at `offset`
    pub expected_tokens: BTreeSet<String>,
    /// What is actually at `offset`
    pub found: String,
    /// Numbered source excerpt around the failure
    pub context: String,
}

impl ParseError {
    pub(crate) fn new(
        source: &str,
        offset: usize,
        expected_rules: BTreeSet<String>,
        expected_tokens: BTreeSet<String>,
    ) -> Self {
        let position = SourceLocation::new(source).position(offset);
        let found = match source.get(offset..).and_then(|rest| rest.chars().next()) {
            None => "end of input".to_string(),
            Some(c) if c.is_whitespace() => "whitespace".to_string(),
            Some(c) => format!("'{}'", c),
        };
        Self {
            kind: ParseErrorKind::Syntax,
            offset,
            position,
            expected_rules,
            expected_tokens,
            found,
            context: format_source_context(source, position),
        }
    }

    pub(crate) fn nesting_too_deep(source: &str, offset: usize, limit: usize) -> Self {
        Self {
            kind: ParseErrorKind::NestingTooDeep { limit },
            ..Self::new(source, offset, BTreeSet::new(), BTreeSet::new())
        }
    }

    /// Everything that would have been accepted at the failure offset.
    pub fn expected(&self) -> Vec<String> {
        self.expected_rules
            .iter()
            .cloned()
            .chain(self.expected_tokens.iter().map(|token| format!("{:?}", token)))
            .collect()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let ParseErrorKind::NestingTooDeep { limit } = self.kind {
            writeln!(
                f,
                "Parse error at {}: rules nested deeper than {}",
                self.position, limit
            )?;
            writeln!(f)?;
            return write!(f, "{}", self.context);
        }
        let expected = self.expected();
        let expected = if expected.is_empty() {
            "valid input".to_string()
        } else {
            expected.join(" or ")
        };
        writeln!(
            f,
            "Parse error at {}: expected {}, found {}",
            self.position, expected, self.found
        )?;
        writeln!(f)?;
        write!(f, "{}", self.context)
    }
}

impl std::error::Error for ParseError {}

/// Format source code context around an error location
///
/// Shows 2 lines before the error, the error line with >> marker and a caret under the
/// failing column, and 2 lines after. All lines are numbered.
pub fn format_source_context(source: &str, position: Position) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = position.line;

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();
    for (line_num, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, line));
        if line_num == error_line {
            context.push_str(&format!("{}^\n", " ".repeat(9 + position.column)));
        }
    }
    context
}
