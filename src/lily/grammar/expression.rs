//! Grammar expressions
//!
//!     A grammar is data: every production is an [`Expression`] tree, and a single generic
//!     engine interprets it (see [parsing](crate::lily::parsing)). The builder functions at the
//!     bottom of this module (`seq`, `choice`, `repeat`, ...) give rule tables the look of a
//!     declarative grammar DSL:
//!
//!     ```text
//!     rest := seq("r", optional(field("duration", steno_duration)))
//!     ```
//!
//!     `RuleRef` is resolved by name when the engine reaches it, against whichever merged
//!     table the grammar was built from. That is what lets two rule tables refer to each
//!     other without being constructed in dependency order.

use std::collections::BTreeSet;
use std::fmt;

/// A node of a grammar expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// Exact text.
    Literal(String),
    /// A regular expression, matched anchored at the cursor.
    Pattern(String),
    /// All elements in order; extras are skipped around every element.
    Sequence(Vec<Expression>),
    /// Ordered choice: the first alternative that matches wins.
    Choice(Vec<Expression>),
    /// Zero or more, greedy.
    Repeat(Box<Expression>),
    /// One or more, greedy.
    Repeat1(Box<Expression>),
    /// Zero or one.
    Optional(Box<Expression>),
    /// Attach a field label to whatever nodes the inner expression produces.
    Field(String, Box<Expression>),
    /// Present the inner match under a different node kind.
    Alias(String, Box<Expression>),
    /// Invoke another rule by name.
    RuleRef(String),
}

impl Expression {
    /// Names of every rule this expression refers to, directly or through nesting.
    pub fn referenced_rules(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.walk(&mut |expr| {
            if let Expression::RuleRef(name) = expr {
                names.insert(name.as_str());
            }
        });
        names
    }

    /// Sources of every `Pattern` in this expression.
    pub fn patterns(&self) -> Vec<&str> {
        let mut found = Vec::new();
        self.walk(&mut |expr| {
            if let Expression::Pattern(source) = expr {
                found.push(source.as_str());
            }
        });
        found
    }

    /// True for expressions that consume text without ever invoking a rule.
    pub fn is_terminal(&self) -> bool {
        match self {
            Expression::Literal(_) | Expression::Pattern(_) => true,
            Expression::Sequence(items) | Expression::Choice(items) => {
                items.iter().all(Expression::is_terminal)
            }
            Expression::Repeat(inner)
            | Expression::Repeat1(inner)
            | Expression::Optional(inner) => inner.is_terminal(),
            Expression::Field(_, _) | Expression::Alias(_, _) | Expression::RuleRef(_) => false,
        }
    }

    /// Pre-order traversal.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Expression),
    {
        visit(self);
        match self {
            Expression::Literal(_) | Expression::Pattern(_) | Expression::RuleRef(_) => {}
            Expression::Sequence(items) | Expression::Choice(items) => {
                for item in items {
                    item.walk(visit);
                }
            }
            Expression::Repeat(inner)
            | Expression::Repeat1(inner)
            | Expression::Optional(inner)
            | Expression::Field(_, inner)
            | Expression::Alias(_, inner) => inner.walk(visit),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, items: &[Expression]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, ")")
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(text) => write!(f, "{:?}", text),
            Expression::Pattern(source) => write!(f, "/{}/", source),
            Expression::Sequence(items) => write_list(f, "seq", items),
            Expression::Choice(items) => write_list(f, "choice", items),
            Expression::Repeat(inner) => write!(f, "repeat({})", inner),
            Expression::Repeat1(inner) => write!(f, "repeat1({})", inner),
            Expression::Optional(inner) => write!(f, "optional({})", inner),
            Expression::Field(name, inner) => write!(f, "field({:?}, {})", name, inner),
            Expression::Alias(tag, inner) => write!(f, "alias({}, ${})", inner, tag),
            Expression::RuleRef(name) => write!(f, "${}", name),
        }
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn lit(text: impl Into<String>) -> Expression {
    Expression::Literal(text.into())
}

pub fn pat(source: impl Into<String>) -> Expression {
    Expression::Pattern(source.into())
}

pub fn seq(items: impl IntoIterator<Item = Expression>) -> Expression {
    Expression::Sequence(items.into_iter().collect())
}

pub fn choice(alternatives: impl IntoIterator<Item = Expression>) -> Expression {
    Expression::Choice(alternatives.into_iter().collect())
}

/// Ordered choice over plain literals, in the order given.
pub fn literals<'a>(texts: impl IntoIterator<Item = &'a str>) -> Expression {
    choice(texts.into_iter().map(lit))
}

pub fn repeat(inner: Expression) -> Expression {
    Expression::Repeat(Box::new(inner))
}

pub fn repeat1(inner: Expression) -> Expression {
    Expression::Repeat1(Box::new(inner))
}

pub fn optional(inner: Expression) -> Expression {
    Expression::Optional(Box::new(inner))
}

pub fn field(name: impl Into<String>, inner: Expression) -> Expression {
    Expression::Field(name.into(), Box::new(inner))
}

pub fn alias(tag: impl Into<String>, inner: Expression) -> Expression {
    Expression::Alias(tag.into(), Box::new(inner))
}

pub fn rule(name: impl Into<String>) -> Expression {
    Expression::RuleRef(name.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_reads_like_the_dsl() {
        let expr = seq(vec![
            lit("r"),
            optional(field("duration", rule("steno_duration"))),
        ]);
        assert_eq!(
            expr.to_string(),
            r#"seq("r", optional(field("duration", $steno_duration)))"#
        );
        assert_eq!(
            alias("prefix", pat("[#$]@?")).to_string(),
            "alias(/[#$]@?/, $prefix)"
        );
    }

    #[test]
    fn test_referenced_rules_are_collected_through_nesting() {
        let expr = choice(vec![
            rule("note"),
            seq(vec![lit("{"), repeat(rule("_music_list")), lit("}")]),
            field("x", alias("y", rule("note"))),
        ]);
        let names: Vec<_> = expr.referenced_rules().into_iter().collect();
        assert_eq!(names, vec!["_music_list", "note"]);
    }

    #[test]
    fn test_is_terminal() {
        assert!(literals(["a", "b"]).is_terminal());
        assert!(repeat1(lit("'")).is_terminal());
        assert!(!seq(vec![lit("a"), rule("b")]).is_terminal());
        assert!(!alias("x", pat("y")).is_terminal());
    }

    #[test]
    fn test_patterns_lists_every_pattern() {
        let expr = seq(vec![pat("[0-9]+"), optional(pat(r"\.*"))]);
        assert_eq!(expr.patterns(), vec!["[0-9]+", r"\.*"]);
    }
}
