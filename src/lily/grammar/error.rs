//! Grammar configuration errors
//!
//! These are raised while a [`Grammar`](super::Grammar) is being built, never during a parse.
//! A grammar that fails to build is unusable; nothing is parsed with it.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// The same rule name was defined twice in one table
    DuplicateRule { table: String, rule: String },
    /// A `RuleRef` (or the start rule, or an extra) names a rule the merged table lacks
    UndefinedRule { rule: String, referenced_from: String },
    /// A pattern failed to compile
    InvalidPattern {
        rule: String,
        pattern: String,
        message: String,
    },
    /// A `Repeat`/`Repeat1` whose body can succeed without consuming input
    EmptyRepetition { rule: String },
    /// Rules that can reach themselves without consuming input
    LeftRecursion { cycle: Vec<String> },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::DuplicateRule { table, rule } => {
                write!(f, "Rule '{}' is defined twice in table '{}'", rule, table)
            }
            GrammarError::UndefinedRule {
                rule,
                referenced_from,
            } => write!(
                f,
                "Undefined rule '{}' referenced from '{}'",
                rule, referenced_from
            ),
            GrammarError::InvalidPattern {
                rule,
                pattern,
                message,
            } => write!(
                f,
                "Invalid pattern /{}/ in rule '{}': {}",
                pattern, rule, message
            ),
            GrammarError::EmptyRepetition { rule } => write!(
                f,
                "Rule '{}' repeats an expression that can match empty input",
                rule
            ),
            GrammarError::LeftRecursion { cycle } => write!(
                f,
                "Left recursion without consuming input: {}",
                cycle.join(" -> ")
            ),
        }
    }
}

impl std::error::Error for GrammarError {}
