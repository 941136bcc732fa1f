//! Grammars as data
//!
//! Rule tables are plain maps from rule name to [`Expression`] tree. Two of them, a host
//! table and an embedded table, are merged with host precedence and validated by
//! [`GrammarBuilder::build`] into an immutable [`Grammar`] that the parsing engine
//! interprets.

pub mod error;
pub mod expression;
pub mod registry;
pub mod rule_table;
mod validation;

pub use error::GrammarError;
pub use expression::{
    alias, choice, field, lit, literals, optional, pat, repeat, repeat1, rule, seq, Expression,
};
pub use registry::{Grammar, GrammarBuilder};
pub use rule_table::{Origin, RuleTable};
