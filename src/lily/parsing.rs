//! Parsing
//!
//! Turns source text into a [`SyntaxTree`](crate::lily::ast::SyntaxTree) by interpreting a
//! [`Grammar`](crate::lily::grammar::Grammar) directly:
//!
//! - `lexical`: literal and pattern tokens at an offset
//! - `engine`: the combinator interpreter, extras skipping and packrat memo
//! - `failure`: furthest-failure bookkeeping for diagnostics
//! - `api`: [`Parser`], [`ParseOptions`] and the [`parse`] shortcut

mod api;
mod engine;
mod failure;
mod lexical;

pub use api::{parse, ParseOptions, Parser};
pub use engine::{ParseStats, DEFAULT_MAX_DEPTH};
