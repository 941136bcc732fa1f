//! Syntax trees produced by the parser
//!
//! - [`Node`] / [`Child`]: kind, byte span, ordered children with optional field labels
//! - [`SyntaxTree`]: the root node together with the source it was parsed from
//! - [`ParseError`]: furthest-failure diagnostics
//! - [`range`]: byte offset to line:column conversion

pub(crate) mod builder;
pub mod error;
pub mod node;
pub mod range;
pub mod tree;

pub use error::{format_source_context, ParseError, ParseErrorKind};
pub use node::{Child, Node};
pub use range::{Position, SourceLocation};
pub use tree::SyntaxTree;
