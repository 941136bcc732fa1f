//! Output formats for syntax trees
//!
//! - `sexp`: tree-sitter style s-expression
//! - `treeviz`: one line per node, indented
//! - `json` / `yaml`: the serde form of the tree

pub mod registry;
pub mod sexp;
pub mod structured;
pub mod treeviz;

pub use registry::{FormatError, FormatRegistry, Formatter, FORMATS};
pub use sexp::SexpFormatter;
pub use structured::{JsonFormatter, YamlFormatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
