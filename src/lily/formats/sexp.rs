//! S-expression output
//!
//! `(kind field: (child) ...)`, one line, the same notation tree-sitter test corpora use.

use super::registry::{FormatError, Formatter};
use crate::lily::ast::SyntaxTree;

pub struct SexpFormatter;

impl Formatter for SexpFormatter {
    fn name(&self) -> &str {
        "sexp"
    }

    fn serialize(&self, tree: &SyntaxTree) -> Result<String, FormatError> {
        Ok(tree.to_sexp())
    }

    fn description(&self) -> &str {
        "S-expression with field labels"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lily::parsing::parse;

    #[test]
    fn test_sexp_output() {
        let tree = parse("{ r4 % rest\n }").unwrap();
        insta::assert_snapshot!(
            SexpFormatter.serialize(&tree).unwrap(),
            @"(source_file (music (rest duration: (steno_duration)) (comment)))"
        );
    }
}
