//! Public parse entry points

use super::engine::{Engine, DEFAULT_MAX_DEPTH};
use crate::lily::ast::{ParseError, SyntaxTree};
use crate::lily::grammar::{Grammar, GrammarError};
use crate::lily::languages;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Rule to match against the whole input; the grammar's start rule when `None`
    pub start_rule: Option<String>,
    /// Packrat memoization of rule results, scoped to one parse
    pub memoize: bool,
    /// Deepest rule nesting accepted before the parse fails
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            start_rule: None,
            memoize: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A configured parser over a shared grammar.
///
/// The parser holds no per-parse state, so one parser can serve any number of parses,
/// including concurrent ones from different threads.
#[derive(Debug, Clone)]
pub struct Parser<'g> {
    grammar: &'g Grammar,
    start: &'g str,
    memoize: bool,
    max_depth: usize,
}

impl<'g> Parser<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            start: grammar.start_rule(),
            memoize: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_options(grammar: &'g Grammar, options: &ParseOptions) -> Result<Self, GrammarError> {
        let parser = Self::new(grammar)
            .memoize(options.memoize)
            .max_depth(options.max_depth);
        match &options.start_rule {
            Some(rule) => parser.start_rule(rule),
            None => Ok(parser),
        }
    }

    /// Match `rule` instead of the grammar's start rule. Unknown names are rejected here,
    /// not at parse time.
    pub fn start_rule(mut self, rule: &str) -> Result<Self, GrammarError> {
        self.start = self
            .grammar
            .rules()
            .key(rule)
            .ok_or_else(|| GrammarError::UndefinedRule {
                rule: rule.to_string(),
                referenced_from: "<start>".to_string(),
            })?;
        Ok(self)
    }

    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Fail with [`ParseErrorKind::NestingTooDeep`](crate::lily::ast::ParseErrorKind) instead
    /// of nesting rules deeper than `depth`.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
        let engine = Engine::new(self.grammar, source, self.memoize, self.max_depth);
        match engine.run(self.start) {
            Ok((root, stats)) => {
                log::debug!(
                    "parsed {} bytes as '{}': {} steps, {} memo hits, depth {}",
                    source.len(),
                    self.start,
                    stats.steps,
                    stats.memo_hits,
                    stats.max_depth
                );
                Ok(SyntaxTree::new(source, root, stats))
            }
            Err(err) => {
                log::trace!(
                    "parse of '{}' failed at {}: expected {:?}",
                    self.start,
                    err.offset,
                    err.expected()
                );
                Err(err)
            }
        }
    }
}

/// Parse notation source from `source_file` with the shared grammar.
pub fn parse(source: &str) -> Result<SyntaxTree, ParseError> {
    Parser::new(&languages::LILYPOND).parse(source)
}
