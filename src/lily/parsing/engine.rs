//! Combinator Engine
//!
//!     A recursive-descent PEG interpreter over [`Expression`] trees. Every expression is a
//!     function from a byte offset to either a [`Fragment`] (where the match ended and what it
//!     built) or failure. The cursor is just an offset passed by value, so a failed attempt
//!     can never leave the cursor moved: backtracking is returning to an offset the caller
//!     still holds.
//!
//!     Semantics per expression:
//!
//!     - `Sequence`: each element in turn; extras are skipped before the first element,
//!       between elements and after the last one. Fails as soon as one element fails.
//!     - `Choice`: alternatives strictly in order, first success wins.
//!     - `Repeat` / `Repeat1`: greedy, no backtracking over the iteration count. Repetition
//!       behaves like the sequence `e e e ...`, so extras are skipped around iterations too.
//!     - `Optional`: zero-width success when the inner expression fails.
//!     - `Field` / `Alias` / `RuleRef`: delegate, then hand the fragment to the AST builder.
//!
//!     All state here belongs to one parse: the furthest failure, the packrat memo table and
//!     counters. The grammar is only read.
//!
//!     Extras are matched with `in_extras` set. In that mode only anonymous extras
//!     (whitespace) are skipped at sequence boundaries, and failures are not recorded.
//!
//!     Rule nesting is bounded by `max_depth`. The native stack grows on demand below that
//!     bound, so deep but valid input parses on any thread. Past the bound the parse is
//!     aborted: every pending expression fails and `run` reports the nesting error.

use super::failure::FurthestFailure;
use super::lexical;
use crate::lily::ast::builder::{self, Fragment};
use crate::lily::ast::{Node, ParseError};
use crate::lily::grammar::{Expression, Grammar};
use serde::Serialize;
use std::collections::HashMap;

/// Rule nesting allowed when the caller does not choose a limit.
pub const DEFAULT_MAX_DEPTH: usize = 4096;

/// Stack left free before a rule invocation moves to a new segment.
const RED_ZONE: usize = 128 * 1024;
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Counters for one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Expressions evaluated
    pub steps: usize,
    /// Rule invocations answered from the memo table
    pub memo_hits: usize,
    /// Deepest rule nesting reached
    pub max_depth: usize,
}

/// (rule slot, offset, matching an extra)
type MemoKey = (usize, usize, bool);

struct Frame<'g> {
    name: &'g str,
    start: usize,
}

pub(crate) struct Engine<'g, 's> {
    grammar: &'g Grammar,
    source: &'s str,
    memoize: bool,
    max_depth: usize,
    /// Offset at which the nesting limit was hit
    aborted: Option<usize>,
    memo: HashMap<MemoKey, Option<Fragment>>,
    extras_memo: HashMap<usize, Fragment>,
    frames: Vec<Frame<'g>>,
    in_extras: bool,
    failure: FurthestFailure,
    stats: ParseStats,
}

impl<'g, 's> Engine<'g, 's> {
    pub fn new(grammar: &'g Grammar, source: &'s str, memoize: bool, max_depth: usize) -> Self {
        Self {
            grammar,
            source,
            memoize,
            max_depth,
            aborted: None,
            memo: HashMap::new(),
            extras_memo: HashMap::new(),
            frames: Vec::new(),
            in_extras: false,
            failure: FurthestFailure::default(),
            stats: ParseStats::default(),
        }
    }

    /// Match `start` against the whole input, allowing extras around it.
    pub fn run(mut self, start: &'g str) -> Result<(Node, ParseStats), ParseError> {
        let mut fragment = self.skip_extras(0);
        let body = self.invoke(start, fragment.end);
        let trailing = body.as_ref().map(|body| self.skip_extras(body.end));
        if let Some(offset) = self.aborted {
            return Err(ParseError::nesting_too_deep(self.source, offset, self.max_depth));
        }
        match (body, trailing) {
            (Some(body), Some(trailing)) => {
                fragment.append(body);
                fragment.append(trailing);
            }
            _ => return Err(self.failure.into_error(self.source)),
        }

        if fragment.end != self.source.len() {
            self.failure.record(fragment.end, ["end of input"], None);
            return Err(self.failure.into_error(self.source));
        }

        let root = builder::root(fragment, start, self.source.len());
        Ok((root, self.stats))
    }

    fn eval(&mut self, expr: &'g Expression, pos: usize) -> Option<Fragment> {
        if self.aborted.is_some() {
            return None;
        }
        self.stats.steps += 1;
        match expr {
            Expression::Literal(text) => match lexical::match_literal(self.source, pos, text) {
                Some(end) => Some(Fragment::token(pos..end)),
                None => {
                    self.fail(pos, Some(text.as_str()));
                    None
                }
            },
            Expression::Pattern(source) => {
                let regex = self.grammar.pattern(source)?;
                match lexical::match_pattern(regex, self.source, pos) {
                    Some(end) => Some(Fragment::token(pos..end)),
                    None => {
                        self.fail(pos, None);
                        None
                    }
                }
            }
            Expression::Sequence(items) => {
                let mut fragment = self.skip_extras(pos);
                for item in items {
                    let next = self.eval(item, fragment.end)?;
                    fragment.append(next);
                    let extras = self.skip_extras(fragment.end);
                    fragment.append(extras);
                }
                Some(fragment)
            }
            Expression::Choice(alternatives) => alternatives
                .iter()
                .find_map(|alternative| self.eval(alternative, pos)),
            Expression::Repeat(inner) => self.repeat(inner, pos, 0),
            Expression::Repeat1(inner) => self.repeat(inner, pos, 1),
            Expression::Optional(inner) => {
                Some(self.eval(inner, pos).unwrap_or_else(|| Fragment::empty(pos)))
            }
            Expression::Field(name, inner) => {
                let fragment = self.eval(inner, pos)?;
                Some(builder::label(fragment, name))
            }
            Expression::Alias(tag, inner) => {
                self.frames.push(Frame { name: tag, start: pos });
                let result = self.eval(inner, pos);
                self.frames.pop();
                result.map(|fragment| builder::alias(fragment, tag, pos))
            }
            Expression::RuleRef(name) => self.invoke(name, pos),
        }
    }

    fn repeat(&mut self, inner: &'g Expression, pos: usize, min: usize) -> Option<Fragment> {
        let mut fragment = Fragment::empty(pos);
        let mut count = 0;
        loop {
            let extras = self.skip_extras(fragment.end);
            match self.eval(inner, extras.end) {
                Some(next) => {
                    debug_assert!(next.end > extras.end, "repetition made no progress");
                    fragment.append(extras);
                    fragment.append(next);
                    count += 1;
                }
                None => break,
            }
        }
        if count < min {
            return None;
        }
        if count > 0 {
            let trailing = self.skip_extras(fragment.end);
            fragment.append(trailing);
        }
        Some(fragment)
    }

    fn invoke(&mut self, name: &'g str, pos: usize) -> Option<Fragment> {
        let grammar = self.grammar;
        let Some((slot, body)) = grammar.rule_slot(name) else {
            log::error!("rule '{}' vanished from grammar '{}'", name, grammar.name());
            return None;
        };

        let key = (slot, pos, self.in_extras);
        if self.memoize {
            if let Some(cached) = self.memo.get(&key) {
                self.stats.memo_hits += 1;
                return cached.clone();
            }
        }

        if self.frames.len() >= self.max_depth {
            log::debug!("nesting limit {} reached in '{}' at {}", self.max_depth, name, pos);
            self.aborted = Some(pos);
            return None;
        }

        self.frames.push(Frame { name, start: pos });
        self.stats.max_depth = self.stats.max_depth.max(self.frames.len());
        let result = stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || self.eval(body, pos))
            .map(|fragment| builder::rule_node(fragment, name, pos));
        self.frames.pop();

        if self.memoize && self.aborted.is_none() {
            self.memo.insert(key, result.clone());
        }
        result
    }

    /// Greedily consume extras at `pos`. Never fails; the fragment may be empty.
    fn skip_extras(&mut self, pos: usize) -> Fragment {
        if self.in_extras {
            return self.skip_anonymous_extras(pos);
        }
        if self.memoize {
            if let Some(cached) = self.extras_memo.get(&pos) {
                return cached.clone();
            }
        }

        let grammar = self.grammar;
        self.in_extras = true;
        let mut end = pos;
        let mut parts = Vec::new();
        'skip: loop {
            for extra in grammar.extras() {
                if let Some(found) = self.eval(extra, end) {
                    if found.end > end {
                        end = found.end;
                        parts.extend(found.parts);
                        continue 'skip;
                    }
                }
            }
            break;
        }
        self.in_extras = false;

        let fragment = Fragment::extras(end, parts);
        if self.memoize && self.aborted.is_none() {
            self.extras_memo.insert(pos, fragment.clone());
        }
        fragment
    }

    fn skip_anonymous_extras(&mut self, pos: usize) -> Fragment {
        let grammar = self.grammar;
        let mut end = pos;
        'skip: loop {
            for extra in grammar.extras().iter().filter(|extra| extra.is_terminal()) {
                if let Some(found) = self.eval(extra, end) {
                    if found.end > end {
                        end = found.end;
                        continue 'skip;
                    }
                }
            }
            break;
        }
        Fragment::extras(end, Vec::new())
    }

    fn fail(&mut self, pos: usize, token: Option<&str>) {
        if self.in_extras {
            return;
        }
        let visible = |frame: &&Frame<'g>| !builder::is_hidden(frame.name);
        let mut started_here: Vec<&str> = self
            .frames
            .iter()
            .filter(visible)
            .filter(|frame| frame.start == pos)
            .map(|frame| frame.name)
            .collect();
        if started_here.is_empty() {
            if let Some(innermost) = self.frames.iter().rev().find(visible) {
                started_here.push(innermost.name);
            }
        }
        self.failure.record(pos, started_here, token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lily::ast::ParseErrorKind;
    use crate::lily::grammar::{
        choice, field, lit, optional, pat, repeat, repeat1, rule, seq, GrammarBuilder, RuleTable,
    };

    fn grammar(table: RuleTable) -> Grammar {
        GrammarBuilder::new("test", table)
            .extras(vec![pat(r"\s+"), rule("comment")])
            .build()
            .unwrap()
    }

    fn base() -> RuleTable {
        let mut table = RuleTable::new("test");
        table
            .define("list", seq(vec![lit("["), repeat(rule("item")), lit("]")]))
            .define("item", choice(vec![rule("word"), rule("num")]))
            .define("word", pat("[a-z]+"))
            .define("num", pat("[0-9]+"))
            .define("comment", pat("%[^\n]*"));
        table
    }

    fn run(grammar: &Grammar, source: &str) -> Result<Node, ParseError> {
        Engine::new(grammar, source, true, DEFAULT_MAX_DEPTH)
            .run(grammar.start_rule())
            .map(|(node, _)| node)
    }

    #[test]
    fn test_sequence_and_repeat_skip_extras() {
        let grammar = grammar(base());
        let source = "[ ab  12 % note\n cd ]";
        let root = run(&grammar, source).unwrap();
        assert_eq!(
            root.to_sexp(),
            "(list (item (word)) (item (num)) (comment) (item (word)))"
        );
        assert_eq!(root.span, 0..source.len());
    }

    #[test]
    fn test_choice_takes_first_matching_alternative() {
        let mut table = RuleTable::new("t");
        table
            .define("start", choice(vec![rule("short"), rule("long")]))
            .define("short", lit("a"))
            .define("long", lit("ab"));
        let grammar = grammar_with_comment(table);
        // "a" shadows "ab": the leftover "b" is unparsed input
        let err = run(&grammar, "ab").unwrap_err();
        assert_eq!(err.offset, 1);
        assert!(err.expected_rules.contains("end of input"));
        assert_eq!(run(&grammar, "a").unwrap().to_sexp(), "(start (short))");
    }

    fn grammar_with_comment(mut table: RuleTable) -> Grammar {
        table.define("comment", pat("%[^\n]*"));
        grammar(table)
    }

    #[test]
    fn test_repeat_is_greedy_without_backtracking() {
        let mut table = RuleTable::new("t");
        table.define("start", seq(vec![repeat(lit("a")), lit("a")]));
        let grammar = grammar_with_comment(table);
        assert!(run(&grammar, "aaa").is_err());
    }

    #[test]
    fn test_repeat1_requires_one() {
        let mut table = RuleTable::new("t");
        table.define("start", seq(vec![lit("<"), repeat1(rule("x")), lit(">")]))
            .define("x", lit("x"));
        let grammar = grammar_with_comment(table);
        assert!(run(&grammar, "<>").is_err());
        assert_eq!(run(&grammar, "<x x>").unwrap().to_sexp(), "(start (x) (x))");
    }

    #[test]
    fn test_optional_and_field() {
        let mut table = RuleTable::new("t");
        table
            .define(
                "start",
                seq(vec![
                    field("name", rule("word")),
                    optional(field("count", rule("num"))),
                ]),
            )
            .define("word", pat("[a-z]+"))
            .define("num", pat("[0-9]+"));
        let grammar = grammar_with_comment(table);
        assert_eq!(
            run(&grammar, "abc 3").unwrap().to_sexp(),
            "(start name: (word) count: (num))"
        );
        assert_eq!(run(&grammar, "abc").unwrap().to_sexp(), "(start name: (word))");
    }

    #[test]
    fn test_failure_reports_furthest_offset_and_rules() {
        let grammar = grammar(base());
        let err = run(&grammar, "[ ab ; ]").unwrap_err();
        assert_eq!(err.offset, 5);
        assert!(err.expected_rules.contains("item"));
        assert!(err.expected_rules.contains("word"));
        assert!(err.expected_rules.contains("num"));
        assert!(err.expected_tokens.contains("]"));
    }

    #[test]
    fn test_memoization_does_not_change_results() {
        let grammar = grammar(base());
        let source = "[ a 1 b 2 % c\n d ]";
        let with = Engine::new(&grammar, source, true, DEFAULT_MAX_DEPTH).run("list").unwrap();
        let without = Engine::new(&grammar, source, false, DEFAULT_MAX_DEPTH).run("list").unwrap();
        assert_eq!(with.0, without.0);
        assert_eq!(without.1.memo_hits, 0);
    }

    #[test]
    fn test_stats_track_depth() {
        let grammar = grammar(base());
        let (_, stats) = Engine::new(&grammar, "[ a ]", true, DEFAULT_MAX_DEPTH)
            .run("list")
            .unwrap();
        // list -> item -> word
        assert_eq!(stats.max_depth, 3);
        assert!(stats.steps > 0);
    }

    fn nesting() -> Grammar {
        let mut table = RuleTable::new("t");
        table.define(
            "nest",
            choice(vec![seq(vec![lit("("), rule("nest"), lit(")")]), lit("x")]),
        );
        grammar_with_comment(table)
    }

    #[test]
    fn test_nesting_limit_aborts_the_parse() {
        let grammar = nesting();
        let source = "((((x))))";
        let err = Engine::new(&grammar, source, true, 3).run("nest").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep { limit: 3 });
        assert_eq!(err.offset, 3);

        let (node, stats) = Engine::new(&grammar, source, true, 5).run("nest").unwrap();
        assert_eq!(stats.max_depth, 5);
        assert_eq!(node.find_all("nest").len(), 5);
    }

    #[test]
    fn test_deep_nesting_grows_the_stack() {
        let grammar = nesting();
        let depth = 1500;
        let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        let (node, stats) = Engine::new(&grammar, &source, true, DEFAULT_MAX_DEPTH)
            .run("nest")
            .unwrap();
        assert_eq!(stats.max_depth, depth + 1);
        assert_eq!(node.span, 0..source.len());
    }

    #[test]
    fn test_visible_leaves_cover_the_input_without_gaps() {
        let mut table = RuleTable::new("t");
        table
            .define("list", seq(vec![rule("open"), repeat(rule("item")), rule("close")]))
            .define("open", lit("["))
            .define("close", lit("]"))
            .define("item", choice(vec![rule("word"), rule("num")]))
            .define("word", pat("[a-z]+"))
            .define("num", pat("[0-9]+"))
            .define("ws", pat(r"\s+"))
            .define("comment", pat("%[^\n]*"));
        let grammar = GrammarBuilder::new("t", table)
            .extras(vec![rule("ws"), rule("comment")])
            .build()
            .unwrap();

        for source in ["[ab 12]", "  [ ab  12 % note\n cd ] ", "[%c\n]"] {
            let root = run(&grammar, source).unwrap();
            let rebuilt: String = root
                .descendants()
                .into_iter()
                .filter(|node| node.children().is_empty())
                .map(|node| node.text(source))
                .collect();
            assert_eq!(rebuilt, source);
        }
    }
}
