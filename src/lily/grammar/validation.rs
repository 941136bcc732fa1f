//! Construction-time checks
//!
//! A PEG interpreter loops forever on two shapes of grammar: a repetition whose body can
//! succeed without consuming anything, and a rule that can reach itself again before
//! consuming anything (left recursion, direct or through other rules). Both are found here
//! by static analysis of the merged table, so a bad grammar fails at build time instead of
//! hanging on its first input.
//!
//! The analysis runs in two passes:
//!
//! 1. Nullability, computed as a fixpoint over all rules.
//! 2. A "left-call" graph: an edge A -> B when A can invoke B at the position A started.
//!    Any cycle in that graph is reported.
//!
//! Extras are not part of the left-call graph: while an extra is being matched only
//! anonymous extras are skipped, so extras cannot re-enter rules.

use super::error::GrammarError;
use super::expression::Expression;
use super::rule_table::RuleTable;
use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Every referenced name must exist in the merged table.
pub(super) fn check_references(
    table: &RuleTable,
    extras: &[Expression],
    start: &str,
) -> Result<(), GrammarError> {
    for (name, expr) in table.iter() {
        for target in expr.referenced_rules() {
            if !table.contains(target) {
                return Err(GrammarError::UndefinedRule {
                    rule: target.to_string(),
                    referenced_from: name.to_string(),
                });
            }
        }
    }
    for extra in extras {
        for target in extra.referenced_rules() {
            if !table.contains(target) {
                return Err(GrammarError::UndefinedRule {
                    rule: target.to_string(),
                    referenced_from: "<extras>".to_string(),
                });
            }
        }
    }
    if !table.contains(start) {
        return Err(GrammarError::UndefinedRule {
            rule: start.to_string(),
            referenced_from: "<start>".to_string(),
        });
    }
    Ok(())
}

struct Analysis<'a> {
    patterns: &'a HashMap<String, Regex>,
    nullable: HashSet<&'a str>,
}

impl<'a> Analysis<'a> {
    fn is_nullable(&self, expr: &Expression) -> bool {
        match expr {
            Expression::Literal(text) => text.is_empty(),
            Expression::Pattern(source) => self
                .patterns
                .get(source)
                .map(|regex| regex.is_match(""))
                .unwrap_or(false),
            Expression::Sequence(items) => items.iter().all(|item| self.is_nullable(item)),
            Expression::Choice(items) => items.iter().any(|item| self.is_nullable(item)),
            Expression::Repeat(_) | Expression::Optional(_) => true,
            Expression::Repeat1(inner)
            | Expression::Field(_, inner)
            | Expression::Alias(_, inner) => self.is_nullable(inner),
            Expression::RuleRef(name) => self.nullable.contains(name.as_str()),
        }
    }

    /// Rules that `expr` may invoke before consuming any input.
    fn left_calls<'e>(&self, expr: &'e Expression, out: &mut BTreeSet<&'e str>) {
        match expr {
            Expression::Literal(_) | Expression::Pattern(_) => {}
            Expression::Sequence(items) => {
                for item in items {
                    self.left_calls(item, out);
                    if !self.is_nullable(item) {
                        break;
                    }
                }
            }
            Expression::Choice(items) => {
                for item in items {
                    self.left_calls(item, out);
                }
            }
            Expression::Repeat(inner)
            | Expression::Repeat1(inner)
            | Expression::Optional(inner)
            | Expression::Field(_, inner)
            | Expression::Alias(_, inner) => self.left_calls(inner, out),
            Expression::RuleRef(name) => {
                out.insert(name.as_str());
            }
        }
    }

    fn find_empty_repetition(&self, expr: &Expression) -> bool {
        let mut found = false;
        expr.walk(&mut |node| match node {
            Expression::Repeat(inner) | Expression::Repeat1(inner) => {
                if self.is_nullable(inner) {
                    found = true;
                }
            }
            _ => {}
        });
        found
    }
}

fn compute_nullable<'a>(table: &'a RuleTable, analysis: &mut Analysis<'a>) {
    loop {
        let mut changed = false;
        for (name, expr) in table.iter() {
            if !analysis.nullable.contains(name) && analysis.is_nullable(expr) {
                analysis.nullable.insert(name);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

/// Reject empty repetitions and left-recursive cycles.
pub(super) fn check_termination(
    table: &RuleTable,
    extras: &[Expression],
    patterns: &HashMap<String, Regex>,
) -> Result<(), GrammarError> {
    let mut analysis = Analysis {
        patterns,
        nullable: HashSet::new(),
    };
    compute_nullable(table, &mut analysis);

    for (name, expr) in table.iter() {
        if analysis.find_empty_repetition(expr) {
            return Err(GrammarError::EmptyRepetition {
                rule: name.to_string(),
            });
        }
    }
    for extra in extras {
        if analysis.is_nullable(extra) || analysis.find_empty_repetition(extra) {
            return Err(GrammarError::EmptyRepetition {
                rule: "<extras>".to_string(),
            });
        }
    }

    let mut graph: Vec<(&str, BTreeSet<&str>)> = Vec::new();
    for (name, expr) in table.iter() {
        let mut calls = BTreeSet::new();
        analysis.left_calls(expr, &mut calls);
        graph.push((name, calls));
    }
    let edges: HashMap<&str, &BTreeSet<&str>> =
        graph.iter().map(|(name, calls)| (*name, calls)).collect();

    let mut state: HashMap<&str, Visit> = HashMap::new();
    for (name, _) in &graph {
        let mut path = Vec::new();
        if let Some(cycle) = find_cycle(name, &edges, &mut state, &mut path) {
            return Err(GrammarError::LeftRecursion { cycle });
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

fn find_cycle<'a>(
    node: &'a str,
    edges: &HashMap<&'a str, &BTreeSet<&'a str>>,
    state: &mut HashMap<&'a str, Visit>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    match state.get(node) {
        Some(Visit::Done) => return None,
        Some(Visit::InProgress) => {
            let start = path.iter().position(|step| *step == node).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
            cycle.push(node.to_string());
            return Some(cycle);
        }
        None => {}
    }
    state.insert(node, Visit::InProgress);
    path.push(node);
    if let Some(targets) = edges.get(node) {
        for target in targets.iter() {
            if let Some(cycle) = find_cycle(target, edges, state, path) {
                return Some(cycle);
            }
        }
    }
    path.pop();
    state.insert(node, Visit::Done);
    None
}
