//! Grammar registry
//!
//! A [`Grammar`] is the immutable, validated result of combining a host rule table, an
//! optional embedded rule table, the extras list and a start rule. It is built once and then
//! shared read-only by any number of parses (it is `Send + Sync`; parses keep all their
//! mutable state to themselves).

use super::error::GrammarError;
use super::expression::Expression;
use super::rule_table::{Origin, RuleTable};
use super::validation;
use regex::Regex;
use std::collections::HashMap;

pub struct GrammarBuilder {
    name: String,
    host: RuleTable,
    embedded: Option<RuleTable>,
    extras: Vec<Expression>,
    start: String,
}

impl GrammarBuilder {
    /// Start from the host table; the first host rule is the default start rule.
    pub fn new(name: impl Into<String>, host: RuleTable) -> Self {
        let start = host
            .iter()
            .next()
            .map(|(name, _)| name.to_string())
            .unwrap_or_default();
        Self {
            name: name.into(),
            host,
            embedded: None,
            extras: Vec::new(),
            start,
        }
    }

    /// Import another table; host rules override its rules of the same name.
    pub fn embed(mut self, embedded: RuleTable) -> Self {
        self.embedded = Some(embedded);
        self
    }

    /// Constructs allowed between any two tokens, tried in the given order.
    pub fn extras(mut self, extras: Vec<Expression>) -> Self {
        self.extras = extras;
        self
    }

    pub fn start(mut self, rule: impl Into<String>) -> Self {
        self.start = rule.into();
        self
    }

    /// Merge, compile and validate. Nothing is parsed with a grammar that fails here.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        for table in std::iter::once(&self.host).chain(self.embedded.iter()) {
            if let Some(rule) = table.duplicates().first() {
                return Err(GrammarError::DuplicateRule {
                    table: table.name().to_string(),
                    rule: rule.clone(),
                });
            }
        }

        let rules = match &self.embedded {
            Some(embedded) => RuleTable::merge(embedded, &self.host),
            None => self.host,
        };

        let mut patterns = HashMap::new();
        let sources = rules
            .iter()
            .chain(self.extras.iter().map(|expr| ("<extras>", expr)));
        for (name, expr) in sources {
            for source in expr.patterns() {
                if patterns.contains_key(source) {
                    continue;
                }
                let regex = Regex::new(&format!("^(?:{})", source)).map_err(|e| {
                    GrammarError::InvalidPattern {
                        rule: name.to_string(),
                        pattern: source.to_string(),
                        message: e.to_string(),
                    }
                })?;
                patterns.insert(source.to_string(), regex);
            }
        }

        validation::check_references(&rules, &self.extras, &self.start)?;
        validation::check_termination(&rules, &self.extras, &patterns)?;

        let overridden = rules
            .iter()
            .filter(|(name, _)| rules.origin(name) == Some(Origin::Overridden))
            .count();
        log::debug!(
            "built grammar '{}': {} rules ({} overridden), {} patterns, {} extras, start '{}'",
            self.name,
            rules.len(),
            overridden,
            patterns.len(),
            self.extras.len(),
            self.start
        );

        Ok(Grammar {
            name: self.name,
            rules,
            patterns,
            extras: self.extras,
            start: self.start,
        })
    }
}

#[derive(Debug)]
pub struct Grammar {
    name: String,
    rules: RuleTable,
    patterns: HashMap<String, Regex>,
    extras: Vec<Expression>,
    start: String,
}

impl Grammar {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The merged rule table.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&Expression> {
        self.rules.get(name)
    }

    pub(crate) fn rule_slot(&self, name: &str) -> Option<(usize, &Expression)> {
        let slot = self.rules.slot(name)?;
        self.rules.get(name).map(|expr| (slot, expr))
    }

    pub(crate) fn pattern(&self, source: &str) -> Option<&Regex> {
        self.patterns.get(source)
    }

    pub fn extras(&self) -> &[Expression] {
        &self.extras
    }

    pub fn start_rule(&self) -> &str {
        &self.start
    }
}
