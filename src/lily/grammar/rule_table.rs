//! Rule tables and the host-over-embedded merge
//!
//! A [`RuleTable`] maps rule names to one root [`Expression`] each, in definition order.
//! Two tables take part in a grammar: the *host* (notation) table and the *embedded*
//! (expression language) table. [`RuleTable::merge`] copies the embedded entries and then
//! overlays the host entries, so a host rule with the same name as an embedded one replaces
//! it. This is how the notation grammar swaps in its own definition of what an embedded
//! notation block contains.

use super::expression::Expression;
use std::collections::HashMap;
use std::fmt;

/// Where a merged rule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Origin {
    Host,
    Embedded,
    /// Defined by both tables; the host definition won.
    Overridden,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Host => write!(f, "host"),
            Origin::Embedded => write!(f, "embedded"),
            Origin::Overridden => write!(f, "overridden"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleTable {
    name: String,
    rules: Vec<(String, Expression)>,
    index: HashMap<String, usize>,
    origins: Vec<Origin>,
    duplicates: Vec<String>,
}

impl RuleTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            index: HashMap::new(),
            origins: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    /// Define a rule. Redefining a name keeps the first definition and is reported as a
    /// duplicate when the grammar is built.
    pub fn define(&mut self, name: impl Into<String>, expr: Expression) -> &mut Self {
        let name = name.into();
        if self.index.contains_key(&name) {
            self.duplicates.push(name);
        } else {
            self.push(name, expr, Origin::Host);
        }
        self
    }

    fn push(&mut self, name: String, expr: Expression, origin: Origin) {
        self.index.insert(name.clone(), self.rules.len());
        self.rules.push((name, expr));
        self.origins.push(origin);
    }

    /// Merged view: embedded entries first, host entries overlaid on top.
    pub fn merge(embedded: &RuleTable, host: &RuleTable) -> RuleTable {
        let mut merged = RuleTable::new(format!("{}+{}", host.name, embedded.name));
        for (name, expr) in &embedded.rules {
            merged.push(name.clone(), expr.clone(), Origin::Embedded);
        }
        for (name, expr) in &host.rules {
            match merged.index.get(name) {
                Some(&slot) => {
                    log::debug!("host table '{}' overrides rule '{}'", host.name, name);
                    merged.rules[slot].1 = expr.clone();
                    merged.origins[slot] = Origin::Overridden;
                }
                None => merged.push(name.clone(), expr.clone(), Origin::Host),
            }
        }
        merged
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.index.get(name).map(|&slot| &self.rules[slot].1)
    }

    /// The table's own copy of a rule name.
    pub fn key(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&slot| self.rules[slot].0.as_str())
    }

    /// Position of a rule in definition order.
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn origin(&self, name: &str) -> Option<Origin> {
        self.index.get(name).map(|&slot| self.origins[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expression)> {
        self.rules.iter().map(|(name, expr)| (name.as_str(), expr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lily::grammar::expression::{lit, rule, seq};

    #[test]
    fn test_host_definition_wins_on_collision() {
        let mut embedded = RuleTable::new("embedded");
        embedded
            .define("block", lit("raw"))
            .define("datum", rule("block"));
        let mut host = RuleTable::new("host");
        host.define("block", seq(vec![lit("{"), lit("}")]))
            .define("start", rule("datum"));

        let merged = RuleTable::merge(&embedded, &host);

        assert_eq!(merged.get("block"), Some(&seq(vec![lit("{"), lit("}")])));
        assert_eq!(merged.origin("block"), Some(Origin::Overridden));
        assert_eq!(merged.origin("datum"), Some(Origin::Embedded));
        assert_eq!(merged.origin("start"), Some(Origin::Host));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_merge_keeps_embedded_order_then_new_host_rules() {
        let mut embedded = RuleTable::new("e");
        embedded.define("a", lit("a")).define("b", lit("b"));
        let mut host = RuleTable::new("h");
        host.define("c", lit("c")).define("a", lit("A"));

        let merged = RuleTable::merge(&embedded, &host);
        let names: Vec<_> = merged.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(merged.slot("c"), Some(2));
    }

    #[test]
    fn test_redefinition_is_recorded_not_applied() {
        let mut table = RuleTable::new("t");
        table.define("x", lit("1")).define("x", lit("2"));
        assert_eq!(table.get("x"), Some(&lit("1")));
        assert_eq!(table.duplicates(), &["x".to_string()]);
    }
}
