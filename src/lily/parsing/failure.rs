//! Furthest-failure tracking
//!
//! Only the failures at the largest offset matter for diagnostics: whatever was tried there
//! is what the input would have needed to continue. Anything earlier is forgotten as soon
//! as a later failure is seen.

use crate::lily::ast::ParseError;
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub(crate) struct FurthestFailure {
    offset: Option<usize>,
    rules: BTreeSet<String>,
    tokens: BTreeSet<String>,
}

impl FurthestFailure {
    pub fn record<'a>(
        &mut self,
        offset: usize,
        rules: impl IntoIterator<Item = &'a str>,
        token: Option<&str>,
    ) {
        match self.offset {
            Some(current) if offset < current => return,
            Some(current) if offset == current => {}
            _ => {
                self.offset = Some(offset);
                self.rules.clear();
                self.tokens.clear();
            }
        }
        self.rules.extend(rules.into_iter().map(str::to_string));
        if let Some(token) = token {
            self.tokens.insert(token.to_string());
        }
    }

    #[cfg(test)]
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn into_error(self, source: &str) -> ParseError {
        ParseError::new(
            source,
            self.offset.unwrap_or(0),
            self.rules,
            self.tokens,
        )
    }
}
