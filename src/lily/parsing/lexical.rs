//! Lexical matching
//!
//! Literal and pattern tokens at a byte offset. No grammar knowledge lives here; the
//! engine decides what to do with a hit or a miss.

use regex::Regex;

/// End offset of `text` if the source continues with it at `pos`.
pub(crate) fn match_literal(source: &str, pos: usize, text: &str) -> Option<usize> {
    source
        .get(pos..)
        .filter(|rest| rest.starts_with(text))
        .map(|_| pos + text.len())
}

/// End offset of `regex` matched at `pos`. Grammar patterns are compiled as `^(?:...)`, so
/// matching against the remaining input anchors them at the cursor.
pub(crate) fn match_pattern(regex: &Regex, source: &str, pos: usize) -> Option<usize> {
    let rest = source.get(pos..)?;
    regex
        .find(rest)
        .filter(|found| found.start() == 0)
        .map(|found| pos + found.end())
}
