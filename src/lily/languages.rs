//! Built-in languages
//!
//! The notation grammar is the [`lilypond`] table with the [`scheme`] table embedded under
//! it. Each refers to the other: `embedded_scheme_text` reaches the datum rules, and the
//! host's `scheme_embedded_lilypond_text` reaches back into `_music_list`. Both directions
//! are plain rule references into the merged table, so nesting depth is only bounded by the
//! input.

pub mod lilypond;
pub mod scheme;

use crate::lily::grammar::{pat, rule, Grammar, GrammarBuilder, GrammarError};
use once_cell::sync::Lazy;

/// The merged notation grammar, built on first use and shared by every parse.
pub static LILYPOND: Lazy<Grammar> =
    Lazy::new(|| build_lilypond().expect("built-in notation grammar is valid"));

/// Build a fresh copy of the notation grammar.
pub fn build_lilypond() -> Result<Grammar, GrammarError> {
    GrammarBuilder::new(lilypond::NAME, lilypond::rules())
        .embed(scheme::rules())
        .extras(vec![
            pat(r"\s+"),
            rule("block_comment"),
            rule("comment"),
            rule("version_statement"),
        ])
        .start("source_file")
        .build()
}
