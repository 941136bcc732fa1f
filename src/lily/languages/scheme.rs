//! Expression-language rule table
//!
//! A Scheme-like datum grammar. Rules whose names start with `_` are categories that splice
//! into their parent. `scheme_embedded_lilypond_text` is a placeholder that accepts raw text
//! up to `#}`; a host grammar that embeds this table replaces it.

use crate::lily::grammar::{choice, lit, optional, pat, repeat, rule, seq, RuleTable};

pub const NAME: &str = "scheme";

/// Characters that end a symbol or keyword.
const DELIMITERS: &str = r#"\s()\[\]{}";'`,"#;

pub fn rules() -> RuleTable {
    let symbol = format!("[^{d}#0-9][^{d}]*", d = DELIMITERS);
    let keyword = format!("#:[^{d}]+", d = DELIMITERS);

    let mut table = RuleTable::new(NAME);
    table
        .define(
            "_scheme_datum",
            choice([rule("_scheme_simple_datum"), rule("_scheme_compound_datum")]),
        )
        .define(
            "_scheme_simple_datum",
            choice([
                rule("scheme_boolean"),
                rule("scheme_number"),
                rule("scheme_character"),
                rule("scheme_string"),
                rule("scheme_keyword"),
                rule("scheme_symbol"),
            ]),
        )
        .define(
            "_scheme_compound_datum",
            choice([
                rule("scheme_list"),
                rule("scheme_vector"),
                rule("scheme_quote"),
                rule("scheme_quasiquote"),
                rule("scheme_unquote_splicing"),
                rule("scheme_unquote"),
                rule("scheme_embedded_lilypond"),
            ]),
        )
        .define("_scheme_list_item", choice([rule("_scheme_datum"), rule("scheme_comment")]));

    // atoms
    table
        .define("scheme_boolean", pat(r"#(?:true|false|t|f)\b"))
        .define(
            "scheme_number",
            pat(r"[+-]?(?:\d+/\d+|\d+\.\d*|\.\d+|\d+)(?:[eE][+-]?\d+)?"),
        )
        .define(
            "scheme_character",
            pat(r"#\\(?:space|newline|tab|nul|x[0-9a-fA-F]+|.)"),
        )
        .define("scheme_string", pat(r#""(?:[^"\\]|\\.)*""#))
        .define("scheme_keyword", pat(keyword))
        .define("scheme_symbol", pat(symbol));

    // compound data
    table
        .define(
            "scheme_list",
            choice([
                seq([lit("("), repeat(rule("_scheme_list_item")), lit(")")]),
                seq([lit("["), repeat(rule("_scheme_list_item")), lit("]")]),
            ]),
        )
        .define(
            "scheme_vector",
            seq([lit("#("), repeat(rule("_scheme_list_item")), lit(")")]),
        )
        .define("scheme_quote", seq([lit("'"), rule("_scheme_datum")]))
        .define("scheme_quasiquote", seq([lit("`"), rule("_scheme_datum")]))
        .define("scheme_unquote_splicing", seq([lit(",@"), rule("_scheme_datum")]))
        .define("scheme_unquote", seq([lit(","), rule("_scheme_datum")]))
        .define(
            "scheme_comment",
            choice([
                pat(r"#\|(?s:.*?)\|#"),
                pat(r";[^\n]*"),
                seq([lit("#;"), rule("_scheme_datum")]),
            ]),
        )
        .define(
            "scheme_embedded_lilypond",
            seq([
                lit("#{"),
                optional(rule("scheme_embedded_lilypond_text")),
                lit("#}"),
            ]),
        )
        .define(
            "scheme_embedded_lilypond_text",
            pat(r"(?:[^#]|#[^}])+"),
        );

    table
}
