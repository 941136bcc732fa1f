//! Notation rule table
//!
//!     The host language: a `{ ... }` music block holding notes, rests and a handful of
//!     commands, with `#`/`$` escapes into the expression language. The table is declarative,
//!     one `define` per production, and is only meaningful merged with
//!     [`scheme::rules`](super::scheme::rules), which supplies the datum rules that
//!     `embedded_scheme_text` refers to.
//!
//!     Alternatives are ordered. Where an earlier literal is a prefix of a later one (`treble`
//!     and `G` before `G2`, `is` before `isis`) the later one can never match on its own; the
//!     tables keep the order anyway.

use crate::lily::grammar::{
    alias, choice, field, lit, literals, optional, pat, repeat, repeat1, rule, seq, RuleTable,
};

pub const NAME: &str = "lilypond";

/// Dutch note names, longest-first only where it matters (`bes` before `b`).
const NOTE_NAMES: &[&str] = &["c", "d", "e", "f", "g", "a", "bes", "b"];
const ACCIDENTALS: &[&str] = &["is", "es", "isis", "eses"];

const CLEF_STYLES: &[&str] = &[
    // standard
    "treble", "G", "G2", "treble", "violin", "french", "GG", "tenorG", "soprano",
    "mezzosoprano", "C", "alto", "tenor", "baritone", "varC", "altovarC", "tenorvarC",
    "baritonevarC", "varbaritone", "baritonevarF", "F", "bass", "subbass",
    // percussion
    "percussion", "varpercussion",
    // tablature
    "tab", "moderntab",
    // gregorian
    "vaticana-do1", "vaticana-do2", "vaticana-do3", "vaticana-fa1", "vaticana-fa2",
    "medicaea-do1", "medicaea-do2", "medicaea-do3", "medicaea-fa1", "medicaea-fa2",
    "hufnagel-do1", "hufnagel-do2", "hufnagel-do3", "hufnagel-fa1", "hufnagel-fa2",
    "hufnagel-do-fa",
    // mensural
    "mensural-c1", "mensural-c2", "mensural-c3", "mensural-c4", "mensural-c5", "mensural-f",
    "mensural-f2", "mensural-f3", "mensural-f4", "mensural-f5", "mensural-g1", "mensural-g2",
    "mensural-g", "blackmensural-c1", "blackmensural-c2", "blackmensural-c3",
    "blackmensural-c4", "blackmensural-c5", "neomensural-c1", "neomensural-c2",
    "neomensural-c3", "neomensural-c4", "neomensural-c5", "petrucci-c1", "petrucci-c2",
    "petrucci-c3", "petrucci-c4", "petrucci-c5", "petrucci-f", "petrucci-f2", "petrucci-f3",
    "petrucci-f4", "petrucci-f5", "petrucci-g1", "petrucci-g2", "petrucci-g",
    // kievan
    "kievan-do",
];

pub fn rules() -> RuleTable {
    let mut table = RuleTable::new(NAME);
    table
        .define("source_file", rule("music"))
        .define("version_statement", seq([lit("\\version"), rule("text")]))
        .define("block_comment", pat(r"%\{(?s:.*?)%\}"))
        .define("comment", pat(r"%[^\n]*"))
        .define("music", seq([lit("{"), repeat(rule("_music_list")), lit("}")]))
        .define(
            "_music_list",
            choice([
                rule("note"),
                rule("rest"),
                rule("time_signature_event"),
                rule("tempo_event"),
                rule("clef"),
                rule("bar_event"),
                rule("bar_check_event"),
                rule("bar_number_check"),
                rule("key_change_event"),
                rule("embedded_scheme"),
            ]),
        );

    // notes and rests
    table
        .define(
            "note",
            seq([
                field("name", rule("note_name")),
                optional(field("octave", rule("quotes"))),
                optional(field("duration", rule("steno_duration"))),
            ]),
        )
        .define(
            "rest",
            seq([lit("r"), optional(field("duration", rule("steno_duration")))]),
        )
        .define(
            "note_name",
            seq([
                literals(NOTE_NAMES.iter().copied()),
                optional(literals(ACCIDENTALS.iter().copied())),
            ]),
        )
        .define("quotes", choice([repeat1(lit("'")), repeat1(lit(","))]))
        .define("steno_duration", pat(r"[0-9]+\.*"))
        .define("number", pat("[0-9]+"))
        .define("text", pat(r#""[^"]*""#));

    // commands
    table
        .define(
            "beat_structure",
            seq([rule("number"), repeat1(seq([lit(","), rule("number")]))]),
        )
        .define(
            "time_signature_event",
            seq([
                lit("\\time"),
                optional(field("beatStructure", rule("beat_structure"))),
                choice([
                    seq([
                        field("numerator", rule("number")),
                        lit("/"),
                        field("denominator", rule("number")),
                    ]),
                    rule("embedded_scheme"),
                ]),
            ]),
        )
        .define(
            "tempo_event",
            seq([
                lit("\\tempo"),
                choice([
                    seq([
                        optional(field("text", rule("text"))),
                        field("duration", rule("steno_duration")),
                        lit("="),
                        field("tempo_range", rule("tempo_range")),
                    ]),
                    seq([
                        field("text", rule("text")),
                        optional(seq([
                            field("duration", rule("steno_duration")),
                            lit("="),
                            field("tempo_range", rule("tempo_range")),
                        ])),
                    ]),
                ]),
            ]),
        )
        .define(
            "tempo_range",
            choice([
                seq([rule("number"), lit("-"), rule("number")]),
                rule("number"),
            ]),
        )
        .define(
            "clef",
            seq([
                lit("\\clef"),
                optional(lit("\"")),
                rule("clef_style"),
                optional(choice([
                    rule("clef_transpose"),
                    rule("clef_optional_transpose"),
                ])),
                optional(lit("\"")),
            ]),
        )
        .define("clef_style", literals(CLEF_STYLES.iter().copied()))
        .define("clef_transpose", pat(r"[_^]\d+"))
        .define("clef_optional_transpose", pat(r"[_^][\[(]\d+[\])]"))
        .define("bar_event", seq([lit("\\bar"), field("type", rule("text"))]))
        .define("bar_check_event", lit("|"))
        .define("bar_number_check", seq([lit("\\barNumberCheck"), rule("number")]))
        .define(
            "key_change_event",
            seq([
                lit("\\key"),
                field("pitch", rule("note_name")),
                field("mode", rule("mode")),
            ]),
        )
        .define("mode", pat(r"\\\w+"));

    // bridge into the expression language
    table
        .define(
            "embedded_scheme",
            seq([
                alias("embedded_scheme_prefix", pat("[#$]@?")),
                rule("embedded_scheme_text"),
            ]),
        )
        .define(
            "embedded_scheme_text",
            choice([
                rule("_scheme_simple_datum"),
                seq([repeat(rule("scheme_comment")), rule("_scheme_compound_datum")]),
            ]),
        )
        // replaces the raw-text body of `#{ ... #}` with a music list
        .define(
            "scheme_embedded_lilypond_text",
            choice([
                repeat1(rule("comment")),
                seq([repeat(rule("comment")), repeat1(rule("_music_list"))]),
            ]),
        );

    table
}
