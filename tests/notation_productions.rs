//! Notation productions, one table per construct

use lily::lily::languages::LILYPOND;
use lily::lily::parsing::{parse, Parser};
use lily::lily::testing::{assert_tree, TextMatch};
use rstest::rstest;

/// S-expression of the single item inside `{ ... }`.
fn item_sexp(item: &str) -> String {
    let source = format!("{{ {} }}", item);
    let tree = parse(&source).unwrap_or_else(|e| panic!("{:?} failed:\n{}", source, e));
    let music = tree.root().named_children().next().expect("music block");
    let items: Vec<_> = music.named_children().collect();
    assert_eq!(items.len(), 1, "{:?} produced {}", source, music.to_sexp());
    items[0].to_sexp()
}

#[test]
fn notes_and_rests_in_a_block() {
    let tree = parse("{ c4 d8 r2. }").unwrap();
    assert_eq!(
        tree.to_sexp(),
        "(source_file (music \
         (note name: (note_name) duration: (steno_duration)) \
         (note name: (note_name) duration: (steno_duration)) \
         (rest duration: (steno_duration))))"
    );
    assert_tree(&tree).child(0, |music| {
        music
            .kind("music")
            .child_count(3)
            .child(0, |c| {
                c.field("name", |n| {
                    n.text("c");
                })
                .field("duration", |d| {
                    d.text("4");
                })
                .no_field("octave");
            })
            .child(1, |d| {
                d.field("name", |n| {
                    n.text("d");
                })
                .field("duration", |d| {
                    d.text("8");
                });
            })
            .child(2, |r| {
                r.kind("rest").text("r2.").field("duration", |d| {
                    d.text("2.");
                });
            });
    });
}

#[rstest]
#[case("c", "(note name: (note_name))")]
#[case("fis'", "(note name: (note_name) octave: (quotes))")]
#[case("bes,,16", "(note name: (note_name) octave: (quotes) duration: (steno_duration))")]
#[case("aes2..", "(note name: (note_name) duration: (steno_duration))")]
#[case("r", "(rest)")]
#[case("r1", "(rest duration: (steno_duration))")]
fn notes_and_rests(#[case] item: &str, #[case] expected: &str) {
    assert_eq!(item_sexp(item), expected);
}

#[rstest]
#[case("\\time 3/4", "(time_signature_event numerator: (number) denominator: (number))")]
#[case(
    "\\time 2,2,3 7/8",
    "(time_signature_event beatStructure: (beat_structure (number) (number) (number)) numerator: (number) denominator: (number))"
)]
#[case(
    "\\time #'(3 3 2)",
    "(time_signature_event (embedded_scheme (embedded_scheme_prefix) (embedded_scheme_text (scheme_quote (scheme_list (scheme_number) (scheme_number) (scheme_number))))))"
)]
fn time_signatures(#[case] item: &str, #[case] expected: &str) {
    assert_eq!(item_sexp(item), expected);
}

#[rstest]
#[case("\\tempo 4 = 120", "(tempo_event duration: (steno_duration) tempo_range: (tempo_range (number)))")]
#[case(
    "\\tempo 4 = 40-46",
    "(tempo_event duration: (steno_duration) tempo_range: (tempo_range (number) (number)))"
)]
#[case(
    "\\tempo \"Allegro\" 4. = 80",
    "(tempo_event text: (text) duration: (steno_duration) tempo_range: (tempo_range (number)))"
)]
#[case("\\tempo \"Adagio\"", "(tempo_event text: (text))")]
fn tempo_events(#[case] item: &str, #[case] expected: &str) {
    assert_eq!(item_sexp(item), expected);
}

#[rstest]
#[case("\\clef \"treble\"", "(clef (clef_style))")]
#[case("\\clef bass", "(clef (clef_style))")]
#[case("\\clef \"treble_8\"", "(clef (clef_style) (clef_transpose))")]
#[case("\\clef \"bass^(15)\"", "(clef (clef_style) (clef_optional_transpose))")]
#[case("\\clef petrucci-c3", "(clef (clef_style))")]
fn clefs(#[case] item: &str, #[case] expected: &str) {
    assert_eq!(item_sexp(item), expected);
}

#[test]
fn clef_quotes_are_consumed_but_not_kept() {
    let tree = parse("{ \\clef \"treble\" }").unwrap();
    assert_tree(&tree).child(0, |music| {
        music.child(0, |clef| {
            clef.kind("clef")
                .text("\\clef \"treble\"")
                .child_count(1)
                .child(0, |style| {
                    style.kind("clef_style").text("treble");
                });
        });
    });
}

/// Earlier literals shadow later ones that extend them.
#[rstest]
#[case("{ \\clef G2 }", 9)]
#[case("{ cisis }", 5)]
fn shadowed_alternatives_leave_input_unparsed(#[case] source: &str, #[case] offset: usize) {
    let err = parse(source).unwrap_err();
    assert_eq!(err.offset, offset, "{}", err);
}

#[rstest]
#[case("\\bar \"|.\"", "(bar_event type: (text))")]
#[case("|", "(bar_check_event)")]
#[case("\\barNumberCheck 17", "(bar_number_check (number))")]
#[case("\\key fis \\minor", "(key_change_event pitch: (note_name) mode: (mode))")]
#[case("\\key bes \\dorian", "(key_change_event pitch: (note_name) mode: (mode))")]
fn bars_and_keys(#[case] item: &str, #[case] expected: &str) {
    assert_eq!(item_sexp(item), expected);
}

#[test]
fn note_followed_by_embedded_application() {
    let tree = parse("{ c' #(+ 1 2) }").unwrap();
    assert_tree(&tree).child(0, |music| {
        music
            .child_count(2)
            .child(0, |note| {
                note.kind("note").text("c'").field("octave", |o| {
                    o.text("'");
                });
            })
            .child(1, |scheme| {
                scheme
                    .kind("embedded_scheme")
                    .text("#(+ 1 2)")
                    .child(0, |prefix| {
                        prefix.kind("embedded_scheme_prefix").text("#");
                    })
                    .child(1, |text| {
                        text.kind("embedded_scheme_text").child(0, |list| {
                            list.kind("scheme_list")
                                .child_count(3)
                                .child(0, |head| {
                                    head.kind("scheme_symbol").text("+");
                                })
                                .child(1, |arg| {
                                    arg.kind("scheme_number").text("1");
                                })
                                .child(2, |arg| {
                                    arg.kind("scheme_number").text("2");
                                });
                        });
                    });
            });
    });
}

#[rstest]
#[case("#42", "scheme_number")]
#[case("##t", "scheme_boolean")]
#[case("#\"text\"", "scheme_string")]
#[case("#red", "scheme_symbol")]
#[case("$#:key", "scheme_keyword")]
#[case("#@(list 1)", "scheme_list")]
fn embedded_scheme_data(#[case] item: &str, #[case] datum: &str) {
    let sexp = item_sexp(item);
    assert!(
        sexp.starts_with("(embedded_scheme (embedded_scheme_prefix) (embedded_scheme_text ("),
        "{}",
        sexp
    );
    assert!(sexp.contains(datum), "{} lacks {}", sexp, datum);
}

#[test]
fn comments_before_a_compound_datum_stay_in_the_datum() {
    let sexp = item_sexp("#; note\n(f)");
    assert_eq!(
        sexp,
        "(embedded_scheme (embedded_scheme_prefix) (embedded_scheme_text (scheme_comment) (scheme_list (scheme_symbol))))"
    );
}

#[test]
fn comments_and_version_are_extras() {
    let source = "\\version \"2.24.0\"\n% melody\n{ c4 %{ inline %} d4 }\n% end\n";
    let tree = parse(source).unwrap();
    assert_tree(&tree)
        .kind("source_file")
        .span(0..source.len())
        .child_count(1)
        .extra_count(3)
        .raw_child(0, |version| {
            version
                .kind("version_statement")
                .is_extra()
                .text(TextMatch::StartsWith("\\version".into()));
        })
        .raw_child(1, |comment| {
            comment.kind("comment").text("% melody");
        })
        .child(0, |music| {
            music
                .kind("music")
                .text("{ c4 %{ inline %} d4 }")
                .child_count(2)
                .extra_count(1)
                .raw_child(1, |block| {
                    block.kind("block_comment").text("%{ inline %}");
                });
        });
}

#[test]
fn start_rule_can_be_any_production() {
    let parser = Parser::new(&LILYPOND).start_rule("tempo_event").unwrap();
    let tree = parser.parse("\\tempo 8 = 96").unwrap();
    assert_eq!(tree.root().kind(), "tempo_event");
}

#[test]
fn missing_time_arguments_fail_after_the_command() {
    let err = parse("{ c4 \\time }").unwrap_err();
    assert_eq!(err.offset, "{ c4 \\time ".len());
    assert_eq!(err.found, "'}'");
    for rule in ["number", "embedded_scheme", "beat_structure"] {
        assert!(err.expected_rules.contains(rule), "{:?}", err.expected());
    }
    let message = err.to_string();
    assert!(message.starts_with("Parse error at 1:12: expected "), "{}", message);
}

#[rstest]
#[case("{ c4", "end of input")]
#[case("{ c4 } }", "'}'")]
#[case("c4", "'c'")]
fn malformed_documents(#[case] source: &str, #[case] found: &str) {
    let err = parse(source).unwrap_err();
    assert_eq!(err.found, found);
}
