//! Testing utilities for syntax tree assertions
//!
//! Comparing whole s-expressions is fine for small inputs, but it stops being readable once
//! trees get deep, and it says nothing about spans or source text. [`assert_tree`] walks a
//! tree with a fluent API instead:
//!
//! ```rust-example
//! use lily::lily::parsing::parse;
//! use lily::lily::testing::{assert_tree, TextMatch};
//!
//! let tree = parse("{ bes,8. }")?;
//! assert_tree(&tree).kind("source_file").child(0, |music| {
//!     music.kind("music").child_count(1).child(0, |note| {
//!         note.kind("note")
//!             .text("bes,8.")
//!             .field("name", |name| { name.text("bes"); })
//!             .field("octave", |octave| { octave.text(","); })
//!             .field("duration", |d| { d.text(TextMatch::StartsWith("8".into())); });
//!     });
//! });
//! ```
//!
//! `child` indexes skip extras; `raw_child` and `extra_count` look at them. Every failure
//! message carries the path to the node (`source_file[0][2].duration`).

mod assertions;
mod matchers;

pub use assertions::{assert_tree, NodeAssertion};
pub use matchers::TextMatch;
