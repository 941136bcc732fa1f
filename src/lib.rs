//! # lily
//!
//! A PEG grammar engine with a built-in grammar for LilyPond notation and embedded Scheme.
//!
//! Grammars are data: rule tables of [`Expression`](lily::grammar::Expression) trees, merged
//! and validated into a [`Grammar`](lily::grammar::Grammar), and interpreted directly by the
//! parser. The notation grammar and the Scheme grammar refer to each other, so `#(...)`
//! inside music and `#{ ... #}` inside Scheme nest to any depth.
//!
//! ## Testing
//!
//! See the [testing module](lily::testing) for the fluent tree assertions used throughout
//! the test suite.

pub mod lily;
