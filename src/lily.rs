//! Main module for lily library functionality

pub mod ast;
pub mod config;
pub mod formats;
pub mod grammar;
pub mod languages;
pub mod parsing;
pub mod testing;

pub use parsing::parse;
