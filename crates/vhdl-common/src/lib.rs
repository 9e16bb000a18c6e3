//! Shared types for the VHDL formatter: source spans, line lookup, the token
//! vocabulary produced by `vhdl-lexer`, and lexer errors.

pub mod error;
pub mod span;
pub mod token;
