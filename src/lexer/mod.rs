//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts class-language
//! source into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, identifiers, integer literals, and operators
//! - Line/column tracking for error reporting
//! - `//` comments and whitespace

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
