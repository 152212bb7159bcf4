//! Error types and error handling for the compiler.
//!
//! This module defines the diagnostics shared by every stage:
//!
//! - Lexer and parser errors carrying the offending token
//! - The closed set of resolution diagnostics (unknown types, duplicates,
//!   failed lookups, argument and type mismatches)
//! - The internal-consistency kind reserved for compiler bugs
//!
//! Every diagnostic carries the source span it was raised at.

pub mod errors;
