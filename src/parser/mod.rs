//! Parser module for building the syntax tree.
//!
//! This module contains the parser that transforms a stream of tokens
//! into a `Program`. It uses recursive descent for declarations and a
//! Pratt parser for expressions with proper operator precedence, and handles:
//!
//! - Class and free function declarations
//! - Statement parsing (variables, assignment, control flow, blocks)
//! - Expression parsing (operators, calls, member access, casts)
//! - Type parsing for type annotations
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod decl;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
