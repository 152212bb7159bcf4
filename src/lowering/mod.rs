//! Lowering pass: turns the syntax tree into the semantic tree.
//!
//! Name resolution, type checking, overload resolution on operators and
//! implicit casts on call arguments all happen here.

pub mod declarations;
pub mod expr;
pub mod lowering;
pub mod stmt;

#[cfg(test)]
mod tests;
