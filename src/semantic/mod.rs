//! Semantic tree module.
//!
//! The resolved form of a program, built by the lowering pass and handed to
//! the code generator. Long-lived nodes live in arenas owned by `Program` and
//! refer to each other through handles.
//!
//! - program: classes, methods, variables and their ids
//! - scope: the scope tree used for name resolution
//! - typed_ast: resolved statements and expressions

pub mod program;
pub mod scope;
pub mod typed_ast;

#[cfg(test)]
mod tests;
