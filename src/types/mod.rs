//! Type registry module.
//!
//! Every type the resolver handles lives in a `TypeRegistry` and is referred
//! to by a `TypeId`. Structurally equal types are hash-consed to the same id.
//!
//! - context: the registry, type kinds and per-type method scopes
//! - native: built-in native types and the catalog naming them
//! - conversions: the table of permitted implicit widenings

pub mod context;
pub mod conversions;
pub mod native;
