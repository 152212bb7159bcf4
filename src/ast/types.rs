//! Type annotations as written in source.
//!
//! These are unresolved: a `Named` type is only a string until the resolver
//! looks it up in the scope chain and turns it into a `TypeId`.

use std::fmt::Display;

use crate::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    pub kind: TypeNameKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNameKind {
    Named(String),
    /// `T*`
    Pointer(Box<TypeName>),
    /// `T[]`
    Array(Box<TypeName>),
}

impl TypeName {
    pub fn named(name: impl Into<String>, span: Span) -> Self {
        TypeName {
            kind: TypeNameKind::Named(name.into()),
            span,
        }
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TypeNameKind::Named(name) => write!(f, "{}", name),
            TypeNameKind::Pointer(pointee) => write!(f, "{}*", pointee),
            TypeNameKind::Array(element) => write!(f, "{}[]", element),
        }
    }
}
