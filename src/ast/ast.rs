use crate::Span;

use super::{statements::BlockStmt, types::TypeName};

/// A whole compilation unit as handed over by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

impl Program {
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.declarations.iter().filter_map(|declaration| match declaration {
            Declaration::Class(class) => Some(class),
            Declaration::Method(_) => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &MethodDecl> {
        self.declarations.iter().filter_map(|declaration| match declaration {
            Declaration::Method(method) => Some(method),
            Declaration::Class(_) => None,
        })
    }
}

/// Top-level declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Class(ClassDecl),
    /// A free function living in the global scope.
    Method(MethodDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub features: Vec<Feature>,
    pub span: Span,
}

impl ClassDecl {
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.features.iter().filter_map(|feature| match feature {
            Feature::Field(field) => Some(field),
            Feature::Method(_) => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.features.iter().filter_map(|feature| match feature {
            Feature::Method(method) => Some(method),
            Feature::Field(_) => None,
        })
    }
}

/// Class members.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Field(FieldDecl),
    Method(MethodDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub type_name: TypeName,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    /// `None` means the method returns `Void`.
    pub return_type: Option<TypeName>,
    pub arguments: Vec<Argument>,
    /// Methods without a body are linked externally.
    pub body: Option<BlockStmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub type_name: TypeName,
    pub span: Span,
}
