//! Resolved statements and expressions.
//!
//! Every expression carries its `TypeId`; every name has been replaced by a
//! handle into the `Program` arenas. The code generator trusts these trees
//! without re-checking them.

use crate::{types::context::TypeId, Span};

use super::{
    program::{MethodId, VariableId},
    scope::ScopeId,
};

#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    pub kind: TypedExprKind,
    pub ty: TypeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedExprKind {
    /// A local, argument or receiver binding.
    Variable(VariableId),
    FieldAccess {
        target: Box<TypedExpr>,
        field: VariableId,
    },
    /// Call of a method or free function. Arguments are already cast to the
    /// parameter types.
    MethodCall {
        receiver: Option<Box<TypedExpr>>,
        method: MethodId,
        arguments: Vec<TypedExpr>,
    },
    Unary {
        operator: MethodId,
        operand: Box<TypedExpr>,
    },
    Binary {
        operator: MethodId,
        left: Box<TypedExpr>,
        right: Box<TypedExpr>,
    },
    AddressOf(Box<TypedExpr>),
    ArrayNew {
        element: TypeId,
        size: Box<TypedExpr>,
    },
    Index {
        array: Box<TypedExpr>,
        index: Box<TypedExpr>,
    },
    /// Conversion to `ty`; `implicit` when inserted by the resolver.
    Cast {
        value: Box<TypedExpr>,
        implicit: bool,
    },
    IntConst(i64),
    BoolConst(bool),
    This,
}

impl TypedExpr {
    pub fn new(kind: TypedExprKind, ty: TypeId, span: Span) -> Self {
        TypedExpr { kind, ty, span }
    }

    /// Whether the expression denotes a storage location.
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self.kind,
            TypedExprKind::Variable(_) | TypedExprKind::FieldAccess { .. } | TypedExprKind::Index { .. }
        )
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, TypedExprKind::MethodCall { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedStmt {
    Assignment {
        target: TypedExpr,
        value: TypedExpr,
        span: Span,
    },
    Return {
        value: Option<TypedExpr>,
        span: Span,
    },
    Block(TypedBlock),
    If {
        condition: TypedExpr,
        then_body: TypedBlock,
        /// Empty when the source has no `else`.
        else_body: TypedBlock,
        span: Span,
    },
    While {
        condition: TypedExpr,
        body: TypedBlock,
        span: Span,
    },
    /// A call evaluated for its effect.
    Call(TypedExpr),
}

impl TypedStmt {
    pub fn get_span(&self) -> &Span {
        match self {
            TypedStmt::Assignment { span, .. } => span,
            TypedStmt::Return { span, .. } => span,
            TypedStmt::Block(block) => &block.span,
            TypedStmt::If { span, .. } => span,
            TypedStmt::While { span, .. } => span,
            TypedStmt::Call(expr) => &expr.span,
        }
    }
}

/// A list of statements together with the local scope they were resolved in.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedBlock {
    pub body: Vec<TypedStmt>,
    pub scope: ScopeId,
    pub span: Span,
}

impl TypedBlock {
    pub fn iter(&self) -> std::slice::Iter<'_, TypedStmt> {
        self.body.iter()
    }
}
