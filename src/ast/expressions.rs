use std::fmt::Display;

use crate::Span;

use super::types::TypeName;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(NumberExpr),
    Boolean(BooleanExpr),
    /// A bare name: a variable, a field of the receiver, or a zero-argument method.
    Symbol(SymbolExpr),
    Call(CallExpr),
    Member(MemberExpr),
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    AddressOf(AddressOfExpr),
    ArrayNew(ArrayNewExpr),
    Cast(CastExpr),
    Index(IndexExpr),
    This(Span),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Number(expr) => &expr.span,
            Expr::Boolean(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::Member(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::AddressOf(expr) => &expr.span,
            Expr::ArrayNew(expr) => &expr.span,
            Expr::Cast(expr) => &expr.span,
            Expr::Index(expr) => &expr.span,
            Expr::This(span) => span,
        }
    }
}

// LITERALS

#[derive(Debug, Clone, PartialEq)]
pub struct NumberExpr {
    /// Magnitude as written; at most `2^63` so that `-<magnitude>` covers `i64::MIN`.
    pub value: u64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanExpr {
    pub value: bool,
    pub span: Span,
}

// NAMES AND CALLS

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

/// `name(args)` or `target.name(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub target: Option<Box<Expr>>,
    pub name: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// `target.name` without an argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub target: Box<Expr>,
    pub name: String,
    pub span: Span,
}

// OPERATORS

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Equals,
    NotEquals,
    And,
    Or,
}

impl BinaryOperator {
    /// The name the operator is registered under in a type-scope.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Not => "not",
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOperator,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub operator: UnaryOperator,
    pub right_expr: Box<Expr>,
    pub span: Span,
}

// MEMORY

/// `&operand`
#[derive(Debug, Clone, PartialEq)]
pub struct AddressOfExpr {
    pub operand: Box<Expr>,
    pub span: Span,
}

/// `new T[size]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNewExpr {
    pub element_type: TypeName,
    pub size: Box<Expr>,
    pub span: Span,
}

/// `array[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

/// `value as T`
#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
    pub value: Box<Expr>,
    pub target: TypeName,
    pub span: Span,
}
