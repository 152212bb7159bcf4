use std::fmt::Display;

use thiserror::Error;

use crate::Span;

/// A diagnostic raised by the lexer, the parser or the resolver.
///
/// Raising one aborts the current compilation unit; the value is handed back
/// to the driver untouched.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        tracing::trace!(error = %error_impl, line = span.first_line(), column = span.first_column(), "raising diagnostic");
        Error {
            internal_error: error_impl,
            span,
        }
    }

    /// Internal-consistency failure; never caused by the program being compiled.
    pub fn internal(message: impl Into<String>, span: Span) -> Self {
        Error::new(
            ErrorImpl::InternalError {
                message: message.into(),
            },
            span,
        )
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.internal_error, ErrorImpl::InternalError { .. })
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::DuplicateClassDeclaration { .. } => "DuplicateClassDeclaration",
            ErrorImpl::DuplicateFieldDeclaration { .. } => "DuplicateFieldDeclaration",
            ErrorImpl::DuplicateMethodDeclaration { .. } => "DuplicateMethodDeclaration",
            ErrorImpl::DuplicateVariableDeclaration { .. } => "DuplicateVariableDeclaration",
            ErrorImpl::FeatureNotFound { .. } => "FeatureNotFound",
            ErrorImpl::WrongArgumentCount { .. } => "WrongArgumentCount",
            ErrorImpl::OperatorNotFound { .. } => "OperatorNotFound",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::InvalidReturnType { .. } => "InvalidReturnType",
            ErrorImpl::NotAnLvalue { .. } => "NotAnLvalue",
            ErrorImpl::NotACall { .. } => "NotACall",
            ErrorImpl::InternalError { .. } => "InternalError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::DuplicateClassDeclaration { class } => {
                ErrorTip::Suggestion(format!("Class `{}` already declared", class))
            }
            ErrorImpl::DuplicateFieldDeclaration { class, field } => ErrorTip::Suggestion(
                format!("Field `{}` already declared in class `{}`", field, class),
            ),
            ErrorImpl::DuplicateMethodDeclaration { method } => {
                ErrorTip::Suggestion(format!("Method `{}` already declared", method))
            }
            ErrorImpl::DuplicateVariableDeclaration { variable } => ErrorTip::Suggestion(
                format!("Variable `{}` already declared in this block", variable),
            ),
            ErrorImpl::FeatureNotFound { feature } => ErrorTip::Suggestion(format!(
                "`{}` is not a variable, field or method in scope",
                feature
            )),
            ErrorImpl::WrongArgumentCount {
                method,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expects {} arguments, received {}",
                method, expected, received
            )),
            ErrorImpl::OperatorNotFound {
                operator,
                left,
                right,
            } => ErrorTip::Suggestion(match right {
                Some(right) => format!(
                    "No operator `{}` between `{}` and `{}`",
                    operator, left, right
                ),
                None => format!("No operator `{}` for `{}`", operator, left),
            }),
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::InvalidReturnType { expected, received } => ErrorTip::Suggestion(
                format!("Method returns `{}`, but `{}` is returned", expected, received),
            ),
            ErrorImpl::NotAnLvalue { type_ } => ErrorTip::Suggestion(format!(
                "Expression of type `{}` does not denote a storage location",
                type_
            )),
            ErrorImpl::NotACall { type_ } => ErrorTip::Suggestion(format!(
                "Expression of type `{}` used as a statement, only calls may be",
                type_
            )),
            ErrorImpl::InternalError { .. } => ErrorTip::Suggestion(String::from(
                "This is a compiler bug, please file a report",
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unknown type {type_}")]
    UnknownType { type_: String },
    #[error("class {class:?} already declared")]
    DuplicateClassDeclaration { class: String },
    #[error("field {field:?} already declared in class {class:?}")]
    DuplicateFieldDeclaration { class: String, field: String },
    #[error("method {method:?} already declared")]
    DuplicateMethodDeclaration { method: String },
    #[error("variable {variable:?} already declared")]
    DuplicateVariableDeclaration { variable: String },
    #[error("feature {feature:?} not found")]
    FeatureNotFound { feature: String },
    #[error("wrong argument count for {method:?}: expected {expected}, received {received}")]
    WrongArgumentCount {
        method: String,
        expected: usize,
        received: usize,
    },
    #[error("operator {operator:?} not found for {left}{}", describe_right(.right))]
    OperatorNotFound {
        operator: String,
        left: String,
        right: Option<String>,
    },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("invalid return type: expected {expected}, received {received}")]
    InvalidReturnType { expected: String, received: String },
    #[error("expression of type {type_} is not an lvalue")]
    NotAnLvalue { type_: String },
    #[error("expression of type {type_} is not a call")]
    NotACall { type_: String },
    #[error("internal compiler error: {message}")]
    InternalError { message: String },
}

fn describe_right(right: &Option<String>) -> String {
    match right {
        Some(right) => format!(" and {}", right),
        None => String::new(),
    }
}
