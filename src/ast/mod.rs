/// AST (Abstract Syntax Tree) module
/// The syntax tree the parser produces and the resolver consumes
///
/// Submodules:
/// - ast: Compilation unit and declarations (classes, fields, methods)
/// - expressions: Expression nodes and operators
/// - statements: Statement nodes and blocks
/// - types: Unresolved type annotations
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
