use tracing::trace;

use crate::{
    ast::statements::{BlockStmt, IfStmt, ReturnStmt, Stmt, VarDeclStmt, WhileStmt},
    ast::expressions::Expr,
    errors::errors::{Error, ErrorImpl},
    semantic::{
        program::{Variable, VariableKind},
        scope::{ScopeId, ScopeKind},
        typed_ast::{TypedBlock, TypedExpr, TypedExprKind, TypedStmt},
    },
    Span,
};

use super::lowering::Lowerer;

impl Lowerer {
    /// Lowers `block` directly in `scope`; used for method bodies, whose
    /// scope already holds the receiver and arguments.
    pub fn lower_block_in(&mut self, block: &BlockStmt, scope: ScopeId) -> Result<TypedBlock, Error> {
        let mut body = Vec::with_capacity(block.body.len());
        for stmt in block.iter() {
            if let Some(stmt) = self.lower_stmt(stmt, scope)? {
                body.push(stmt);
            }
        }

        Ok(TypedBlock {
            body,
            scope,
            span: block.span.clone(),
        })
    }

    /// Lowers `block` in a fresh local scope nested in `parent`.
    fn lower_nested_block(&mut self, block: &BlockStmt, parent: ScopeId) -> Result<TypedBlock, Error> {
        let scope = self.program.scopes.push(ScopeKind::Local, parent);
        self.lower_block_in(block, scope)
    }

    /// Lowers one statement. A declaration without initializer produces nothing.
    fn lower_stmt(&mut self, stmt: &Stmt, scope: ScopeId) -> Result<Option<TypedStmt>, Error> {
        match stmt {
            Stmt::Expression(stmt) => {
                let expr = self.lower_expr(&stmt.expression, scope)?;
                if !expr.is_call() {
                    return Err(Error::new(
                        ErrorImpl::NotACall { type_: self.registry.type_name(expr.ty) },
                        stmt.span.clone(),
                    ));
                }
                Ok(Some(TypedStmt::Call(expr)))
            },
            Stmt::Assignment(stmt) => {
                let target = self.lower_expr(&stmt.assignee, scope)?;
                let value = self.lower_expr(&stmt.value, scope)?;
                self.assignment(target, value, &stmt.span).map(Some)
            },
            Stmt::Return(stmt) => self.lower_return(stmt, scope).map(Some),
            Stmt::VarDecl(stmt) => self.lower_var_decl(stmt, scope),
            Stmt::If(stmt) => self.lower_if(stmt, scope).map(Some),
            Stmt::While(stmt) => self.lower_while(stmt, scope).map(Some),
            Stmt::Block(block) => Ok(Some(TypedStmt::Block(self.lower_nested_block(block, scope)?))),
        }
    }

    /// Assignment needs an lvalue target and a value of exactly the target's type.
    fn assignment(&mut self, target: TypedExpr, value: TypedExpr, span: &Span) -> Result<TypedStmt, Error> {
        if !target.is_lvalue() {
            return Err(Error::new(
                ErrorImpl::NotAnLvalue { type_: self.registry.type_name(target.ty) },
                target.span.clone(),
            ));
        }

        if value.ty != target.ty {
            return Err(Error::new(
                ErrorImpl::TypeMismatch {
                    expected: self.registry.type_name(target.ty),
                    received: self.registry.type_name(value.ty),
                },
                value.span.clone(),
            ));
        }

        Ok(TypedStmt::Assignment {
            target,
            value,
            span: span.clone(),
        })
    }

    fn lower_var_decl(&mut self, stmt: &VarDeclStmt, scope: ScopeId) -> Result<Option<TypedStmt>, Error> {
        let ty = self.resolve_type_name(&stmt.explicit_type, scope)?;

        // The initializer is resolved before the new name becomes visible.
        let value = match &stmt.assigned_value {
            Some(value) => Some(self.lower_expr(value, scope)?),
            None => None,
        };

        let variable = self.program.add_variable(Variable::new(
            stmt.identifier.as_str(),
            ty,
            VariableKind::Local,
            stmt.span.clone(),
        ));
        self.program.scopes.declare_variable(scope, &stmt.identifier, variable, &stmt.span)?;
        trace!(variable = %stmt.identifier, ty = %self.registry.type_name(ty), "declared local");

        match value {
            Some(value) => {
                let target = TypedExpr::new(TypedExprKind::Variable(variable), ty, stmt.span.clone());
                self.assignment(target, value, &stmt.span).map(Some)
            },
            None => Ok(None),
        }
    }

    fn lower_return(&mut self, stmt: &ReturnStmt, scope: ScopeId) -> Result<TypedStmt, Error> {
        let expected = self.current_method()?.return_type;
        let void = self.registry.void();

        let value = match &stmt.value {
            Some(value) => Some(self.lower_expr(value, scope)?),
            None => None,
        };

        let received = match &value {
            Some(value) => value.ty,
            None => void,
        };

        // A `Void` method may not return a value, not even a `Void` one.
        let mismatch = if expected == void { value.is_some() } else { received != expected };
        if mismatch {
            return Err(Error::new(
                ErrorImpl::InvalidReturnType {
                    expected: self.registry.type_name(expected),
                    received: self.registry.type_name(received),
                },
                stmt.span.clone(),
            ));
        }

        Ok(TypedStmt::Return {
            value,
            span: stmt.span.clone(),
        })
    }

    fn lower_condition(&mut self, condition: &Expr, scope: ScopeId) -> Result<TypedExpr, Error> {
        let condition = self.lower_expr(condition, scope)?;
        let boolean = self.registry.boolean();

        if condition.ty != boolean {
            return Err(Error::new(
                ErrorImpl::TypeMismatch {
                    expected: self.registry.type_name(boolean),
                    received: self.registry.type_name(condition.ty),
                },
                condition.span.clone(),
            ));
        }

        Ok(condition)
    }

    fn lower_if(&mut self, stmt: &IfStmt, scope: ScopeId) -> Result<TypedStmt, Error> {
        let condition = self.lower_condition(&stmt.condition, scope)?;
        let then_body = self.lower_nested_block(&stmt.then_body, scope)?;
        let else_body = match &stmt.else_body {
            Some(block) => self.lower_nested_block(block, scope)?,
            None => TypedBlock {
                body: Vec::new(),
                scope: self.program.scopes.push(ScopeKind::Local, scope),
                span: stmt.span.clone(),
            },
        };

        Ok(TypedStmt::If {
            condition,
            then_body,
            else_body,
            span: stmt.span.clone(),
        })
    }

    fn lower_while(&mut self, stmt: &WhileStmt, scope: ScopeId) -> Result<TypedStmt, Error> {
        let condition = self.lower_condition(&stmt.condition, scope)?;
        let body = self.lower_nested_block(&stmt.body, scope)?;

        Ok(TypedStmt::While {
            condition,
            body,
            span: stmt.span.clone(),
        })
    }
}
