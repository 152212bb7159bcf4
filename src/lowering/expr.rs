use tracing::trace;

use crate::{
    ast::expressions::{BinaryExpr, CallExpr, Expr, MemberExpr, PrefixExpr, UnaryOperator},
    errors::errors::{Error, ErrorImpl},
    semantic::{
        program::{MethodId, VariableKind},
        scope::ScopeId,
        typed_ast::{TypedExpr, TypedExprKind},
    },
    types::context::TypeId,
    Span,
};

use super::lowering::Lowerer;

fn feature_not_found(name: &str, span: &Span) -> Error {
    Error::new(ErrorImpl::FeatureNotFound { feature: name.to_string() }, span.clone())
}

impl Lowerer {
    pub fn lower_expr(&mut self, expr: &Expr, scope: ScopeId) -> Result<TypedExpr, Error> {
        match expr {
            Expr::Number(number) => match i64::try_from(number.value) {
                Ok(value) => Ok(TypedExpr::new(
                    TypedExprKind::IntConst(value),
                    self.registry.integer(),
                    number.span.clone(),
                )),
                // Only `2^63` gets here, and it is only valid negated.
                Err(_) => Err(Error::new(
                    ErrorImpl::NumberParseError { token: number.value.to_string() },
                    number.span.clone(),
                )),
            },
            Expr::Boolean(boolean) => Ok(TypedExpr::new(
                TypedExprKind::BoolConst(boolean.value),
                self.registry.boolean(),
                boolean.span.clone(),
            )),
            Expr::Symbol(symbol) => self.lower_name(&symbol.value, &symbol.span, scope),
            Expr::This(span) => self.this_expr(span),
            Expr::Call(call) => self.lower_call(call, scope),
            Expr::Member(member) => self.lower_member(member, scope),
            Expr::Binary(binary) => self.lower_binary(binary, scope),
            Expr::Prefix(prefix) => self.lower_prefix(prefix, scope),
            Expr::AddressOf(address_of) => {
                let operand = self.lower_expr(&address_of.operand, scope)?;
                if !operand.is_lvalue() {
                    return Err(Error::new(
                        ErrorImpl::NotAnLvalue { type_: self.registry.type_name(operand.ty) },
                        operand.span.clone(),
                    ));
                }

                let ty = self.registry.pointer_to(operand.ty);
                Ok(TypedExpr::new(TypedExprKind::AddressOf(Box::new(operand)), ty, address_of.span.clone()))
            },
            Expr::ArrayNew(array_new) => {
                let element = self.resolve_type_name(&array_new.element_type, scope)?;
                let size = self.lower_expr(&array_new.size, scope)?;
                let size = self.coerce(size, self.registry.integer())?;

                let ty = self.registry.array_of(element);
                Ok(TypedExpr::new(
                    TypedExprKind::ArrayNew { element, size: Box::new(size) },
                    ty,
                    array_new.span.clone(),
                ))
            },
            Expr::Cast(cast) => {
                // Explicit casts are always accepted; their validity is up to the backend.
                let value = self.lower_expr(&cast.value, scope)?;
                let target = self.resolve_type_name(&cast.target, scope)?;

                Ok(TypedExpr::new(
                    TypedExprKind::Cast { value: Box::new(value), implicit: false },
                    target,
                    cast.span.clone(),
                ))
            },
            Expr::Index(index) => {
                let array = self.lower_expr(&index.array, scope)?;
                let element = match self.registry.element_of(array.ty) {
                    Some(element) => element,
                    None => return Err(Error::new(
                        ErrorImpl::TypeMismatch {
                            expected: String::from("array"),
                            received: self.registry.type_name(array.ty),
                        },
                        array.span.clone(),
                    )),
                };
                let position = self.lower_expr(&index.index, scope)?;
                let position = self.coerce(position, self.registry.integer())?;

                Ok(TypedExpr::new(
                    TypedExprKind::Index { array: Box::new(array), index: Box::new(position) },
                    element,
                    index.span.clone(),
                ))
            },
        }
    }

    /// The implicit receiver of the method being lowered.
    fn this_expr(&self, span: &Span) -> Result<TypedExpr, Error> {
        let receiver = match self.current_method()?.receiver {
            Some(receiver) => receiver,
            None => return Err(feature_not_found("this", span)),
        };
        let ty = self.program.variable(receiver)?.ty;

        Ok(TypedExpr::new(TypedExprKind::This, ty, span.clone()))
    }

    /// A bare name: a variable, else a field of the receiver, else a method
    /// called without arguments.
    fn lower_name(&mut self, name: &str, span: &Span, scope: ScopeId) -> Result<TypedExpr, Error> {
        if let Some(id) = self.program.scopes.resolve_variable(scope, name) {
            let variable = self.program.variable(id)?;
            let (kind, ty) = (variable.kind, variable.ty);

            return match kind {
                VariableKind::Field { .. } => {
                    let target = self.this_expr(span)?;
                    Ok(TypedExpr::new(
                        TypedExprKind::FieldAccess { target: Box::new(target), field: id },
                        ty,
                        span.clone(),
                    ))
                },
                VariableKind::Receiver => self.this_expr(span),
                VariableKind::Local | VariableKind::Argument(_) => {
                    Ok(TypedExpr::new(TypedExprKind::Variable(id), ty, span.clone()))
                },
            };
        }

        if let Some(method) = self.program.scopes.resolve_method(scope, name) {
            let receiver = self.implicit_receiver(method, span)?;
            return self.build_call(method, receiver, &[], span, scope);
        }

        Err(feature_not_found(name, span))
    }

    fn implicit_receiver(&self, method: MethodId, span: &Span) -> Result<Option<TypedExpr>, Error> {
        match self.program.method(method)?.owner {
            Some(_) => Ok(Some(self.this_expr(span)?)),
            None => Ok(None),
        }
    }

    fn lower_call(&mut self, call: &CallExpr, scope: ScopeId) -> Result<TypedExpr, Error> {
        match &call.target {
            Some(target) => {
                // Qualified calls only look at the target's type-scope.
                let target = self.lower_expr(target, scope)?;
                let method = match self.registry.type_scope(target.ty)?.candidates(&call.name).first() {
                    Some(method) => *method,
                    None => return Err(feature_not_found(&call.name, &call.span)),
                };
                self.build_call(method, Some(target), &call.arguments, &call.span, scope)
            },
            None => {
                let method = match self.program.scopes.resolve_method(scope, &call.name) {
                    Some(method) => method,
                    None => return Err(feature_not_found(&call.name, &call.span)),
                };
                let receiver = self.implicit_receiver(method, &call.span)?;
                self.build_call(method, receiver, &call.arguments, &call.span, scope)
            },
        }
    }

    /// Checks the argument count, then lowers each argument and casts it to
    /// the matching parameter type.
    fn build_call(
        &mut self,
        method: MethodId,
        receiver: Option<TypedExpr>,
        arguments: &[Expr],
        span: &Span,
        scope: ScopeId,
    ) -> Result<TypedExpr, Error> {
        let parameters = self.program.parameter_types(method)?;
        let (name, return_type) = {
            let method = self.program.method(method)?;
            (method.name.clone(), method.return_type)
        };

        if parameters.len() != arguments.len() {
            return Err(Error::new(
                ErrorImpl::WrongArgumentCount {
                    method: name,
                    expected: parameters.len(),
                    received: arguments.len(),
                },
                span.clone(),
            ));
        }

        let mut lowered = Vec::with_capacity(arguments.len());
        for (argument, parameter) in arguments.iter().zip(parameters) {
            let argument = self.lower_expr(argument, scope)?;
            lowered.push(self.coerce(argument, parameter)?);
        }
        trace!(method = %name, arguments = lowered.len(), "resolved call");

        Ok(TypedExpr::new(
            TypedExprKind::MethodCall {
                receiver: receiver.map(Box::new),
                method,
                arguments: lowered,
            },
            return_type,
            span.clone(),
        ))
    }

    /// `target.name`: a field of a class value, else a method of the
    /// target's type called without arguments.
    fn lower_member(&mut self, member: &MemberExpr, scope: ScopeId) -> Result<TypedExpr, Error> {
        let target = self.lower_expr(&member.target, scope)?;

        if let Some(class) = self.registry.class_of(target.ty) {
            if let Some(field) = self.program.class(class)?.fields.get(&member.name).copied() {
                let ty = self.program.variable(field)?.ty;
                return Ok(TypedExpr::new(
                    TypedExprKind::FieldAccess { target: Box::new(target), field },
                    ty,
                    member.span.clone(),
                ));
            }
        }

        let method = self.registry.type_scope(target.ty)?.candidates(&member.name).first().copied();
        match method {
            Some(method) => self.build_call(method, Some(target), &[], &member.span, scope),
            None => Err(feature_not_found(&member.name, &member.span)),
        }
    }

    fn lower_binary(&mut self, binary: &BinaryExpr, scope: ScopeId) -> Result<TypedExpr, Error> {
        let left = self.lower_expr(&binary.left, scope)?;
        let right = self.lower_expr(&binary.right, scope)?;
        let symbol = binary.operator.symbol();

        // An exact match on the right operand wins; otherwise exactly one
        // candidate must accept it through an implicit conversion.
        let candidates = self.registry.type_scope(left.ty)?.candidates(symbol).to_vec();
        let mut widenings = Vec::new();
        for candidate in candidates {
            let parameters = self.program.parameter_types(candidate)?;
            if parameters.len() != 1 {
                continue;
            }
            if parameters[0] == right.ty {
                return self.binary_call(candidate, left, right, &binary.span);
            }
            if self.converts(&right, parameters[0]) {
                widenings.push((candidate, parameters[0]));
            }
        }

        if let [(candidate, parameter)] = widenings[..] {
            let right = self.coerce(right, parameter)?;
            return self.binary_call(candidate, left, right, &binary.span);
        }

        Err(Error::new(
            ErrorImpl::OperatorNotFound {
                operator: symbol.to_string(),
                left: self.registry.type_name(left.ty),
                right: Some(self.registry.type_name(right.ty)),
            },
            binary.span.clone(),
        ))
    }

    fn binary_call(&self, operator: MethodId, left: TypedExpr, right: TypedExpr, span: &Span) -> Result<TypedExpr, Error> {
        let ty = self.program.method(operator)?.return_type;

        Ok(TypedExpr::new(
            TypedExprKind::Binary { operator, left: Box::new(left), right: Box::new(right) },
            ty,
            span.clone(),
        ))
    }

    fn lower_prefix(&mut self, prefix: &PrefixExpr, scope: ScopeId) -> Result<TypedExpr, Error> {
        // Negative literals stay literals so they can still narrow implicitly.
        // The fold skips the type-scope, so no unary `-` operator is resolved here.
        if let (UnaryOperator::Negate, Expr::Number(number)) = (prefix.operator, prefix.right_expr.as_ref()) {
            if let Some(value) = 0i64.checked_sub_unsigned(number.value) {
                return Ok(TypedExpr::new(
                    TypedExprKind::IntConst(value),
                    self.registry.integer(),
                    prefix.span.clone(),
                ));
            }
        }

        let operand = self.lower_expr(&prefix.right_expr, scope)?;
        let symbol = prefix.operator.symbol();

        let mut operator = None;
        for candidate in self.registry.type_scope(operand.ty)?.candidates(symbol) {
            if self.program.method(*candidate)?.arguments.is_empty() {
                operator = Some(*candidate);
                break;
            }
        }

        match operator {
            Some(operator) => {
                let ty = self.program.method(operator)?.return_type;
                Ok(TypedExpr::new(
                    TypedExprKind::Unary { operator, operand: Box::new(operand) },
                    ty,
                    prefix.span.clone(),
                ))
            },
            None => Err(Error::new(
                ErrorImpl::OperatorNotFound {
                    operator: symbol.to_string(),
                    left: self.registry.type_name(operand.ty),
                    right: None,
                },
                prefix.span.clone(),
            )),
        }
    }

    /// Whether `expr` may be passed where `to` is expected via an implicit cast.
    fn converts(&self, expr: &TypedExpr, to: TypeId) -> bool {
        match expr.kind {
            TypedExprKind::IntConst(value) if self.registry.literal_converts(value, to) => true,
            _ => self.registry.is_widening(expr.ty, to),
        }
    }

    /// Passes `expr` unchanged when it already has type `to`, wraps it in an
    /// implicit cast when a conversion is permitted, and fails otherwise.
    pub fn coerce(&self, expr: TypedExpr, to: TypeId) -> Result<TypedExpr, Error> {
        if expr.ty == to {
            return Ok(expr);
        }

        if !self.converts(&expr, to) {
            return Err(Error::new(
                ErrorImpl::TypeMismatch {
                    expected: self.registry.type_name(to),
                    received: self.registry.type_name(expr.ty),
                },
                expr.span.clone(),
            ));
        }

        let span = expr.span.clone();
        Ok(TypedExpr::new(
            TypedExprKind::Cast { value: Box::new(expr), implicit: true },
            to,
            span,
        ))
    }
}
