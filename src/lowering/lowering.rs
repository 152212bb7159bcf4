//! Entry point of the resolver.
//!
//! Lowering runs three strictly ordered phases over the whole program:
//!
//! 1. declare: every class and free function gets an empty shell, and every
//!    class its `TypeId`, so later phases can refer to any of them
//! 2. signatures: field types, method return and argument types
//! 3. bodies: statements and expressions of every method with a body
//!
//! The first diagnostic aborts the run.

use tracing::debug;

use crate::{
    ast::{ast, types::{TypeName, TypeNameKind}},
    errors::errors::{Error, ErrorImpl},
    semantic::{
        program::{Method, MethodId, MethodKind, NativeOperator, Program, Variable, VariableKind},
        scope::ScopeId,
    },
    types::{
        context::{TypeId, TypeRegistry},
        conversions::ConversionTable,
        native::{
            NativeKind, NativeTypeCatalog, ARITHMETIC_OPERATORS, COMPARISON_OPERATORS,
            LOGICAL_OPERATORS, NEGATE_OPERATOR, NOT_OPERATOR,
        },
    },
    Span,
};

/// State shared by the three phases of one resolution run.
pub struct Lowerer {
    pub registry: TypeRegistry,
    pub program: Program,
    /// Method whose body is being lowered.
    pub(super) current_method: Option<MethodId>,
}

impl Lowerer {
    pub fn new(registry: TypeRegistry) -> Self {
        Lowerer {
            registry,
            program: Program::new(),
            current_method: None,
        }
    }

    /// Populates the type-scopes of the native types with their operators.
    pub fn install_native_operators(&mut self) -> Result<(), Error> {
        let boolean = self.registry.boolean();

        for kind in NativeKind::ALL {
            let ty = self.registry.native(kind);

            if kind.is_integer() {
                for symbol in ARITHMETIC_OPERATORS {
                    self.add_operator(ty, symbol, Some(ty), ty)?;
                }
                for symbol in COMPARISON_OPERATORS {
                    self.add_operator(ty, symbol, Some(ty), boolean)?;
                }
                self.add_operator(ty, NEGATE_OPERATOR, None, ty)?;
            } else if kind == NativeKind::Boolean {
                for symbol in LOGICAL_OPERATORS {
                    self.add_operator(ty, symbol, Some(ty), boolean)?;
                }
                self.add_operator(ty, NOT_OPERATOR, None, boolean)?;
            }
        }

        Ok(())
    }

    fn add_operator(
        &mut self,
        operand: TypeId,
        symbol: &'static str,
        right: Option<TypeId>,
        result: TypeId,
    ) -> Result<MethodId, Error> {
        let arguments = match right {
            Some(right) => vec![self.program.add_variable(Variable::new(
                "rhs",
                right,
                VariableKind::Argument(0),
                Span::null(),
            ))],
            None => vec![],
        };

        let method = self.program.add_method(Method {
            name: symbol.to_string(),
            owner: None,
            return_type: result,
            arguments,
            receiver: None,
            scope: None,
            body: None,
            kind: MethodKind::Operator(NativeOperator { symbol, operand }),
            span: Span::null(),
        });
        self.registry.type_scope_mut(operand)?.add(symbol, method);

        Ok(method)
    }

    /// Resolves a written type against `scope`.
    pub fn resolve_type_name(&mut self, type_name: &TypeName, scope: ScopeId) -> Result<TypeId, Error> {
        match &type_name.kind {
            TypeNameKind::Named(name) => self
                .program
                .scopes
                .resolve_type(scope, name, &self.registry)
                .ok_or_else(|| {
                    Error::new(ErrorImpl::UnknownType { type_: name.clone() }, type_name.span.clone())
                }),
            TypeNameKind::Pointer(pointee) => {
                let pointee = self.resolve_type_name(pointee, scope)?;
                Ok(self.registry.pointer_to(pointee))
            },
            TypeNameKind::Array(element) => {
                let element = self.resolve_type_name(element, scope)?;
                Ok(self.registry.array_of(element))
            },
        }
    }

    pub(super) fn current_method(&self) -> Result<&Method, Error> {
        match self.current_method {
            Some(method) => self.program.method(method),
            None => Err(Error::internal("statement lowered outside of a method", Span::null())),
        }
    }

    fn finish(self) -> (TypeRegistry, Program) {
        (self.registry, self.program)
    }
}

/// Resolves a parsed program with the default native types and conversions.
pub fn resolve(syntax: &ast::Program) -> Result<(TypeRegistry, Program), Error> {
    resolve_with(syntax, NativeTypeCatalog::default(), ConversionTable::default())
}

/// Resolves a parsed program into a type registry and a semantic tree.
///
/// Each call works on fresh state: nothing is shared between two runs.
#[tracing::instrument(skip_all, fields(declarations = syntax.declarations.len()))]
pub fn resolve_with(
    syntax: &ast::Program,
    catalog: NativeTypeCatalog,
    conversions: ConversionTable,
) -> Result<(TypeRegistry, Program), Error> {
    let mut lowerer = Lowerer::new(TypeRegistry::new(catalog, conversions));
    lowerer.install_native_operators()?;

    debug!("declaring classes and functions");
    let declarations = lowerer.declare(syntax)?;

    debug!(classes = declarations.class_count(), functions = declarations.function_count(), "resolving signatures");
    let bodies = lowerer.resolve_signatures(&declarations)?;

    debug!(methods = bodies.len(), "resolving bodies");
    lowerer.resolve_bodies(&bodies)?;

    debug!(types = lowerer.registry.len(), scopes = lowerer.program.scopes.len(), "resolution finished");
    Ok(lowerer.finish())
}
