use std::collections::BTreeMap;

use tracing::trace;

use crate::{
    ast::ast::{self, ClassDecl, Declaration, MethodDecl},
    errors::errors::{Error, ErrorImpl},
    semantic::{
        program::{Class, ClassId, Method, MethodId, MethodKind, Variable, VariableKind},
        scope::ScopeKind,
    },
};

use super::lowering::Lowerer;

/// Shells created by the declare phase, keyed by name so that the later
/// phases visit them in name order.
pub struct Declarations<'a> {
    classes: BTreeMap<&'a str, (ClassId, &'a ClassDecl)>,
    functions: BTreeMap<&'a str, (MethodId, &'a MethodDecl)>,
}

impl Declarations<'_> {
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

fn method_kind(declaration: &MethodDecl) -> MethodKind {
    match declaration.body {
        Some(_) => MethodKind::User,
        None => MethodKind::External,
    }
}

impl Lowerer {
    /// Declare phase. Walks the declarations in source order, so a duplicate
    /// is reported at its second occurrence.
    pub fn declare<'a>(&mut self, syntax: &'a ast::Program) -> Result<Declarations<'a>, Error> {
        let mut declarations = Declarations {
            classes: BTreeMap::new(),
            functions: BTreeMap::new(),
        };

        for declaration in &syntax.declarations {
            match declaration {
                Declaration::Class(class) => {
                    let id = self.declare_class(class, &declarations)?;
                    declarations.classes.insert(class.name.as_str(), (id, class));
                },
                Declaration::Method(function) => {
                    let id = self.declare_function(function, &declarations)?;
                    declarations.functions.insert(function.name.as_str(), (id, function));
                },
            }
        }

        Ok(declarations)
    }

    fn declare_class(&mut self, class: &ClassDecl, declarations: &Declarations) -> Result<ClassId, Error> {
        // Native names are reserved.
        if declarations.classes.contains_key(class.name.as_str()) || self.registry.catalog().contains(&class.name) {
            return Err(Error::new(
                ErrorImpl::DuplicateClassDeclaration { class: class.name.clone() },
                class.span.clone(),
            ));
        }

        let id = self.program.next_class_id();
        let ty = self.registry.register_class(id, class.name.as_str());
        let global = self.program.global();
        self.program.scopes.declare_type(global, &class.name, ty, &class.span)?;
        let scope = self.program.scopes.push(ScopeKind::Class(id), global);

        let added = self.program.add_class(Class {
            name: class.name.clone(),
            ty,
            fields: BTreeMap::new(),
            field_order: Vec::new(),
            methods: BTreeMap::new(),
            scope,
            span: class.span.clone(),
        });
        trace!(class = %class.name, ty = %ty, "declared class");

        Ok(added)
    }

    fn declare_function(&mut self, function: &MethodDecl, declarations: &Declarations) -> Result<MethodId, Error> {
        if declarations.functions.contains_key(function.name.as_str()) {
            return Err(Error::new(
                ErrorImpl::DuplicateMethodDeclaration { method: function.name.clone() },
                function.span.clone(),
            ));
        }

        let id = self.program.add_function(Method {
            name: function.name.clone(),
            owner: None,
            return_type: self.registry.void(),
            arguments: Vec::new(),
            receiver: None,
            scope: None,
            body: None,
            kind: method_kind(function),
            span: function.span.clone(),
        });
        let global = self.program.global();
        self.program.scopes.declare_method(global, &function.name, id, &function.span)?;
        trace!(function = %function.name, "declared function");

        Ok(id)
    }

    /// Signature phase. Returns every method with its declaration in the
    /// order bodies are to be lowered: class methods by class then method
    /// name, then free functions by name.
    pub fn resolve_signatures<'a>(
        &mut self,
        declarations: &Declarations<'a>,
    ) -> Result<Vec<(MethodId, &'a MethodDecl)>, Error> {
        let mut bodies = Vec::new();

        for &(class_id, class) in declarations.classes.values() {
            self.resolve_fields(class_id, class)?;

            let mut methods = BTreeMap::new();
            for method in class.methods() {
                let id = self.declare_class_method(class_id, method)?;
                methods.insert(method.name.as_str(), (id, method));
            }
            bodies.extend(methods.into_values());
        }

        for &(id, function) in declarations.functions.values() {
            self.resolve_signature(id, function)?;
            bodies.push((id, function));
        }

        Ok(bodies)
    }

    fn resolve_fields(&mut self, class_id: ClassId, class: &ClassDecl) -> Result<(), Error> {
        let scope = self.program.class(class_id)?.scope;

        for (index, field) in class.fields().enumerate() {
            if self.program.class(class_id)?.fields.contains_key(&field.name) {
                return Err(Error::new(
                    ErrorImpl::DuplicateFieldDeclaration {
                        class: class.name.clone(),
                        field: field.name.clone(),
                    },
                    field.span.clone(),
                ));
            }

            let ty = self.resolve_type_name(&field.type_name, scope)?;
            let variable = self.program.add_variable(Variable::new(
                field.name.as_str(),
                ty,
                VariableKind::Field { class: class_id, index },
                field.span.clone(),
            ));
            self.program.scopes.declare_variable(scope, &field.name, variable, &field.span)?;

            let owner = self.program.class_mut(class_id)?;
            owner.fields.insert(field.name.clone(), variable);
            owner.field_order.push(variable);
            trace!(class = %class.name, field = %field.name, index, "resolved field");
        }

        Ok(())
    }

    fn declare_class_method(&mut self, class_id: ClassId, method: &MethodDecl) -> Result<MethodId, Error> {
        let (class_scope, class_ty) = {
            let class = self.program.class(class_id)?;
            if class.methods.contains_key(&method.name) {
                return Err(Error::new(
                    ErrorImpl::DuplicateMethodDeclaration { method: method.name.clone() },
                    method.span.clone(),
                ));
            }
            (class.scope, class.ty)
        };

        let id = self.program.add_method(Method {
            name: method.name.clone(),
            owner: Some(class_id),
            return_type: self.registry.void(),
            arguments: Vec::new(),
            receiver: None,
            scope: None,
            body: None,
            kind: method_kind(method),
            span: method.span.clone(),
        });
        self.program.scopes.declare_method(class_scope, &method.name, id, &method.span)?;
        self.program.class_mut(class_id)?.methods.insert(method.name.clone(), id);
        self.registry.type_scope_mut(class_ty)?.add(method.name.as_str(), id);

        self.resolve_signature(id, method)?;
        Ok(id)
    }

    /// Resolves return and argument types of `id` and builds its local scope,
    /// holding the receiver (for class methods) and the arguments.
    fn resolve_signature(&mut self, id: MethodId, declaration: &MethodDecl) -> Result<(), Error> {
        let owner = self.program.method(id)?.owner;
        let parent = match owner {
            Some(class) => self.program.class(class)?.scope,
            None => self.program.global(),
        };
        let scope = self.program.scopes.push(ScopeKind::Local, parent);

        let receiver = match owner {
            Some(class) => {
                let ty = self.program.class(class)?.ty;
                let receiver = self.program.add_variable(Variable::new(
                    "this",
                    ty,
                    VariableKind::Receiver,
                    declaration.span.clone(),
                ));
                self.program.scopes.declare_variable(scope, "this", receiver, &declaration.span)?;
                Some(receiver)
            },
            None => None,
        };

        let mut arguments = Vec::with_capacity(declaration.arguments.len());
        for (index, argument) in declaration.arguments.iter().enumerate() {
            let ty = self.resolve_type_name(&argument.type_name, scope)?;
            let variable = self.program.add_variable(Variable::new(
                argument.name.as_str(),
                ty,
                VariableKind::Argument(index),
                argument.span.clone(),
            ));
            self.program.scopes.declare_variable(scope, &argument.name, variable, &argument.span)?;
            arguments.push(variable);
        }

        let return_type = match &declaration.return_type {
            Some(return_type) => self.resolve_type_name(return_type, scope)?,
            None => self.registry.void(),
        };

        let method = self.program.method_mut(id)?;
        method.return_type = return_type;
        method.arguments = arguments;
        method.receiver = receiver;
        method.scope = Some(scope);
        trace!(method = %declaration.name, arguments = declaration.arguments.len(), "resolved signature");

        Ok(())
    }

    /// Body phase.
    pub fn resolve_bodies(&mut self, bodies: &[(MethodId, &MethodDecl)]) -> Result<(), Error> {
        for (id, declaration) in bodies {
            let Some(body) = &declaration.body else {
                continue;
            };
            let scope = match self.program.method(*id)?.scope {
                Some(scope) => scope,
                None => return Err(Error::internal(
                    format!("method {} has no scope", declaration.name),
                    declaration.span.clone(),
                )),
            };

            self.current_method = Some(*id);
            let block = self.lower_block_in(body, scope)?;
            self.program.method_mut(*id)?.body = Some(block);
            trace!(method = %declaration.name, "resolved body");
        }

        self.current_method = None;
        Ok(())
    }
}
