use std::collections::BTreeMap;

use crate::{
    errors::errors::{Error, ErrorImpl},
    types::context::{TypeId, TypeRegistry},
    Span,
};

use super::program::{ClassId, MethodId, VariableId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The root: free functions and classes.
    Global,
    /// Members of one class.
    Class(ClassId),
    /// A method body or a nested block.
    Local,
}

/// One lexical namespace. Variables, methods and types are kept apart, so
/// the same name may denote one of each.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    variables: BTreeMap<String, VariableId>,
    methods: BTreeMap<String, MethodId>,
    types: BTreeMap<String, TypeId>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope {
            kind,
            parent,
            variables: BTreeMap::new(),
            methods: BTreeMap::new(),
            types: BTreeMap::new(),
        }
    }

    pub fn variable(&self, name: &str) -> Option<VariableId> {
        self.variables.get(name).copied()
    }

    pub fn method(&self, name: &str) -> Option<MethodId> {
        self.methods.get(name).copied()
    }

    pub fn user_type(&self, name: &str) -> Option<TypeId> {
        self.types.get(name).copied()
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, VariableId)> {
        self.variables.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

/// Arena of every scope in a compilation unit. Parents are handles, so a
/// scope never keeps its ancestors alive.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// Creates a tree holding only the global scope.
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope::new(ScopeKind::Global, None)],
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn push(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope::new(kind, Some(parent)));
        ScopeId((self.scopes.len() - 1) as u32)
    }

    pub fn get(&self, id: ScopeId) -> Result<&Scope, Error> {
        self.scopes
            .get(id.index())
            .ok_or_else(|| Error::internal(format!("scope {} does not exist", id.index()), Span::null()))
    }

    fn get_mut(&mut self, id: ScopeId) -> Result<&mut Scope, Error> {
        self.scopes
            .get_mut(id.index())
            .ok_or_else(|| Error::internal(format!("scope {} does not exist", id.index()), Span::null()))
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Binds `name` in exactly `scope`. Shadowing a binding of an enclosing
    /// scope is fine; rebinding within the same scope is not.
    pub fn declare_variable(
        &mut self,
        scope: ScopeId,
        name: &str,
        variable: VariableId,
        span: &Span,
    ) -> Result<(), Error> {
        let scope = self.get_mut(scope)?;
        if scope.variables.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::DuplicateVariableDeclaration { variable: name.to_string() },
                span.clone(),
            ));
        }

        scope.variables.insert(name.to_string(), variable);
        Ok(())
    }

    pub fn declare_method(
        &mut self,
        scope: ScopeId,
        name: &str,
        method: MethodId,
        span: &Span,
    ) -> Result<(), Error> {
        let scope = self.get_mut(scope)?;
        if scope.methods.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::DuplicateMethodDeclaration { method: name.to_string() },
                span.clone(),
            ));
        }

        scope.methods.insert(name.to_string(), method);
        Ok(())
    }

    pub fn declare_type(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: TypeId,
        span: &Span,
    ) -> Result<(), Error> {
        let scope = self.get_mut(scope)?;
        if scope.types.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::DuplicateClassDeclaration { class: name.to_string() },
                span.clone(),
            ));
        }

        scope.types.insert(name.to_string(), ty);
        Ok(())
    }

    /// Walks from `scope` towards the root and returns the first scope for
    /// which `lookup` finds something.
    fn resolve<T>(&self, scope: ScopeId, lookup: impl Fn(&Scope) -> Option<T>) -> Option<T> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scopes.get(id.index())?;
            if let Some(found) = lookup(scope) {
                return Some(found);
            }
            current = scope.parent;
        }

        None
    }

    pub fn resolve_variable(&self, scope: ScopeId, name: &str) -> Option<VariableId> {
        self.resolve(scope, |scope| scope.variable(name))
    }

    pub fn resolve_method(&self, scope: ScopeId, name: &str) -> Option<MethodId> {
        self.resolve(scope, |scope| scope.method(name))
    }

    /// Resolves a type name. At the global scope the native catalog is
    /// consulted before user classes.
    pub fn resolve_type(&self, scope: ScopeId, name: &str, registry: &TypeRegistry) -> Option<TypeId> {
        self.resolve(scope, |scope| match scope.kind {
            ScopeKind::Global => registry
                .native_by_name(name)
                .or_else(|| scope.user_type(name)),
            _ => scope.user_type(name),
        })
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        ScopeTree::new()
    }
}
