use std::{cell::Cell, collections::BTreeMap};

use crate::{
    errors::errors::Error,
    types::context::TypeId,
    Span,
};

use super::{
    scope::{ScopeId, ScopeTree},
    typed_ast::TypedBlock,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(u32);

impl ClassId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl MethodId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl VariableId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Opaque storage handle a code generator attaches to a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageSlot(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Local,
    /// Position within the method's argument list.
    Argument(usize),
    /// Position within the owning class's layout.
    Field { class: ClassId, index: usize },
    /// The implicit `this` of a class method.
    Receiver,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub ty: TypeId,
    pub kind: VariableKind,
    /// Filled in by the backend; resolution leaves it empty.
    pub storage: Cell<Option<StorageSlot>>,
    pub span: Span,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: TypeId, kind: VariableKind, span: Span) -> Self {
        Variable {
            name: name.into(),
            ty,
            kind,
            storage: Cell::new(None),
            span,
        }
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind, VariableKind::Field { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    pub ty: TypeId,
    pub fields: BTreeMap<String, VariableId>,
    /// Fields in layout order.
    pub field_order: Vec<VariableId>,
    pub methods: BTreeMap<String, MethodId>,
    pub scope: ScopeId,
    pub span: Span,
}

/// A native operator living in a native type's type-scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeOperator {
    pub symbol: &'static str,
    /// The type the operator is defined on.
    pub operand: TypeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Declared with a body.
    User,
    /// Declared without a body; linked from elsewhere.
    External,
    Operator(NativeOperator),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub owner: Option<ClassId>,
    /// `Void` when the method returns nothing.
    pub return_type: TypeId,
    pub arguments: Vec<VariableId>,
    pub receiver: Option<VariableId>,
    /// The local scope holding the receiver and arguments. Operators have none.
    pub scope: Option<ScopeId>,
    pub body: Option<TypedBlock>,
    pub kind: MethodKind,
    pub span: Span,
}

impl Method {
    pub fn is_external(&self) -> bool {
        self.kind == MethodKind::External
    }

    pub fn is_operator(&self) -> bool {
        matches!(self.kind, MethodKind::Operator(_))
    }
}

/// The resolved program: arenas of classes, methods and variables, plus the
/// scope tree they were resolved against.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    classes: Vec<Class>,
    methods: Vec<Method>,
    variables: Vec<Variable>,
    pub scopes: ScopeTree,
    class_names: BTreeMap<String, ClassId>,
    functions: BTreeMap<String, MethodId>,
}

impl Program {
    pub fn new() -> Self {
        Program {
            classes: Vec::new(),
            methods: Vec::new(),
            variables: Vec::new(),
            scopes: ScopeTree::new(),
            class_names: BTreeMap::new(),
            functions: BTreeMap::new(),
        }
    }

    pub fn global(&self) -> ScopeId {
        self.scopes.global()
    }

    /// The id the next call to `add_class` will hand out.
    pub fn next_class_id(&self) -> ClassId {
        ClassId(self.classes.len() as u32)
    }

    pub fn add_class(&mut self, class: Class) -> ClassId {
        let id = self.next_class_id();
        self.class_names.insert(class.name.clone(), id);
        self.classes.push(class);
        id
    }

    pub fn add_method(&mut self, method: Method) -> MethodId {
        self.methods.push(method);
        MethodId((self.methods.len() - 1) as u32)
    }

    /// Adds a method and records it as a free function.
    pub fn add_function(&mut self, method: Method) -> MethodId {
        let name = method.name.clone();
        let id = self.add_method(method);
        self.functions.insert(name, id);
        id
    }

    pub fn add_variable(&mut self, variable: Variable) -> VariableId {
        self.variables.push(variable);
        VariableId((self.variables.len() - 1) as u32)
    }

    pub fn class(&self, id: ClassId) -> Result<&Class, Error> {
        self.classes
            .get(id.index())
            .ok_or_else(|| Error::internal(format!("class {} does not exist", id.index()), Span::null()))
    }

    pub fn class_mut(&mut self, id: ClassId) -> Result<&mut Class, Error> {
        self.classes
            .get_mut(id.index())
            .ok_or_else(|| Error::internal(format!("class {} does not exist", id.index()), Span::null()))
    }

    pub fn method(&self, id: MethodId) -> Result<&Method, Error> {
        self.methods
            .get(id.index())
            .ok_or_else(|| Error::internal(format!("method {} does not exist", id.index()), Span::null()))
    }

    pub fn method_mut(&mut self, id: MethodId) -> Result<&mut Method, Error> {
        self.methods
            .get_mut(id.index())
            .ok_or_else(|| Error::internal(format!("method {} does not exist", id.index()), Span::null()))
    }

    pub fn variable(&self, id: VariableId) -> Result<&Variable, Error> {
        self.variables
            .get(id.index())
            .ok_or_else(|| Error::internal(format!("variable {} does not exist", id.index()), Span::null()))
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes.iter().enumerate().map(|(index, class)| (ClassId(index as u32), class))
    }

    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &Method)> {
        self.methods.iter().enumerate().map(|(index, method)| (MethodId(index as u32), method))
    }

    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables.iter().enumerate().map(|(index, variable)| (VariableId(index as u32), variable))
    }

    /// Free functions in name order.
    pub fn functions(&self) -> impl Iterator<Item = (&str, MethodId)> {
        self.functions.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.class_names.get(name).copied()
    }

    pub fn function_by_name(&self, name: &str) -> Option<MethodId> {
        self.functions.get(name).copied()
    }

    /// Looks up `method` declared in class `class`.
    pub fn method_of(&self, class: &str, method: &str) -> Option<MethodId> {
        let class = self.class_by_name(class)?;
        self.classes.get(class.index())?.methods.get(method).copied()
    }

    pub fn parameter_types(&self, method: MethodId) -> Result<Vec<TypeId>, Error> {
        self.method(method)?
            .arguments
            .iter()
            .map(|argument| self.variable(*argument).map(|variable| variable.ty))
            .collect()
    }
}

impl Default for Program {
    fn default() -> Self {
        Program::new()
    }
}
