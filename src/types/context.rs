use std::{collections::BTreeMap, fmt::Display};

use hashbrown::HashMap;

use crate::{
    errors::errors::Error,
    semantic::program::{ClassId, MethodId},
    Span,
};

use super::{conversions::ConversionTable, native::{NativeKind, NativeTypeCatalog}};

/// Stable handle to a type owned by a `TypeRegistry`.
///
/// Two ids are equal exactly when the types they name are structurally equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural description of a type, the key types are interned under.
///
/// Classes compare by their handle, so two classes with identical members
/// remain distinct types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Native(NativeKind),
    Class(ClassId),
    Pointer(TypeId),
    Array(TypeId),
}

/// The methods and operators callable on values of one type, keyed by name.
///
/// A name may carry several candidates: native operators are overloaded on
/// their right operand, and unary and binary `-` share a symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeScope {
    methods: BTreeMap<String, Vec<MethodId>>,
}

impl TypeScope {
    pub fn add(&mut self, name: impl Into<String>, method: MethodId) {
        self.methods.entry(name.into()).or_default().push(method);
    }

    pub fn candidates(&self, name: &str) -> &[MethodId] {
        self.methods.get(name).map(|methods| methods.as_slice()).unwrap_or(&[])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(|name| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TypeEntry {
    kind: TypeKind,
    scope: TypeScope,
}

/// Owns every type of one compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRegistry {
    types: Vec<TypeEntry>,
    intern_map: HashMap<TypeKind, TypeId>,
    class_names: BTreeMap<ClassId, String>,
    catalog: NativeTypeCatalog,
    conversions: ConversionTable,
}

impl TypeRegistry {
    /// Creates a registry with every native kind already interned, in
    /// declaration order, so native ids are the same for every unit.
    pub fn new(catalog: NativeTypeCatalog, conversions: ConversionTable) -> Self {
        let mut registry = TypeRegistry {
            types: Vec::new(),
            intern_map: HashMap::new(),
            class_names: BTreeMap::new(),
            catalog,
            conversions,
        };

        for kind in NativeKind::ALL {
            registry.add_type(TypeKind::Native(kind));
        }

        registry
    }

    /// Interns `kind`, returning the id already assigned to an equal structure if any.
    pub fn add_type(&mut self, kind: TypeKind) -> TypeId {
        let next_id = TypeId(self.types.len() as u32);
        *self.intern_map.entry(kind).or_insert_with(|| {
            tracing::trace!(?kind, id = %next_id, "interned type");
            self.types.push(TypeEntry { kind, scope: TypeScope::default() });
            next_id
        })
    }

    pub fn get_type(&self, id: TypeId) -> Result<&TypeKind, Error> {
        self.entry(id).map(|entry| &entry.kind)
    }

    pub fn pointer_to(&mut self, pointee: TypeId) -> TypeId {
        self.add_type(TypeKind::Pointer(pointee))
    }

    pub fn array_of(&mut self, element: TypeId) -> TypeId {
        self.add_type(TypeKind::Array(element))
    }

    /// Registers the type of a freshly declared class.
    pub fn register_class(&mut self, class: ClassId, name: impl Into<String>) -> TypeId {
        self.class_names.insert(class, name.into());
        self.add_type(TypeKind::Class(class))
    }

    pub fn native(&self, kind: NativeKind) -> TypeId {
        // `new` interns every kind first, in `ALL` order.
        TypeId(kind as u32)
    }

    pub fn void(&self) -> TypeId {
        self.native(NativeKind::Void)
    }

    pub fn boolean(&self) -> TypeId {
        self.native(NativeKind::Boolean)
    }

    pub fn integer(&self) -> TypeId {
        self.native(NativeKind::Integer)
    }

    /// Looks a source name up in the native catalog.
    pub fn native_by_name(&self, name: &str) -> Option<TypeId> {
        self.catalog.lookup(name).map(|kind| self.native(kind))
    }

    pub fn catalog(&self) -> &NativeTypeCatalog {
        &self.catalog
    }

    pub fn conversions(&self) -> &ConversionTable {
        &self.conversions
    }

    pub fn native_kind(&self, id: TypeId) -> Option<NativeKind> {
        match self.get_type(id) {
            Ok(TypeKind::Native(kind)) => Some(*kind),
            _ => None,
        }
    }

    pub fn class_of(&self, id: TypeId) -> Option<ClassId> {
        match self.get_type(id) {
            Ok(TypeKind::Class(class)) => Some(*class),
            _ => None,
        }
    }

    pub fn element_of(&self, id: TypeId) -> Option<TypeId> {
        match self.get_type(id) {
            Ok(TypeKind::Array(element)) => Some(*element),
            _ => None,
        }
    }

    pub fn class_name(&self, class: ClassId) -> Option<&str> {
        self.class_names.get(&class).map(|name| name.as_str())
    }

    pub fn type_scope(&self, id: TypeId) -> Result<&TypeScope, Error> {
        self.entry(id).map(|entry| &entry.scope)
    }

    pub fn type_scope_mut(&mut self, id: TypeId) -> Result<&mut TypeScope, Error> {
        match self.types.get_mut(id.index()) {
            Some(entry) => Ok(&mut entry.scope),
            None => Err(unknown_type_id(id)),
        }
    }

    /// Whether a value of type `from` may be passed where `to` is expected
    /// by inserting an implicit cast.
    pub fn is_widening(&self, from: TypeId, to: TypeId) -> bool {
        match (self.native_kind(from), self.native_kind(to)) {
            (Some(from), Some(to)) => self.conversions.permits(from, to),
            _ => false,
        }
    }

    /// Whether the integer literal `value` may be implicitly cast to `to`.
    pub fn literal_converts(&self, value: i64, to: TypeId) -> bool {
        match self.native_kind(to) {
            Some(kind) => self.conversions.permits_literal(value, kind),
            None => false,
        }
    }

    /// Human-readable name of a type, as used in diagnostics.
    pub fn type_name(&self, id: TypeId) -> String {
        match self.get_type(id) {
            Ok(TypeKind::Native(kind)) => kind.name().to_string(),
            Ok(TypeKind::Class(class)) => match self.class_name(*class) {
                Some(name) => name.to_string(),
                None => format!("<class {}>", class.index()),
            },
            Ok(TypeKind::Pointer(pointee)) => format!("{}*", self.type_name(*pointee)),
            Ok(TypeKind::Array(element)) => format!("{}[]", self.type_name(*element)),
            Err(_) => format!("<unknown {}>", id),
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeKind)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, entry)| (TypeId(index as u32), &entry.kind))
    }

    fn entry(&self, id: TypeId) -> Result<&TypeEntry, Error> {
        self.types.get(id.index()).ok_or_else(|| unknown_type_id(id))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::new(NativeTypeCatalog::default(), ConversionTable::default())
    }
}

fn unknown_type_id(id: TypeId) -> Error {
    Error::internal(format!("type id {} is not registered", id), Span::null())
}
