//! Unit tests for the scope tree and the program arenas.

use std::collections::BTreeMap;

use crate::{
    errors::errors::ErrorImpl,
    types::context::TypeRegistry,
    Span,
};

use super::{
    program::{Class, Method, MethodId, MethodKind, Program, StorageSlot, Variable, VariableId, VariableKind},
    scope::{ScopeKind, ScopeTree},
    typed_ast::{TypedExpr, TypedExprKind},
};

fn local(program: &mut Program, registry: &TypeRegistry, name: &str) -> VariableId {
    program.add_variable(Variable::new(name, registry.integer(), VariableKind::Local, Span::null()))
}

fn function(program: &mut Program, registry: &TypeRegistry, name: &str) -> MethodId {
    program.add_function(Method {
        name: name.to_string(),
        owner: None,
        return_type: registry.void(),
        arguments: Vec::new(),
        receiver: None,
        scope: None,
        body: None,
        kind: MethodKind::External,
        span: Span::null(),
    })
}

#[test]
fn test_global_scope_is_root() {
    let tree = ScopeTree::new();
    let global = tree.get(tree.global()).unwrap();

    assert_eq!(global.kind, ScopeKind::Global);
    assert!(global.parent.is_none());
}

#[test]
fn test_lookup_walks_to_parent() {
    let registry = TypeRegistry::default();
    let mut program = Program::new();
    let x = local(&mut program, &registry, "x");

    let mut tree = ScopeTree::new();
    let outer = tree.push(ScopeKind::Local, tree.global());
    let inner = tree.push(ScopeKind::Local, outer);
    tree.declare_variable(outer, "x", x, &Span::null()).unwrap();

    assert_eq!(tree.resolve_variable(inner, "x"), Some(x));
    assert_eq!(tree.resolve_variable(inner, "y"), None);
    assert_eq!(tree.resolve_variable(tree.global(), "x"), None);
}

#[test]
fn test_inner_scope_shadows_outer() {
    let registry = TypeRegistry::default();
    let mut program = Program::new();
    let outer_x = local(&mut program, &registry, "x");
    let inner_x = local(&mut program, &registry, "x");

    let mut tree = ScopeTree::new();
    let outer = tree.push(ScopeKind::Local, tree.global());
    let inner = tree.push(ScopeKind::Local, outer);
    let sibling = tree.push(ScopeKind::Local, outer);
    tree.declare_variable(outer, "x", outer_x, &Span::null()).unwrap();
    tree.declare_variable(inner, "x", inner_x, &Span::null()).unwrap();

    assert_eq!(tree.resolve_variable(inner, "x"), Some(inner_x));
    assert_eq!(tree.resolve_variable(sibling, "x"), Some(outer_x));
}

#[test]
fn test_duplicate_in_same_scope_fails() {
    let registry = TypeRegistry::default();
    let mut program = Program::new();
    let first = local(&mut program, &registry, "x");
    let second = local(&mut program, &registry, "x");

    let mut tree = ScopeTree::new();
    let scope = tree.push(ScopeKind::Local, tree.global());
    tree.declare_variable(scope, "x", first, &Span::null()).unwrap();
    let error = tree.declare_variable(scope, "x", second, &Span::null()).unwrap_err();

    assert_eq!(
        error.get_kind(),
        &ErrorImpl::DuplicateVariableDeclaration { variable: String::from("x") }
    );
    assert_eq!(tree.resolve_variable(scope, "x"), Some(first));
}

#[test]
fn test_names_are_disjoint_per_kind() {
    let registry = TypeRegistry::default();
    let mut program = Program::new();
    let variable = local(&mut program, &registry, "size");
    let method = function(&mut program, &registry, "size");

    let mut tree = ScopeTree::new();
    let global = tree.global();
    let scope = tree.push(ScopeKind::Local, global);
    tree.declare_method(global, "size", method, &Span::null()).unwrap();
    tree.declare_variable(scope, "size", variable, &Span::null()).unwrap();

    assert_eq!(tree.resolve_variable(scope, "size"), Some(variable));
    assert_eq!(tree.resolve_method(scope, "size"), Some(method));
    assert_eq!(tree.resolve_type(scope, "size", &registry), None);
}

#[test]
fn test_duplicate_method_in_same_scope_fails() {
    let registry = TypeRegistry::default();
    let mut program = Program::new();
    let first = function(&mut program, &registry, "foo");
    let second = function(&mut program, &registry, "foo");

    let mut tree = ScopeTree::new();
    let global = tree.global();
    tree.declare_method(global, "foo", first, &Span::null()).unwrap();
    let error = tree.declare_method(global, "foo", second, &Span::null()).unwrap_err();

    assert_eq!(error.get_error_name(), "DuplicateMethodDeclaration");
}

#[test]
fn test_global_type_lookup_prefers_natives() {
    let mut registry = TypeRegistry::default();
    let mut program = Program::new();
    let class = program.next_class_id();
    let user_integer = registry.register_class(class, "Integer");

    let mut tree = ScopeTree::new();
    let global = tree.global();
    let scope = tree.push(ScopeKind::Local, global);
    tree.declare_type(global, "Integer", user_integer, &Span::null()).unwrap();

    assert_eq!(tree.resolve_type(scope, "Integer", &registry), Some(registry.integer()));
    assert_eq!(tree.resolve_type(scope, "Missing", &registry), None);
}

#[test]
fn test_program_lookup_helpers() {
    let mut registry = TypeRegistry::default();
    let mut program = Program::new();
    let global = program.global();

    let class_id = program.next_class_id();
    let ty = registry.register_class(class_id, "Counter");
    let class_scope = program.scopes.push(ScopeKind::Class(class_id), global);
    program.add_class(Class {
        name: String::from("Counter"),
        ty,
        fields: BTreeMap::new(),
        field_order: Vec::new(),
        methods: BTreeMap::new(),
        scope: class_scope,
        span: Span::null(),
    });

    let amount = program.add_variable(Variable::new(
        "amount",
        registry.integer(),
        VariableKind::Argument(0),
        Span::null(),
    ));
    let inc = program.add_method(Method {
        name: String::from("inc"),
        owner: Some(class_id),
        return_type: registry.void(),
        arguments: vec![amount],
        receiver: None,
        scope: None,
        body: None,
        kind: MethodKind::User,
        span: Span::null(),
    });
    program.class_mut(class_id).unwrap().methods.insert(String::from("inc"), inc);
    let main = function(&mut program, &registry, "main");

    assert_eq!(program.class_by_name("Counter"), Some(class_id));
    assert_eq!(program.method_of("Counter", "inc"), Some(inc));
    assert_eq!(program.method_of("Counter", "dec"), None);
    assert_eq!(program.function_by_name("main"), Some(main));
    assert_eq!(program.function_by_name("inc"), None);
    assert_eq!(program.parameter_types(inc).unwrap(), vec![registry.integer()]);
}

#[test]
fn test_storage_slot_starts_empty() {
    let registry = TypeRegistry::default();
    let mut program = Program::new();
    let x = local(&mut program, &registry, "x");

    let variable = program.variable(x).unwrap();
    assert_eq!(variable.storage.get(), None);

    variable.storage.set(Some(StorageSlot(3)));
    assert_eq!(program.variable(x).unwrap().storage.get(), Some(StorageSlot(3)));
}

#[test]
fn test_lvalues() {
    let registry = TypeRegistry::default();
    let mut program = Program::new();
    let x = local(&mut program, &registry, "x");

    let variable = TypedExpr::new(TypedExprKind::Variable(x), registry.integer(), Span::null());
    let constant = TypedExpr::new(TypedExprKind::IntConst(1), registry.integer(), Span::null());

    assert!(variable.is_lvalue());
    assert!(!constant.is_lvalue());
    assert!(!constant.is_call());
}
