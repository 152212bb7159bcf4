//! Unit tests for the lowering pass.
//!
//! Each test drives source text through the lexer and parser, then checks
//! the resolved tree or the diagnostic the resolver raises.

use std::rc::Rc;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    semantic::{
        program::{MethodId, Program, VariableKind},
        typed_ast::{TypedBlock, TypedExpr, TypedExprKind, TypedStmt},
    },
    types::{
        context::TypeRegistry,
        conversions::ConversionTable,
        native::{NativeKind, NativeTypeCatalog},
    },
};

use super::lowering::{resolve, resolve_with};

fn syntax(source: &str) -> crate::ast::ast::Program {
    let tokens = tokenize(source.to_string(), Some("test.cls".to_string())).unwrap();
    parse(tokens, Rc::new("test.cls".to_string())).unwrap()
}

fn resolve_source(source: &str) -> Result<(TypeRegistry, Program), Error> {
    resolve(&syntax(source))
}

fn resolve_ok(source: &str) -> (TypeRegistry, Program) {
    match resolve_source(source) {
        Ok(resolved) => resolved,
        Err(error) => panic!("unexpected error: {} at line {}", error, error.get_span().first_line()),
    }
}

fn error_kind(source: &str) -> ErrorImpl {
    resolve_source(source).unwrap_err().get_kind().clone()
}

fn body(program: &Program, method: MethodId) -> &TypedBlock {
    program.method(method).unwrap().body.as_ref().unwrap()
}

fn function_body<'a>(program: &'a Program, name: &str) -> &'a TypedBlock {
    body(program, program.function_by_name(name).unwrap())
}

fn returned(block: &TypedBlock) -> &TypedExpr {
    match block.body.last() {
        Some(TypedStmt::Return { value: Some(value), .. }) => value,
        other => panic!("expected return with value, found {:?}", other),
    }
}

const COUNTER: &str = "
class Counter
  n: Integer;
  inc(amount: Integer) do
    n := n + amount;
  end
end

main() do
  var c: Counter;
  c.inc(5);
end
";

#[test]
fn test_counter_call_end_to_end() {
    let (_, program) = resolve_ok(COUNTER);
    let inc = program.method_of("Counter", "inc").unwrap();

    let main = function_body(&program, "main");
    assert_eq!(main.body.len(), 1);

    match &main.body[0] {
        TypedStmt::Call(TypedExpr { kind: TypedExprKind::MethodCall { receiver, method, arguments }, .. }) => {
            assert_eq!(*method, inc);
            assert_eq!(arguments.len(), 1);
            assert_eq!(arguments[0].kind, TypedExprKind::IntConst(5));

            match receiver.as_deref() {
                Some(TypedExpr { kind: TypedExprKind::Variable(c), .. }) => {
                    assert_eq!(program.variable(*c).unwrap().name, "c");
                },
                other => panic!("expected variable receiver, found {:?}", other),
            }
        },
        other => panic!("expected call, found {:?}", other),
    }
}

#[test]
fn test_counter_method_body() {
    let (registry, program) = resolve_ok(COUNTER);
    let inc = program.method_of("Counter", "inc").unwrap();

    match &body(&program, inc).body[0] {
        TypedStmt::Assignment { target, value, .. } => {
            match &target.kind {
                TypedExprKind::FieldAccess { target, field } => {
                    assert_eq!(target.kind, TypedExprKind::This);
                    assert_eq!(program.variable(*field).unwrap().name, "n");
                },
                other => panic!("expected field access, found {:?}", other),
            }

            match &value.kind {
                TypedExprKind::Binary { operator, .. } => {
                    assert_eq!(program.method(*operator).unwrap().name, "+");
                },
                other => panic!("expected binary, found {:?}", other),
            }
            assert_eq!(value.ty, registry.integer());
        },
        other => panic!("expected assignment, found {:?}", other),
    }
}

#[test]
fn test_method_signature_and_receiver() {
    let (registry, program) = resolve_ok(COUNTER);
    let inc = program.method(program.method_of("Counter", "inc").unwrap()).unwrap();
    let counter = program.class_by_name("Counter").unwrap();

    assert_eq!(inc.owner, Some(counter));
    assert_eq!(inc.return_type, registry.void());
    assert_eq!(program.variable(inc.receiver.unwrap()).unwrap().kind, VariableKind::Receiver);
    assert_eq!(program.variable(inc.arguments[0]).unwrap().kind, VariableKind::Argument(0));
}

#[test]
fn test_local_shadows_field_only_in_its_block() {
    let source = "
class A
  x: Integer;
  f() do
    do
      var x: Boolean;
      x := true;
    end
    do
      x := 1;
    end
  end
end
";
    let (registry, program) = resolve_ok(source);
    let f = body(&program, program.method_of("A", "f").unwrap());

    let assignment_target = |stmt: &TypedStmt| match stmt {
        TypedStmt::Block(block) => match &block.body[0] {
            TypedStmt::Assignment { target, .. } => target.clone(),
            other => panic!("expected assignment, found {:?}", other),
        },
        other => panic!("expected block, found {:?}", other),
    };

    let shadowed = assignment_target(&f.body[0]);
    assert!(matches!(shadowed.kind, TypedExprKind::Variable(_)));
    assert_eq!(shadowed.ty, registry.boolean());

    let field = assignment_target(&f.body[1]);
    assert!(matches!(field.kind, TypedExprKind::FieldAccess { .. }));
    assert_eq!(field.ty, registry.integer());
}

#[test]
fn test_forward_reference_between_classes() {
    let source = "
class A
  b: B;
end

class B
  a: A*;
  next: B*;
end
";
    let (mut registry, program) = resolve_ok(source);
    let a = program.class(program.class_by_name("A").unwrap()).unwrap();
    let b = program.class(program.class_by_name("B").unwrap()).unwrap();

    let field_b = program.variable(a.fields["b"]).unwrap();
    assert_eq!(field_b.ty, b.ty);
    assert!(matches!(field_b.kind, VariableKind::Field { index: 0, .. }));

    let pointer_to_a = registry.pointer_to(a.ty);
    assert_eq!(program.variable(b.fields["a"]).unwrap().ty, pointer_to_a);
    assert_eq!(b.field_order.len(), 2);
}

#[test]
fn test_duplicate_method_reports_second_declaration() {
    let source = "class A\n  foo() do end\n  foo() do end\nend";
    let error = resolve_source(source).unwrap_err();

    assert_eq!(
        error.get_kind(),
        &ErrorImpl::DuplicateMethodDeclaration { method: String::from("foo") }
    );
    assert_eq!(error.get_span().first_line(), 3);
}

#[test]
fn test_duplicate_class() {
    assert_eq!(
        error_kind("class A\nend\nclass A\nend"),
        ErrorImpl::DuplicateClassDeclaration { class: String::from("A") }
    );
}

#[test]
fn test_class_named_like_native_is_rejected() {
    assert_eq!(
        error_kind("class Integer\nend"),
        ErrorImpl::DuplicateClassDeclaration { class: String::from("Integer") }
    );
}

#[test]
fn test_duplicate_field() {
    assert_eq!(
        error_kind("class A\n  x: Integer;\n  x: Boolean;\nend"),
        ErrorImpl::DuplicateFieldDeclaration { class: String::from("A"), field: String::from("x") }
    );
}

#[test]
fn test_duplicate_function() {
    assert_eq!(
        error_kind("f() do end\nf(); "),
        ErrorImpl::DuplicateMethodDeclaration { method: String::from("f") }
    );
}

#[test]
fn test_unknown_type() {
    assert_eq!(
        error_kind("class A\n  x: Missing;\nend"),
        ErrorImpl::UnknownType { type_: String::from("Missing") }
    );
    assert_eq!(
        error_kind("f(): Missing[] do end"),
        ErrorImpl::UnknownType { type_: String::from("Missing") }
    );
}

#[test]
fn test_duplicate_local_in_same_block() {
    assert_eq!(
        error_kind("main() do var x: Integer; var x: Integer; end"),
        ErrorImpl::DuplicateVariableDeclaration { variable: String::from("x") }
    );
    assert_eq!(
        error_kind("f(x: Integer) do var x: Integer; end"),
        ErrorImpl::DuplicateVariableDeclaration { variable: String::from("x") }
    );
    assert!(resolve_source("f(x: Integer) do do var x: Boolean; end end").is_ok());
}

#[test]
fn test_operator_not_found() {
    let source = "
class Counter
  n: Integer;
end

f(c: Counter, b: Boolean): Integer do
  return c + b;
end
";
    assert_eq!(
        error_kind(source),
        ErrorImpl::OperatorNotFound {
            operator: String::from("+"),
            left: String::from("Counter"),
            right: Some(String::from("Boolean")),
        }
    );
}

#[test]
fn test_unary_operator_not_found() {
    assert_eq!(
        error_kind("f(x: Integer): Boolean do return not x; end"),
        ErrorImpl::OperatorNotFound {
            operator: String::from("not"),
            left: String::from("Integer"),
            right: None,
        }
    );
}

#[test]
fn test_return_value_from_void_method() {
    assert_eq!(
        error_kind("class A\n  f() do return 5; end\nend"),
        ErrorImpl::InvalidReturnType { expected: String::from("Void"), received: String::from("Integer") }
    );
}

#[test]
fn test_bare_return_from_integer_method() {
    assert_eq!(
        error_kind("g(): Integer do return; end"),
        ErrorImpl::InvalidReturnType { expected: String::from("Integer"), received: String::from("Void") }
    );
}

#[test]
fn test_return_requires_exact_type() {
    assert_eq!(
        error_kind("g(x: Int8): Integer do return x; end"),
        ErrorImpl::InvalidReturnType { expected: String::from("Integer"), received: String::from("Int8") }
    );
    assert!(resolve_source("g(x: Int8): Int8 do return x; end").is_ok());
}

#[test]
fn test_wrong_argument_count_is_checked_first() {
    let source = "
class Counter
  inc(amount: Integer) do end
end

main() do
  var c: Counter;
  c.inc(true, false);
end
";
    assert_eq!(
        error_kind(source),
        ErrorImpl::WrongArgumentCount { method: String::from("inc"), expected: 1, received: 2 }
    );
}

#[test]
fn test_widening_argument_gets_implicit_cast() {
    let (registry, program) = resolve_ok("g(x: Int64) do end\nmain() do var s: Int8; g(s); end");

    match &function_body(&program, "main").body[0] {
        TypedStmt::Call(TypedExpr { kind: TypedExprKind::MethodCall { arguments, .. }, .. }) => {
            assert_eq!(arguments[0].ty, registry.native(NativeKind::Int64));
            match &arguments[0].kind {
                TypedExprKind::Cast { value, implicit } => {
                    assert!(*implicit);
                    assert_eq!(value.ty, registry.native(NativeKind::Int8));
                },
                other => panic!("expected cast, found {:?}", other),
            }
        },
        other => panic!("expected call, found {:?}", other),
    }
}

#[test]
fn test_literal_argument_narrows_when_it_fits() {
    let (registry, program) = resolve_ok("h(x: Int8) do end\nmain() do h(5); h(-128); end");
    let main = function_body(&program, "main");

    for stmt in main.iter() {
        match stmt {
            TypedStmt::Call(TypedExpr { kind: TypedExprKind::MethodCall { arguments, .. }, .. }) => {
                assert_eq!(arguments[0].ty, registry.native(NativeKind::Int8));
                assert!(matches!(arguments[0].kind, TypedExprKind::Cast { implicit: true, .. }));
            },
            other => panic!("expected call, found {:?}", other),
        }
    }
}

#[test]
fn test_literal_argument_out_of_range() {
    assert_eq!(
        error_kind("h(x: Int8) do end\nmain() do h(300); end"),
        ErrorImpl::TypeMismatch { expected: String::from("Int8"), received: String::from("Integer") }
    );
}

#[test]
fn test_no_implicit_narrowing_or_bool_conversion() {
    assert_eq!(
        error_kind("h(x: Int8) do end\nmain() do var y: Int16; h(y); end"),
        ErrorImpl::TypeMismatch { expected: String::from("Int8"), received: String::from("Int16") }
    );
    assert_eq!(
        error_kind("h(x: Integer) do end\nmain() do h(true); end"),
        ErrorImpl::TypeMismatch { expected: String::from("Integer"), received: String::from("Boolean") }
    );
}

#[test]
fn test_exact_only_conversion_table() {
    let tree = syntax("h(x: Int8) do end\nmain() do h(5); end");
    let error = resolve_with(&tree, NativeTypeCatalog::default(), ConversionTable::exact_only()).unwrap_err();

    assert_eq!(
        error.get_kind(),
        &ErrorImpl::TypeMismatch { expected: String::from("Int8"), received: String::from("Integer") }
    );
}

#[test]
fn test_assignment_requires_identical_types() {
    assert_eq!(
        error_kind("main() do var x: Int8; var y: Int16; y := x; end"),
        ErrorImpl::TypeMismatch { expected: String::from("Int16"), received: String::from("Int8") }
    );
}

#[test]
fn test_assignment_target_must_be_lvalue() {
    assert_eq!(
        error_kind("main() do 1 := 2; end"),
        ErrorImpl::NotAnLvalue { type_: String::from("Integer") }
    );
}

#[test]
fn test_address_of_requires_lvalue() {
    assert_eq!(
        error_kind("main() do var p: Integer*; p := &5; end"),
        ErrorImpl::NotAnLvalue { type_: String::from("Integer") }
    );

    let (mut registry, program) = resolve_ok("main() do var x: Integer; var p: Integer*; p := &x; end");
    let pointer = registry.pointer_to(registry.integer());
    match &function_body(&program, "main").body[0] {
        TypedStmt::Assignment { value, .. } => {
            assert_eq!(value.ty, pointer);
            assert!(matches!(value.kind, TypedExprKind::AddressOf(_)));
        },
        other => panic!("expected assignment, found {:?}", other),
    }
}

#[test]
fn test_unknown_name() {
    assert_eq!(
        error_kind("main() do missing(); end"),
        ErrorImpl::FeatureNotFound { feature: String::from("missing") }
    );
    assert_eq!(
        error_kind("main() do var x: Integer; x := y; end"),
        ErrorImpl::FeatureNotFound { feature: String::from("y") }
    );
}

#[test]
fn test_qualified_call_ignores_ambient_scope() {
    let source = "
helper() do end

class A
  f() do end
end

main() do
  var a: A;
  a.helper();
end
";
    assert_eq!(
        error_kind(source),
        ErrorImpl::FeatureNotFound { feature: String::from("helper") }
    );
}

#[test]
fn test_this_outside_class() {
    assert_eq!(
        error_kind("main() do this; end"),
        ErrorImpl::FeatureNotFound { feature: String::from("this") }
    );
}

#[test]
fn test_bare_method_name_is_implicit_call() {
    let source = "
class A
  n: Integer;
  value(): Integer do return n; end
  twice(): Integer do return value + value(); end
end
";
    let (_, program) = resolve_ok(source);
    let value = program.method_of("A", "value").unwrap();
    let twice = body(&program, program.method_of("A", "twice").unwrap());

    match &returned(twice).kind {
        TypedExprKind::Binary { left, right, .. } => {
            for operand in [left, right] {
                match &operand.kind {
                    TypedExprKind::MethodCall { receiver, method, arguments } => {
                        assert_eq!(*method, value);
                        assert!(arguments.is_empty());
                        assert_eq!(receiver.as_ref().unwrap().kind, TypedExprKind::This);
                    },
                    other => panic!("expected call, found {:?}", other),
                }
            }
        },
        other => panic!("expected binary, found {:?}", other),
    }
}

#[test]
fn test_member_without_call_reads_field_or_calls() {
    let source = "
class Point
  x: Integer;
  norm(): Integer do return x; end
end

f(p: Point): Integer do return p.x + p.norm; end
";
    let (_, program) = resolve_ok(source);

    match &returned(function_body(&program, "f")).kind {
        TypedExprKind::Binary { left, right, .. } => {
            assert!(matches!(left.kind, TypedExprKind::FieldAccess { .. }));
            assert!(matches!(right.kind, TypedExprKind::MethodCall { receiver: Some(_), .. }));
        },
        other => panic!("expected binary, found {:?}", other),
    }
}

#[test]
fn test_free_function_visible_from_method() {
    let source = "
log(x: Integer);

class A
  f() do log(1); end
end
";
    let (_, program) = resolve_ok(source);
    let log = program.function_by_name("log").unwrap();

    assert!(program.method(log).unwrap().is_external());
    assert!(program.method(log).unwrap().body.is_none());

    match &body(&program, program.method_of("A", "f").unwrap()).body[0] {
        TypedStmt::Call(TypedExpr { kind: TypedExprKind::MethodCall { receiver, method, .. }, .. }) => {
            assert!(receiver.is_none());
            assert_eq!(*method, log);
        },
        other => panic!("expected call, found {:?}", other),
    }
}

#[test]
fn test_binary_operand_widening() {
    let (registry, program) = resolve_ok("f(a: Int64, b: Int8): Int64 do return a + b; end");

    match &returned(function_body(&program, "f")).kind {
        TypedExprKind::Binary { right, .. } => {
            assert_eq!(right.ty, registry.native(NativeKind::Int64));
            assert!(matches!(right.kind, TypedExprKind::Cast { implicit: true, .. }));
        },
        other => panic!("expected binary, found {:?}", other),
    }

    assert!(resolve_source("g(a: Int8): Int8 do return a + 1; end").is_ok());
}

#[test]
fn test_comparison_and_logic_produce_boolean() {
    let (registry, program) = resolve_ok("f(a: Integer, b: Boolean): Boolean do return a < 3 and not b; end");

    assert_eq!(returned(function_body(&program, "f")).ty, registry.boolean());
}

#[test]
fn test_condition_must_be_boolean() {
    assert_eq!(
        error_kind("main() do if 1 then end end"),
        ErrorImpl::TypeMismatch { expected: String::from("Boolean"), received: String::from("Integer") }
    );
    assert_eq!(
        error_kind("main() do while 0 do end end"),
        ErrorImpl::TypeMismatch { expected: String::from("Boolean"), received: String::from("Integer") }
    );
}

#[test]
fn test_if_without_else_has_empty_else_block() {
    let (_, program) = resolve_ok("main(b: Boolean) do var x: Integer; if b then var y: Integer; main(b); end end");
    let main = function_body(&program, "main");

    match &main.body[0] {
        TypedStmt::If { then_body, else_body, .. } => {
            assert_eq!(then_body.body.len(), 1);
            assert!(else_body.body.is_empty());

            // The empty else block still owns a fresh, empty scope.
            assert_ne!(else_body.scope, main.scope);
            assert_ne!(else_body.scope, then_body.scope);
            let scope = program.scopes.get(else_body.scope).unwrap();
            assert_eq!(scope.parent, Some(main.scope));
            assert_eq!(scope.variables().count(), 0);
        },
        other => panic!("expected if, found {:?}", other),
    }
}

#[test]
fn test_class_method_shadows_free_function() {
    let source = "
f() do end

class A
  f() do end
  g() do f(); end
end
";
    let (_, program) = resolve_ok(source);
    let member = program.method_of("A", "f").unwrap();

    match &body(&program, program.method_of("A", "g").unwrap()).body[0] {
        TypedStmt::Call(TypedExpr { kind: TypedExprKind::MethodCall { receiver, method, .. }, .. }) => {
            assert_eq!(*method, member);
            assert_ne!(Some(*method), program.function_by_name("f"));
            assert_eq!(receiver.as_ref().unwrap().kind, TypedExprKind::This);
        },
        other => panic!("expected call, found {:?}", other),
    }
}

#[test]
fn test_most_negative_literal() {
    let (registry, program) = resolve_ok("f(): Integer do return -9223372036854775808; end");
    let value = returned(function_body(&program, "f"));

    assert_eq!(value.kind, TypedExprKind::IntConst(i64::MIN));
    assert_eq!(value.ty, registry.integer());
    assert_eq!(
        error_kind("f(): Integer do return 9223372036854775808; end"),
        ErrorImpl::NumberParseError { token: String::from("9223372036854775808") }
    );
}

#[test]
fn test_expression_statement_must_be_call() {
    assert_eq!(
        error_kind("main() do 1 + 2; end"),
        ErrorImpl::NotACall { type_: String::from("Integer") }
    );
}

#[test]
fn test_var_initializer_becomes_assignment() {
    let (_, program) = resolve_ok("main() do var x: Integer := 4; var y: Integer; end");
    let main = function_body(&program, "main");

    assert_eq!(main.body.len(), 1);
    match &main.body[0] {
        TypedStmt::Assignment { target, value, .. } => {
            assert!(matches!(target.kind, TypedExprKind::Variable(_)));
            assert_eq!(value.kind, TypedExprKind::IntConst(4));
        },
        other => panic!("expected assignment, found {:?}", other),
    }
}

#[test]
fn test_arrays() {
    let source = "
main(): Integer do
  var xs: Integer[];
  var i: Int8;
  xs := new Integer[10];
  xs[i] := 5;
  return xs[0];
end
";
    let (mut registry, program) = resolve_ok(source);
    let integers = registry.array_of(registry.integer());
    let main = function_body(&program, "main");

    match &main.body[0] {
        TypedStmt::Assignment { value, .. } => {
            assert_eq!(value.ty, integers);
            assert!(matches!(value.kind, TypedExprKind::ArrayNew { .. }));
        },
        other => panic!("expected assignment, found {:?}", other),
    }

    match &main.body[1] {
        TypedStmt::Assignment { target, .. } => match &target.kind {
            TypedExprKind::Index { index, .. } => {
                assert_eq!(index.ty, registry.integer());
                assert!(matches!(index.kind, TypedExprKind::Cast { implicit: true, .. }));
            },
            other => panic!("expected index, found {:?}", other),
        },
        other => panic!("expected assignment, found {:?}", other),
    }
}

#[test]
fn test_index_requires_array() {
    assert_eq!(
        error_kind("main() do var x: Integer; x[0] := 1; end"),
        ErrorImpl::TypeMismatch { expected: String::from("array"), received: String::from("Integer") }
    );
}

#[test]
fn test_explicit_cast_always_succeeds() {
    let (registry, program) = resolve_ok("main() do var b: Boolean; b := 5 as Boolean; end");

    match &function_body(&program, "main").body[0] {
        TypedStmt::Assignment { value, .. } => {
            assert_eq!(value.ty, registry.boolean());
            assert!(matches!(value.kind, TypedExprKind::Cast { implicit: false, .. }));
        },
        other => panic!("expected assignment, found {:?}", other),
    }
}

#[test]
fn test_native_operators_are_installed() {
    let (registry, _) = resolve_ok("");
    let integer = registry.type_scope(registry.integer()).unwrap();
    let boolean = registry.type_scope(registry.boolean()).unwrap();

    assert_eq!(integer.candidates("+").len(), 1);
    // Binary and unary minus.
    assert_eq!(integer.candidates("-").len(), 2);
    assert!(integer.candidates("and").is_empty());
    assert_eq!(boolean.candidates("not").len(), 1);
    assert!(registry.type_scope(registry.void()).unwrap().is_empty());
}

#[test]
fn test_two_runs_produce_equal_trees() {
    let tree = syntax(COUNTER);

    let first = resolve(&tree).unwrap();
    let second = resolve(&tree).unwrap();

    assert_eq!(first.0, second.0);
    assert_eq!(first.1, second.1);
}

#[test]
fn test_two_runs_produce_equal_diagnostics() {
    let tree = syntax("class A\n  foo() do end\n  foo() do end\nend");

    assert_eq!(resolve(&tree).unwrap_err(), resolve(&tree).unwrap_err());
}
