//! Static (resolver/parser) and runtime error reporting, observed through
//! the diagnostics a `Session` hands back.

use wrench::diagnostics::Diagnostics;
use wrench::session::Session;

fn run_err(source: &str) -> Diagnostics {
    let mut session = Session::new();

    match session.run(source) {
        Ok(()) => panic!("expected an error for: {}", source),
        Err(diagnostics) => diagnostics,
    }
}

fn assert_static_error(source: &str, expected_fragment: &str) {
    let diagnostics = run_err(source);

    assert!(
        !diagnostics.had_runtime_error(),
        "expected a static error, got: {}",
        diagnostics
    );
    assert!(
        diagnostics.to_string().contains(expected_fragment),
        "expected '{}' in: {}",
        expected_fragment,
        diagnostics
    );
}

fn assert_runtime_error(source: &str, expected_fragment: &str) {
    let diagnostics = run_err(source);

    assert!(
        diagnostics.had_runtime_error(),
        "expected a runtime error, got: {}",
        diagnostics
    );
    assert!(
        diagnostics.to_string().contains(expected_fragment),
        "expected '{}' in: {}",
        expected_fragment,
        diagnostics
    );
}

// ───────────────────────── parse errors ─────────────────────────

#[test]
fn missing_semicolon_is_a_parse_error() {
    assert_static_error("let a = 1", "Expected ';'");
}

#[test]
fn invalid_assignment_target() {
    assert_static_error("1 + 2 = 3;", "Invalid assignment target");
}

#[test]
fn parser_recovers_and_reports_multiple_errors() {
    let diagnostics = run_err("let = 1;\nlet b = ;\n");

    assert!(diagnostics.len() >= 2, "got: {}", diagnostics);
}

#[test]
fn lex_errors_stop_the_pipeline_before_parsing() {
    // The `$` is a lex error and leaves `let a = ;` behind in the token
    // stream; reporting must stop there rather than pile a cascading
    // parse error on top.
    let diagnostics = run_err("let a = $;");

    assert_eq!(diagnostics.len(), 1, "got: {}", diagnostics);
    assert!(
        diagnostics.to_string().contains("Unexpected character"),
        "got: {}",
        diagnostics
    );
}

// ───────────────────────── resolve errors ─────────────────────────

#[test]
fn reading_a_local_in_its_own_initializer() {
    assert_static_error(
        "{ let a = a; }",
        "Cannot read local variable in its own initializer",
    );
}

#[test]
fn duplicate_declaration_in_the_same_scope() {
    assert_static_error(
        "{ let a = 1; let a = 2; }",
        "Variable already declared in this scope",
    );
}

#[test]
fn top_level_return() {
    assert_static_error("return 1;", "Cannot return from top-level code");
}

#[test]
fn this_outside_a_class() {
    assert_static_error("print this;", "Cannot use 'this' outside of a class");
    assert_static_error(
        "fun f() { return this; }",
        "Cannot use 'this' outside of a class",
    );
}

#[test]
fn super_outside_a_class() {
    assert_static_error(
        "print super.x;",
        "Cannot use 'super' outside of a class",
    );
}

#[test]
fn super_in_a_class_without_a_superclass() {
    assert_static_error(
        "class A { f() { return super.f(); } }",
        "Cannot use 'super' in a class with no superclass",
    );
}

#[test]
fn class_inheriting_from_itself() {
    assert_static_error("class A < A {}", "A class cannot inherit from itself");
}

#[test]
fn returning_a_value_from_an_initializer() {
    assert_static_error(
        "class A { init() { return 1; } }",
        "Cannot return a value from an initializer",
    );
}

#[test]
fn bare_return_in_an_initializer_is_allowed() {
    let mut session = Session::new();

    session
        .run("class A { init() { return; } } A();")
        .expect("bare return in init should be legal");
}

// ───────────────────────── runtime errors ─────────────────────────

#[test]
fn undefined_variable() {
    assert_runtime_error("print missing;", "Undefined variable 'missing'");
}

#[test]
fn operand_type_errors() {
    assert_runtime_error("print -\"x\";", "Operand must be a number");
    assert_runtime_error("print 1 < \"x\";", "Operands must be numbers");
    assert_runtime_error(
        "print 1 + \"x\";",
        "Operands must be two numbers or two strings",
    );
}

#[test]
fn calling_a_non_callable() {
    assert_runtime_error("\"not a function\"();", "Can only call functions and classes");
}

#[test]
fn wrong_arity() {
    assert_runtime_error(
        "fun f(a, b) {} f(1);",
        "Expected 2 arguments but got 1",
    );
    assert_runtime_error(
        "class A { init(a) {} } A(1, 2);",
        "Expected 1 arguments but got 2",
    );
}

#[test]
fn property_access_on_non_instances() {
    assert_runtime_error("print (1).x;", "Only instances have properties");
    assert_runtime_error("1.x = 2;", "Only instances have fields");
}

#[test]
fn undefined_property() {
    assert_runtime_error(
        "class A {} print A().missing;",
        "Undefined property 'missing'",
    );
}

#[test]
fn superclass_must_be_a_class() {
    assert_runtime_error(
        "let NotAClass = 1; class A < NotAClass {}",
        "Superclass must be a class",
    );
}

#[test]
fn static_errors_prevent_execution() {
    let mut session = Session::new();

    // The print would run before the resolve error is reached in source
    // order, but nothing may execute when resolution fails.
    assert!(session.run("let x = 1; return 2;").is_err());

    // `x` must not have been defined.
    assert!(session.run("print x;").is_err());
}
