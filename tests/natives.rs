//! Native library functions, called through the full pipeline.

use wrench::session::Session;
use wrench::value::Value;

fn eval(source: &str) -> Value {
    let mut session = Session::new();

    session
        .evaluate(source)
        .unwrap_or_else(|d| panic!("evaluation failed: {}", d))
        .expect("input should end in a trailing expression")
}

#[test]
fn abs_of_numbers() {
    assert_eq!(eval("abs(-3)"), Value::Number(3.0));
    assert_eq!(eval("abs(2.5)"), Value::Number(2.5));
}

#[test]
fn power_of_numbers() {
    assert_eq!(eval("power(2, 10)"), Value::Number(1024.0));
    assert_eq!(eval("power(9, 0.5)"), Value::Number(3.0));
}

#[test]
fn str_replace_all_replaces_every_occurrence() {
    assert_eq!(
        eval(r#"str_replace_all("a-b-c", "-", "+")"#),
        Value::Str("a+b+c".into())
    );
    assert_eq!(
        eval(r#"str_replace_all("unchanged", "xyz", "!")"#),
        Value::Str("unchanged".into())
    );
}

#[test]
fn unidecode_transliterates_to_ascii() {
    assert_eq!(eval(r#"unidecode("Æneid")"#), Value::Str("AEneid".into()));
    assert_eq!(eval(r#"unidecode("北京")"#), Value::Str("Bei Jing".into()));
}

#[test]
fn clock_returns_a_positive_number() {
    match eval("clock()") {
        Value::Number(n) => assert!(n > 0.0),
        other => panic!("expected a number, got {}", other),
    }
}

#[test]
fn type_domain_errors_yield_null() {
    assert_eq!(eval(r#"abs("nope")"#), Value::Null);
    assert_eq!(eval(r#"power("2", 3)"#), Value::Null);
    assert_eq!(eval(r#"str_replace_all("a", 1, "b")"#), Value::Null);
    assert_eq!(eval("unidecode(42)"), Value::Null);
}

#[test]
fn wrong_argument_count_is_a_runtime_error() {
    let mut session = Session::new();

    let diagnostics = session
        .run("abs(1, 2);")
        .expect_err("arity mismatch should be rejected");

    assert!(diagnostics.had_runtime_error());
    assert!(
        diagnostics.to_string().contains("'abs' does not accept 2"),
        "got: {}",
        diagnostics
    );
}

#[test]
fn natives_are_values() {
    assert_eq!(eval("abs").to_string(), "<native fn 'abs'>");

    let indirect = r#"
        let f = power;
        f(3, 3)
    "#;

    assert_eq!(eval(indirect), Value::Number(27.0));
}
