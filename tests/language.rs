//! End-to-end language tests driven through a `Session`, asserting on the
//! value of a trailing REPL expression rather than captured stdout.

use wrench::session::Session;
use wrench::value::Value;

fn eval(source: &str) -> Value {
    let mut session = Session::new();

    session
        .evaluate(source)
        .unwrap_or_else(|d| panic!("evaluation failed: {}", d))
        .expect("input should end in a trailing expression")
}

fn eval_number(source: &str) -> f64 {
    match eval(source) {
        Value::Number(n) => n,
        other => panic!("expected a number, got {}", other),
    }
}

fn eval_string(source: &str) -> String {
    match eval(source) {
        Value::Str(s) => s,
        other => panic!("expected a string, got {}", other),
    }
}

fn eval_bool(source: &str) -> bool {
    match eval(source) {
        Value::Bool(b) => b,
        other => panic!("expected a bool, got {}", other),
    }
}

// ───────────────────────── expressions ─────────────────────────

#[test]
fn arithmetic_precedence() {
    assert_eq!(eval_number("1 + 2 * 3"), 7.0);
    assert_eq!(eval_number("(1 + 2) * 3"), 9.0);
    assert_eq!(eval_number("10 - 4 - 3"), 3.0);
    assert_eq!(eval_number("-3 * -2"), 6.0);
}

#[test]
fn division_by_zero_follows_ieee754() {
    assert_eq!(eval_number("1 / 0"), f64::INFINITY);
    assert_eq!(eval_number("-1 / 0"), f64::NEG_INFINITY);
    assert!(eval_number("0 / 0").is_nan());
}

#[test]
fn string_concatenation() {
    assert_eq!(eval_string("\"foo\" + \"bar\""), "foobar");
}

#[test]
fn comparison_and_equality() {
    assert!(eval_bool("2 > 1"));
    assert!(eval_bool("2 >= 2"));
    assert!(!eval_bool("2 < 1"));
    assert!(eval_bool("1 == 1"));
    assert!(eval_bool("\"a\" == \"a\""));
    assert!(eval_bool("1 != \"1\""));
    assert!(eval_bool("null == null"));
}

#[test]
fn truthiness() {
    // Only null and false are falsy.
    assert!(eval_bool("!null"));
    assert!(eval_bool("!false"));
    assert!(!eval_bool("!0"));
    assert!(!eval_bool("!\"\""));
}

#[test]
fn logical_operators_return_operands() {
    assert_eq!(eval_number("null or 3"), 3.0);
    assert_eq!(eval_number("1 and 2"), 2.0);
    assert_eq!(eval(r#"false and "never""#), Value::Bool(false));
    assert_eq!(eval_string(r#""first" or "second""#), "first");
}

#[test]
fn logical_short_circuit_skips_right_operand() {
    // `boom` is never defined; short-circuiting must avoid evaluating it.
    assert_eq!(eval("false and boom()"), Value::Bool(false));
    assert!(eval_bool("true or boom()"));
}

#[test]
fn assignment_is_an_expression() {
    assert_eq!(eval_number("let a = 1; a = 5"), 5.0);
}

// ───────────────────────── statements ─────────────────────────

#[test]
fn statements_only_input_yields_no_value() {
    let mut session = Session::new();
    let result = session.evaluate("let a = 1;").expect("should run");

    assert!(result.is_none());
}

#[test]
fn block_scoping_shadows_and_restores() {
    let source = r#"
        let a = "outer";
        let witness = null;
        {
            let a = "inner";
            witness = a;
        }
        witness + " " + a
    "#;

    assert_eq!(eval_string(source), "inner outer");
}

#[test]
fn if_else_branches() {
    assert_eq!(
        eval_number("let x = null; if (1 < 2) x = 10; else x = 20; x"),
        10.0
    );
    assert_eq!(
        eval_number("let x = null; if (1 > 2) x = 10; else x = 20; x"),
        20.0
    );
}

#[test]
fn while_loop_accumulates() {
    let source = r#"
        let sum = 0;
        let i = 1;
        while (i <= 10) {
            sum = sum + i;
            i = i + 1;
        }
        sum
    "#;

    assert_eq!(eval_number(source), 55.0);
}

#[test]
fn for_loop_desugars_to_while() {
    let source = r#"
        let product = 1;
        for (let i = 1; i <= 5; i = i + 1) {
            product = product * i;
        }
        product
    "#;

    assert_eq!(eval_number(source), 120.0);
}

#[test]
fn for_loop_initializer_is_scoped_to_the_loop() {
    let source = r#"
        let i = 99;
        for (let i = 0; i < 3; i = i + 1) {}
        i
    "#;

    assert_eq!(eval_number(source), 99.0);
}

// ───────────────────────── functions & closures ─────────────────────────

#[test]
fn function_call_and_return() {
    let source = r#"
        fun add(a, b) { return a + b; }
        add(2, 3)
    "#;

    assert_eq!(eval_number(source), 5.0);
}

#[test]
fn function_without_return_yields_null() {
    let source = r#"
        fun noop() {}
        noop()
    "#;

    assert_eq!(eval(source), Value::Null);
}

#[test]
fn recursion() {
    let source = r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        fib(10)
    "#;

    assert_eq!(eval_number(source), 55.0);
}

#[test]
fn return_unwinds_through_loops() {
    let source = r#"
        fun firstOver(limit) {
            let i = 0;
            while (true) {
                if (i > limit) return i;
                i = i + 1;
            }
        }
        firstOver(7)
    "#;

    assert_eq!(eval_number(source), 8.0);
}

#[test]
fn closures_capture_their_environment() {
    let source = r#"
        fun makeCounter() {
            let count = 0;
            fun increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }
        let counter = makeCounter();
        counter();
        counter();
        counter()
    "#;

    assert_eq!(eval_number(source), 3.0);
}

#[test]
fn closures_are_independent_per_factory_call() {
    let source = r#"
        fun makeCounter() {
            let count = 0;
            fun increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }
        let a = makeCounter();
        let b = makeCounter();
        a();
        a();
        b()
    "#;

    assert_eq!(eval_number(source), 1.0);
}

#[test]
fn closures_from_one_call_share_state() {
    // Two closures born in the same activation close over the same frame,
    // so one sees the other's mutations.
    let source = r#"
        let increment = null;
        let read = null;
        fun makePair() {
            let count = 0;
            fun bump() {
                count = count + 1;
                return count;
            }
            fun current() { return count; }
            increment = bump;
            read = current;
        }
        makePair();
        increment();
        increment();
        read()
    "#;

    assert_eq!(eval_number(source), 2.0);
}

#[test]
fn static_scoping_binds_at_declaration() {
    // The closure must keep seeing the `x` it closed over, not a later
    // shadowing declaration in an inner scope.
    let source = r#"
        let x = "global";
        let seen = null;
        {
            fun read() { return x; }
            seen = read();
            let x = "shadow";
            seen = seen + " " + read();
        }
        seen
    "#;

    assert_eq!(eval_string(source), "global global");
}

// ───────────────────────── classes ─────────────────────────

#[test]
fn fields_and_methods() {
    let source = r#"
        class Person {
            init(firstname, lastname) {
                this.firstname = firstname;
                this.lastname = lastname;
            }

            fullName() {
                return this.firstname + " " + this.lastname;
            }
        }

        let john = Person("John", "Doe");
        john.fullName()
    "#;

    assert_eq!(eval_string(source), "John Doe");
}

#[test]
fn setter_methods_mutate_fields() {
    let source = r#"
        class Person {
            init(firstname, lastname) {
                this.firstname = firstname;
                this.lastname = lastname;
            }

            fullName() {
                return this.firstname + " " + this.lastname;
            }

            setFirst(firstname) {
                this.firstname = firstname;
            }
        }

        let p = Person("John", "Doe");
        p.setFirst("Jane");
        p.fullName()
    "#;

    assert_eq!(eval_string(source), "Jane Doe");
}

#[test]
fn fields_shadow_methods() {
    let source = r#"
        class Box {
            label() { return "method"; }
        }
        let b = Box();
        b.label = "field";
        b.label
    "#;

    assert_eq!(eval_string(source), "field");
}

#[test]
fn methods_bind_this_when_extracted() {
    let source = r#"
        class Greeter {
            init(name) { this.name = name; }
            greet() { return "hi " + this.name; }
        }
        let g = Greeter("ada");
        let unbound = g.greet;
        unbound()
    "#;

    assert_eq!(eval_string(source), "hi ada");
}

#[test]
fn initializer_always_returns_the_instance() {
    let source = r#"
        class Thing {
            init() { return; }
        }
        let t = Thing();
        t == t
    "#;

    assert!(eval_bool(source));
}

#[test]
fn inheritance_and_super_calls() {
    let source = r#"
        class Person {
            init(firstname, lastname, age) {
                this.firstname = firstname;
                this.lastname = lastname;
                this.age = age;
            }

            fullName() {
                return this.firstname + " " + this.lastname;
            }

            isRetirementAge() {
                return this.age >= 65;
            }
        }

        class Employee < Person {
            init(firstname, lastname, age, title) {
                super.init(firstname, lastname, age);
                this.title = title;
            }

            describe() {
                return this.fullName() + ", " + this.title;
            }
        }

        let jane = Employee("Jane", "Doe", 66, "Plumber");
        jane.describe()
    "#;

    assert_eq!(eval_string(source), "Jane Doe, Plumber");

    let check = r#"
        class Person {
            init(age) { this.age = age; }
            isRetirementAge() { return this.age >= 65; }
        }
        class Employee < Person {
            init(age) { super.init(age); }
        }
        Employee(66).isRetirementAge()
    "#;

    assert!(eval_bool(check));
}

#[test]
fn super_resolves_past_an_override() {
    let source = r#"
        class A {
            speak() { return "A"; }
        }
        class B < A {
            speak() { return super.speak() + "B"; }
        }
        class C < B {
            speak() { return super.speak() + "C"; }
        }
        C().speak()
    "#;

    assert_eq!(eval_string(source), "ABC");
}

#[test]
fn inherited_methods_are_found_on_the_superclass() {
    let source = r#"
        class Base {
            ping() { return "pong"; }
        }
        class Derived < Base {}
        Derived().ping()
    "#;

    assert_eq!(eval_string(source), "pong");
}

// ───────────────────────── session persistence ─────────────────────────

#[test]
fn state_persists_across_session_inputs() {
    let mut session = Session::new();

    session.run("let x = 1;").expect("first input should run");
    session.run("let y = 2;").expect("second input should run");

    let value = session
        .evaluate("x + y")
        .expect("third input should run")
        .expect("trailing expression expected");

    assert_eq!(value, Value::Number(3.0));
}

#[test]
fn functions_survive_across_session_inputs() {
    let mut session = Session::new();

    session
        .run("fun double(n) { return n * 2; }")
        .expect("definition should run");

    let value = session
        .evaluate("double(21)")
        .expect("call should run")
        .expect("trailing expression expected");

    assert_eq!(value, Value::Number(42.0));
}

#[test]
fn closures_resolved_in_one_input_still_work_in_later_inputs() {
    let mut session = Session::new();

    session
        .run(
            r#"
            fun makeCounter() {
                let count = 0;
                fun increment() {
                    count = count + 1;
                    return count;
                }
                return increment;
            }
            let counter = makeCounter();
            "#,
        )
        .expect("setup should run");

    // A later input introduces fresh local scopes of its own; the closure
    // from the earlier input must keep its original resolution.
    session
        .run("{ let count = 100; counter(); }")
        .expect("call inside a block should run");

    let value = session
        .evaluate("counter()")
        .expect("call should run")
        .expect("trailing expression expected");

    assert_eq!(value, Value::Number(2.0));
}

#[test]
fn failed_input_leaves_session_usable() {
    let mut session = Session::new();

    session.run("let x = 10;").expect("setup should run");

    assert!(session.run("let = ;").is_err());

    let value = session
        .evaluate("x")
        .expect("session should still work")
        .expect("trailing expression expected");

    assert_eq!(value, Value::Number(10.0));
}
