use crate::value::{NativeFn, Value};

/// `abs(n)` — absolute value of a number; null for non‑numbers.
#[derive(Debug)]
pub struct Abs;

impl NativeFn for Abs {
    fn name(&self) -> &'static str {
        "abs"
    }

    fn accepts(&self, argc: usize) -> bool {
        argc == 1
    }

    fn call(&self, args: &[Value]) -> Value {
        match args {
            [Value::Number(n)] => Value::Number(n.abs()),
            _ => Value::Null,
        }
    }
}
