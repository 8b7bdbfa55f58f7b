use crate::value::{NativeFn, Value};

/// `power(base, exponent)` — floating‑point exponentiation; null unless
/// both arguments are numbers.
#[derive(Debug)]
pub struct Power;

impl NativeFn for Power {
    fn name(&self) -> &'static str {
        "power"
    }

    fn accepts(&self, argc: usize) -> bool {
        argc == 2
    }

    fn call(&self, args: &[Value]) -> Value {
        match args {
            [Value::Number(base), Value::Number(exponent)] => {
                Value::Number(base.powf(*exponent))
            }
            _ => Value::Null,
        }
    }
}
