use std::time::{SystemTime, UNIX_EPOCH};

use crate::value::{NativeFn, Value};

/// `clock()` — seconds since the Unix epoch, as a number.
#[derive(Debug)]
pub struct Clock;

impl NativeFn for Clock {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn accepts(&self, argc: usize) -> bool {
        argc == 0
    }

    fn call(&self, _args: &[Value]) -> Value {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => Value::Number(elapsed.as_secs_f64()),
            Err(_) => Value::Null,
        }
    }
}
