use crate::value::{NativeFn, Value};

/// `str_replace_all(source, pattern, replacement)` — replace every
/// occurrence of `pattern` in `source`.
///
/// Numbers and other values are *not* coerced to strings; any non‑string
/// argument yields null.
#[derive(Debug)]
pub struct StrReplaceAll;

impl NativeFn for StrReplaceAll {
    fn name(&self) -> &'static str {
        "str_replace_all"
    }

    fn accepts(&self, argc: usize) -> bool {
        argc == 3
    }

    fn call(&self, args: &[Value]) -> Value {
        match args {
            [Value::Str(source), Value::Str(pattern), Value::Str(replacement)] => {
                Value::Str(source.replace(pattern.as_str(), replacement))
            }
            _ => Value::Null,
        }
    }
}
