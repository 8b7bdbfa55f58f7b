use crate::value::{NativeFn, Value};

/// `unidecode(s)` — best‑effort transliteration of UTF‑8 text into
/// US‑ASCII, conveying the pronunciation of other writing systems in
/// Roman letters.  Null for non‑string input.
#[derive(Debug)]
pub struct Unidecode;

impl NativeFn for Unidecode {
    fn name(&self) -> &'static str {
        "unidecode"
    }

    fn accepts(&self, argc: usize) -> bool {
        argc == 1
    }

    fn call(&self, args: &[Value]) -> Value {
        match args {
            [Value::Str(input)] => Value::Str(deunicode::deunicode(input)),
            _ => Value::Null,
        }
    }
}
