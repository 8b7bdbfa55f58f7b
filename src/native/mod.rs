//! Native (host‑provided) library functions.
//!
//! Each native implements [`NativeFn`]: an arity predicate plus a body.
//! By contract, a native returns the null value on domain errors such as
//! wrong argument types; it never raises.  Wrong argument *counts* are
//! rejected by the interpreter's arity check before the body runs.

mod abs;
mod clock;
mod power;
mod str_replace;
mod unidecode;

use std::rc::Rc;

use log::debug;

use crate::environment::Environment;
use crate::value::{NativeFn, Value};

pub use abs::Abs;
pub use clock::Clock;
pub use power::Power;
pub use str_replace::StrReplaceAll;
pub use unidecode::Unidecode;

/// Define every native in the given (global) environment.
pub fn install(globals: &mut Environment) {
    let natives: [Rc<dyn NativeFn>; 5] = [
        Rc::new(Clock),
        Rc::new(Abs),
        Rc::new(Power),
        Rc::new(StrReplaceAll),
        Rc::new(Unidecode),
    ];

    for native in natives {
        debug!("Installing native function '{}'", native.name());

        globals.define(native.name(), Value::Native(native));
    }
}
