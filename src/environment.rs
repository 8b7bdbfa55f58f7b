//! The environment chain: a linked sequence of mutable scope frames.
//!
//! Frames are shared (`Rc<RefCell<_>>`) because a closure or bound method
//! keeps a claim on its defining frame for as long as the value is
//! reachable — that sharing is what lets closures observe later mutations
//! of outer variables.
//!
//! `get`/`assign` walk the chain dynamically; `get_at`/`assign_at` walk
//! exactly the resolver‑computed number of hops.  The resolver guarantees
//! every recorded distance is satisfiable against the chain the interpreter
//! builds, so running off the end of the chain is an invariant violation
//! and is surfaced as a runtime error rather than a panic.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::error::{Result, WrenchError};
use crate::token::Token;
use crate::value::Value;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// A frame with no parent: the global environment.
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    /// A fresh child frame chained onto `enclosing`.
    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Insert or overwrite `name` in *this* frame.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("define '{}'", name);

        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up in this frame, then outward through the chain.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(WrenchError::runtime(
                name.line,
                format!("Undefined variable '{}'", name.lexeme),
            ))
        }
    }

    /// Assign to an *existing* binding, searching outward through the chain.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(WrenchError::runtime(
                name.line,
                format!("Undefined variable '{}'", name.lexeme),
            ))
        }
    }

    /// The `this` binding of this frame, if any.  Used by initializer calls,
    /// whose bound frame always carries one.
    pub fn get_this(&self) -> Value {
        self.values.get("this").cloned().unwrap_or(Value::Null)
    }

    /// The parent frame, if any.
    pub fn enclosing(&self) -> Option<Rc<RefCell<Environment>>> {
        self.enclosing.as_ref().map(Rc::clone)
    }

    /// The `this` binding of the frame exactly `distance` hops out.
    pub fn this_at(env: &Rc<RefCell<Environment>>, distance: usize) -> Value {
        match Self::ancestor(env, distance) {
            Some(frame) => frame.borrow().get_this(),
            None => Value::Null,
        }
    }

    /// Walk exactly `distance` enclosing links, then look `name` up in that
    /// frame only.
    pub fn get_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &Token) -> Result<Value> {
        let frame = Self::ancestor(env, distance).ok_or_else(|| {
            WrenchError::runtime(name.line, format!("Undefined variable '{}'", name.lexeme))
        })?;

        let value = frame.borrow().values.get(&name.lexeme).cloned();

        value.ok_or_else(|| {
            WrenchError::runtime(name.line, format!("Undefined variable '{}'", name.lexeme))
        })
    }

    /// Walk exactly `distance` enclosing links, then assign `name` in that
    /// frame only.
    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &Token,
        value: Value,
    ) -> Result<()> {
        let frame = Self::ancestor(env, distance).ok_or_else(|| {
            WrenchError::runtime(name.line, format!("Undefined variable '{}'", name.lexeme))
        })?;

        frame.borrow_mut().values.insert(name.lexeme.clone(), value);

        Ok(())
    }

    /// The frame exactly `distance` hops out, or `None` if the chain is
    /// shorter than that (resolver invariant violated).
    fn ancestor(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
    ) -> Option<Rc<RefCell<Environment>>> {
        let mut current: Rc<RefCell<Environment>> = Rc::clone(env);

        for _ in 0..distance {
            let next = match current.borrow().enclosing.as_ref() {
                Some(enclosing) => Rc::clone(enclosing),
                None => return None,
            };

            current = next;
        }

        Some(current)
    }
}
