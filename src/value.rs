//! Runtime object model: the values that flow through the interpreter.
//!
//! Primitives (`Number`, `Str`, `Bool`, `Null`) compare by value; callables,
//! classes and instances compare by identity (`Rc::ptr_eq`).

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::FunctionDecl;
use crate::environment::Environment;
use crate::error::{Result, WrenchError};
use crate::token::Token;

/// Calling contract for host‑provided library functions.
///
/// `accepts` is an arity *predicate*, not a fixed count, so a native may
/// admit several argument shapes.  `call` must return [`Value::Null`] on
/// domain errors such as wrong argument types — runtime errors are reserved
/// for the interpreter's own arity and callability checks.
pub trait NativeFn: fmt::Debug {
    fn name(&self) -> &'static str;

    fn accepts(&self, argc: usize) -> bool;

    fn call(&self, args: &[Value]) -> Value;
}

/// A user‑defined function or method: its declaration, the environment
/// captured at declaration time, and whether it is a class initializer.
#[derive(Debug)]
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(
        declaration: Rc<FunctionDecl>,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
    ) -> Self {
        Function {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    /// Rebind this method to `instance`: a fresh value whose closure is a
    /// new one‑entry frame carrying `this`, chained onto the original
    /// closure.  The original is never mutated.
    pub fn bind(&self, instance: Rc<RefCell<Instance>>) -> Function {
        let mut frame = Environment::with_enclosing(Rc::clone(&self.closure));
        frame.define("this", Value::Instance(instance));

        Function {
            declaration: Rc::clone(&self.declaration),
            closure: Rc::new(RefCell::new(frame)),
            is_initializer: self.is_initializer,
        }
    }
}

/// A class value: name, optional superclass, and its method table.
#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<Class>>,
    methods: HashMap<String, Rc<Function>>,
}

impl Class {
    pub fn new(
        name: String,
        superclass: Option<Rc<Class>>,
        methods: HashMap<String, Rc<Function>>,
    ) -> Self {
        Class {
            name,
            superclass,
            methods,
        }
    }

    /// Method lookup, walking up the inheritance chain.
    pub fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }

        self.superclass
            .as_ref()
            .and_then(|superclass| superclass.find_method(name))
    }

    /// Calling a class forwards the arguments to `init`, so the class's
    /// arity is its initializer's (or zero without one).
    pub fn arity(&self) -> usize {
        self.find_method("init")
            .map_or(0, |initializer| initializer.arity())
    }
}

/// An instance: a reference to its class plus a mutable field map.
#[derive(Debug)]
pub struct Instance {
    class: Rc<Class>,
    fields: HashMap<String, Value>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Rc<RefCell<Instance>> {
        Rc::new(RefCell::new(Instance {
            class,
            fields: HashMap::new(),
        }))
    }

    pub fn class_name(&self) -> &str {
        &self.class.name
    }

    /// Property access: an existing field wins over a method of the same
    /// name; a found method is freshly bound to this instance.
    pub fn get(instance: &Rc<RefCell<Instance>>, name: &Token) -> Result<Value> {
        if let Some(field) = instance.borrow().fields.get(&name.lexeme) {
            return Ok(field.clone());
        }

        let method = instance.borrow().class.find_method(&name.lexeme);

        if let Some(method) = method {
            return Ok(Value::Function(Rc::new(method.bind(Rc::clone(instance)))));
        }

        Err(WrenchError::runtime(
            name.line,
            format!("Undefined property '{}'", name.lexeme),
        ))
    }

    /// Property assignment unconditionally creates or overwrites the field.
    pub fn set(&mut self, name: &Token, value: Value) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

/// Every value a Wrench expression can produce.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Native(Rc<dyn NativeFn>),
    Function(Rc<Function>),
    Class(Rc<Class>),
    Instance(Rc<RefCell<Instance>>),
}

impl Value {
    /// The null value and `false` are falsy; everything else (including
    /// `0` and the empty string) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }
}

impl PartialEq for Value {
    /// Same‑type identity/value comparison, no implicit coercion.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }

            Value::Str(s) => write!(f, "{}", s),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Null => write!(f, "null"),

            Value::Native(native) => write!(f, "<native fn '{}'>", native.name()),

            Value::Function(function) => write!(f, "<fn {}>", function.name()),

            Value::Class(class) => write!(f, "{}", class.name),

            Value::Instance(instance) => {
                write!(f, "{} instance", instance.borrow().class_name())
            }
        }
    }
}
