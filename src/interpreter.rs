//! Direct tree‑walking execution of resolved statements and expressions.
//!
//! The interpreter holds the persistent global environment, the current
//! environment (head of the chain), and the resolver's side table mapping
//! binding‑reference nodes to scope distances.  A recorded distance turns a
//! variable access into an exact‑hop `get_at`/`assign_at`; an unrecorded
//! one falls back to the global frame.
//!
//! Non‑local `return` is modelled as an explicit [`Flow`] result threaded
//! outward through statement execution; the function‑call boundary
//! collapses it back into an ordinary value.  It never crosses that
//! boundary unresolved — a top‑level `return` is rejected statically by
//! the resolver.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Expr, ExprId, FunctionDecl, LiteralValue, Stmt};
use crate::environment::Environment;
use crate::error::{Result, WrenchError};
use crate::native;
use crate::token::{Token, TokenType};
use crate::value::{Class, Function, Instance, Value};

/// Outcome of executing one statement: either fall through to the next, or
/// unwind to the nearest enclosing call with a value.
#[derive(Debug)]
pub enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<ExprId, usize>,
}

impl Interpreter {
    /// Creates a new Interpreter with the native library installed in its
    /// global environment.
    pub fn new() -> Self {
        info!("Initializing Interpreter");

        let mut globals = Environment::new();
        native::install(&mut globals);

        let globals = Rc::new(RefCell::new(globals));

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
        }
    }

    /// The resolver's `recordResolution` callback: note that the reference
    /// node `id` binds at `depth` enclosing‑scope hops.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Interprets a list of statements (a "program") against the persistent
    /// global environment.  A runtime error aborts the whole sequence.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        for statement in statements {
            if let Flow::Return(_) = self.execute(statement)? {
                // The resolver rejects top-level `return`; reaching this is a bug.
                return Err(WrenchError::runtime(0, "'return' escaped to top level"));
            }
        }

        info!("Interpretation completed successfully");
        Ok(())
    }

    // ─────────────────────────── statements ───────────────────────────

    fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                println!("{}", value);
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Null,
                };

                debug!("Variable '{}' defined as {}", name.lexeme, value);

                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let child = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, Rc::new(RefCell::new(child)))
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }

                Ok(Flow::Normal)
            }

            Stmt::Function(declaration) => {
                // Capture the environment active at declaration time.
                let function = Function::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );

                debug!("Function '{}' defined", declaration.name.lexeme);

                self.environment
                    .borrow_mut()
                    .define(&declaration.name.lexeme, Value::Function(Rc::new(function)));

                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Null,
                };

                debug!("Returning {}", value);

                Ok(Flow::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods),
        }
    }

    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) -> Result<Flow> {
        let superclass_value: Option<Rc<Class>> = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Class(class) => Some(class),
                _ => {
                    return Err(WrenchError::runtime(
                        expr.line(),
                        "Superclass must be a class",
                    ));
                }
            },
            None => None,
        };

        // Placeholder binding so methods can refer to the class by name.
        self.environment
            .borrow_mut()
            .define(&name.lexeme, Value::Null);

        // Extra environment layer carrying `super` while methods capture
        // their closures.
        if let Some(ref sc) = superclass_value {
            let mut layer = Environment::with_enclosing(Rc::clone(&self.environment));
            layer.define("super", Value::Class(Rc::clone(sc)));
            self.environment = Rc::new(RefCell::new(layer));
        }

        let mut method_table: HashMap<String, Rc<Function>> = HashMap::new();

        for method in methods {
            let is_initializer = method.name.lexeme == "init";
            let function = Function::new(
                Rc::clone(method),
                Rc::clone(&self.environment),
                is_initializer,
            );

            method_table.insert(method.name.lexeme.clone(), Rc::new(function));
        }

        let class = Class::new(name.lexeme.clone(), superclass_value.clone(), method_table);

        if superclass_value.is_some() {
            let parent = self.environment.borrow().enclosing();

            if let Some(parent) = parent {
                self.environment = parent;
            }
        }

        // Replace the placeholder with the finished class.
        self.environment
            .borrow_mut()
            .assign(name, Value::Class(Rc::new(class)))?;

        info!("Class '{}' defined", name.lexeme);

        Ok(Flow::Normal)
    }

    /// Execute `statements` inside `environment`, restoring the caller's
    /// environment afterwards even when an error or return propagates out.
    fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<Flow> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut outcome: Result<Flow> = Ok(Flow::Normal);

        for statement in statements {
            match self.execute(statement) {
                Ok(Flow::Normal) => {}
                other => {
                    outcome = other;
                    break;
                }
            }
        }

        self.environment = previous;
        outcome
    }

    // ─────────────────────────── expressions ───────────────────────────

    /// Evaluates an expression and returns a Value.  Public so the REPL can
    /// echo a trailing expression.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::Str(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Null => Value::Null,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left_value = self.evaluate(left)?;

                // Short-circuit: the left value itself is the result when
                // it decides the outcome.
                if operator.token_type == TokenType::OR {
                    if left_value.is_truthy() {
                        return Ok(left_value);
                    }
                } else if !left_value.is_truthy() {
                    return Ok(left_value);
                }

                self.evaluate(right)
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => {
                        Environment::assign_at(&self.environment, distance, name, value.clone())?;
                    }
                    None => {
                        self.globals.borrow_mut().assign(name, value.clone())?;
                    }
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee_value = self.evaluate(callee)?;

                let mut argument_values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    argument_values.push(self.evaluate(argument)?);
                }

                self.call_value(callee_value, paren, argument_values)
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => Instance::get(&instance, name),
                _ => Err(WrenchError::runtime(
                    name.line,
                    "Only instances have properties",
                )),
            },

            Expr::Set {
                object,
                name,
                value,
            } => match self.evaluate(object)? {
                Value::Instance(instance) => {
                    let value = self.evaluate(value)?;
                    instance.borrow_mut().set(name, value.clone());
                    Ok(value)
                }
                _ => Err(WrenchError::runtime(
                    name.line,
                    "Only instances have fields",
                )),
            },

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value> {
        let right_value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => match right_value {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(WrenchError::runtime(
                    operator.line,
                    "Operand must be a number",
                )),
            },

            TokenType::BANG => Ok(Value::Bool(!right_value.is_truthy())),

            _ => Err(WrenchError::runtime(operator.line, "Invalid unary operator")),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left_value = self.evaluate(left)?;
        let right_value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::PLUS => match (left_value, right_value) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
                _ => Err(WrenchError::runtime(
                    operator.line,
                    "Operands must be two numbers or two strings",
                )),
            },

            TokenType::MINUS => self.numeric_binary(operator, left_value, right_value, |a, b| {
                Value::Number(a - b)
            }),

            TokenType::STAR => self.numeric_binary(operator, left_value, right_value, |a, b| {
                Value::Number(a * b)
            }),

            // IEEE-754 semantics: division by zero yields an infinity.
            TokenType::SLASH => self.numeric_binary(operator, left_value, right_value, |a, b| {
                Value::Number(a / b)
            }),

            TokenType::GREATER => self.numeric_binary(operator, left_value, right_value, |a, b| {
                Value::Bool(a > b)
            }),

            TokenType::GREATER_EQUAL => self
                .numeric_binary(operator, left_value, right_value, |a, b| {
                    Value::Bool(a >= b)
                }),

            TokenType::LESS => self.numeric_binary(operator, left_value, right_value, |a, b| {
                Value::Bool(a < b)
            }),

            TokenType::LESS_EQUAL => self
                .numeric_binary(operator, left_value, right_value, |a, b| {
                    Value::Bool(a <= b)
                }),

            TokenType::EQUAL_EQUAL => Ok(Value::Bool(left_value == right_value)),

            TokenType::BANG_EQUAL => Ok(Value::Bool(left_value != right_value)),

            _ => Err(WrenchError::runtime(
                operator.line,
                "Invalid binary operator",
            )),
        }
    }

    fn numeric_binary(
        &self,
        operator: &Token,
        left: Value,
        right: Value,
        apply: fn(f64, f64) -> Value,
    ) -> Result<Value> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(apply(a, b)),
            _ => Err(WrenchError::runtime(
                operator.line,
                "Operands must be numbers",
            )),
        }
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> Result<Value> {
        let distance = match self.locals.get(&id) {
            Some(&distance) => distance,
            None => {
                return Err(WrenchError::runtime(
                    keyword.line,
                    "Cannot use 'super' outside of a subclass method",
                ));
            }
        };

        let superclass = match Environment::get_at(&self.environment, distance, keyword)? {
            Value::Class(class) => class,
            _ => {
                return Err(WrenchError::runtime(
                    keyword.line,
                    "Cannot use 'super' outside of a subclass method",
                ));
            }
        };

        // `this` lives one frame inside the `super` layer.
        let instance = match Environment::this_at(&self.environment, distance - 1) {
            Value::Instance(instance) => instance,
            _ => {
                return Err(WrenchError::runtime(
                    keyword.line,
                    "Cannot use 'super' outside of a subclass method",
                ));
            }
        };

        // Lookup on the *static* superclass, binding to the *current*
        // instance — this is what lets an override extend, not replace,
        // the inherited method.
        match superclass.find_method(&method.lexeme) {
            Some(found) => Ok(Value::Function(Rc::new(found.bind(instance)))),
            None => Err(WrenchError::runtime(
                method.line,
                format!("Undefined property '{}'", method.lexeme),
            )),
        }
    }

    // ─────────────────────────── call machinery ───────────────────────────

    fn call_value(&mut self, callee: Value, paren: &Token, arguments: Vec<Value>) -> Result<Value> {
        match callee {
            Value::Native(native) => {
                if !native.accepts(arguments.len()) {
                    return Err(WrenchError::runtime(
                        paren.line,
                        format!(
                            "Native function '{}' does not accept {} argument(s)",
                            native.name(),
                            arguments.len()
                        ),
                    ));
                }

                debug!("Calling native function '{}'", native.name());

                Ok(native.call(&arguments))
            }

            Value::Function(function) => self.call_function(&function, paren, arguments),

            Value::Class(class) => self.call_class(&class, paren, arguments),

            _ => Err(WrenchError::runtime(
                paren.line,
                "Can only call functions and classes",
            )),
        }
    }

    fn call_function(
        &mut self,
        function: &Function,
        paren: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value> {
        if arguments.len() != function.arity() {
            return Err(WrenchError::runtime(
                paren.line,
                format!(
                    "Expected {} arguments but got {}",
                    function.arity(),
                    arguments.len()
                ),
            ));
        }

        debug!("Calling function '{}'", function.name());

        // One fresh frame per call, chained onto the captured closure.
        let mut frame = Environment::with_enclosing(Rc::clone(&function.closure));

        for (param, argument) in function.declaration.params.iter().zip(arguments) {
            frame.define(&param.lexeme, argument);
        }

        let flow = self.execute_block(&function.declaration.body, Rc::new(RefCell::new(frame)))?;

        // Initializers always yield the instance, whatever the body did.
        if function.is_initializer {
            return Ok(function.closure.borrow().get_this());
        }

        match flow {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Null),
        }
    }

    fn call_class(
        &mut self,
        class: &Rc<Class>,
        paren: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value> {
        if arguments.len() != class.arity() {
            return Err(WrenchError::runtime(
                paren.line,
                format!(
                    "Expected {} arguments but got {}",
                    class.arity(),
                    arguments.len()
                ),
            ));
        }

        debug!("Instantiating class '{}'", class.name);

        let instance = Instance::new(Rc::clone(class));

        // The init return value is discarded; the call always yields the
        // new instance.
        if let Some(initializer) = class.find_method("init") {
            let bound = initializer.bind(Rc::clone(&instance));
            self.call_function(&bound, paren, arguments)?;
        }

        Ok(Value::Instance(instance))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
