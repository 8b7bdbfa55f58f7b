//! Static resolver pass for the **Wrench** interpreter.
//!
//! One AST walk that does three things:
//! 1. Build lexical scopes (stack of `HashMap<String, bool>` tracking
//!    declared/defined).
//! 2. Report static errors (redeclaration, forward‑read in an initializer,
//!    invalid `return`, invalid `this`/`super` usage) into the shared
//!    [`Diagnostics`] collector — the walk continues past them so one pass
//!    can surface several.
//! 3. Record, for *each* binding reference, its scope distance by calling
//!    back into the interpreter ([`Interpreter::resolve`]); references
//!    found in no scope fall back to global lookup at run time.
//!
//! The enclosing function and class kinds are tracked as explicit stacks
//! rather than single mutable "current" fields, so nested resolution never
//! loses an outer context.

use std::collections::HashMap;

use log::{debug, info};

use crate::ast::{Expr, ExprId, FunctionDecl, Stmt};
use crate::diagnostics::Diagnostics;
use crate::error::WrenchError;
use crate::interpreter::Interpreter;
use crate::token::Token;

/// What kind of function body are we inside?  Used to validate `return`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionKind {
    Function,
    Initializer,
    Method,
}

/// What kind of class body are we inside?  Used to validate `this`/`super`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ClassKind {
    Class,
    Subclass,
}

/// Resolver: tracks scopes, enforces static rules, and *records* binding
/// distances by calling back into the interpreter.
pub struct Resolver<'i, 'd> {
    interpreter: &'i mut Interpreter,
    diagnostics: &'d mut Diagnostics,
    scopes: Vec<HashMap<String, bool>>, // false=declared, true=defined
    function_stack: Vec<FunctionKind>,
    class_stack: Vec<ClassKind>,
}

impl<'i, 'd> Resolver<'i, 'd> {
    /// Create a new resolver bound to the given interpreter and collector.
    pub fn new(interpreter: &'i mut Interpreter, diagnostics: &'d mut Diagnostics) -> Self {
        info!("Resolver instantiated");

        Resolver {
            interpreter,
            diagnostics,
            scopes: Vec::new(),
            function_stack: Vec::new(),
            class_stack: Vec::new(),
        }
    }

    /// Walk all top‑level statements.
    pub fn resolve(&mut self, statements: &[Stmt]) {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    /// Walk a bare expression (the REPL's trailing‑expression case).
    pub fn resolve_expression(&mut self, expr: &Expr) {
        self.resolve_expr(expr);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statement resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        debug!("Resolving stmt: {:?}", stmt);

        match stmt {
            Stmt::Block(statements) => {
                self.begin_scope();
                for s in statements {
                    self.resolve_stmt(s);
                }
                self.end_scope();
            }

            Stmt::Var { name, initializer } => {
                // declare → resolve initializer → define, so that the
                // initializer cannot read the name it is initialising
                self.declare(name);
                if let Some(expr) = initializer {
                    self.resolve_expr(expr);
                }
                self.define(name);
            }

            Stmt::Function(declaration) => {
                // a function's name is visible *inside* its own body
                self.declare(&declaration.name);
                self.define(&declaration.name);
                self.resolve_function(declaration, FunctionKind::Function);
            }

            Stmt::Expression(expr) | Stmt::Print(expr) => {
                self.resolve_expr(expr);
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(eb) = else_branch.as_deref() {
                    self.resolve_stmt(eb);
                }
            }

            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }

            Stmt::Return { keyword, value } => {
                if self.function_stack.is_empty() {
                    self.diagnostics.report(WrenchError::resolve(
                        keyword.line,
                        "Cannot return from top-level code",
                    ));
                }

                if let Some(expr) = value {
                    if self.function_stack.last() == Some(&FunctionKind::Initializer) {
                        self.diagnostics.report(WrenchError::resolve(
                            keyword.line,
                            "Cannot return a value from an initializer",
                        ));
                    }

                    self.resolve_expr(expr);
                }
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.resolve_class(name, superclass.as_ref(), methods),
        }
    }

    fn resolve_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[std::rc::Rc<FunctionDecl>],
    ) {
        self.declare(name);
        self.define(name);

        let mut kind = ClassKind::Class;

        if let Some(superclass_expr) = superclass {
            if let Expr::Variable { name: sc_name, .. } = superclass_expr {
                if sc_name.lexeme == name.lexeme {
                    self.diagnostics.report(WrenchError::resolve(
                        sc_name.line,
                        "A class cannot inherit from itself",
                    ));
                }
            }

            kind = ClassKind::Subclass;
            self.resolve_expr(superclass_expr);

            // Extra scope so `super` in method bodies resolves lexically.
            self.begin_scope();
            self.define_implicit("super");
        }

        self.class_stack.push(kind);

        self.begin_scope();
        self.define_implicit("this");

        for method in methods {
            let function_kind = if method.name.lexeme == "init" {
                FunctionKind::Initializer
            } else {
                FunctionKind::Method
            };

            self.resolve_function(method, function_kind);
        }

        self.end_scope();
        self.class_stack.pop();

        if superclass.is_some() {
            self.end_scope();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expression resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_expr(&mut self, expr: &Expr) {
        debug!("Resolving expr: {:?}", expr);

        match expr {
            Expr::Literal(_) => {}

            Expr::Grouping(inner) => {
                self.resolve_expr(inner);
            }

            Expr::Unary { right, .. } => {
                self.resolve_expr(right);
            }

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }

            Expr::Variable { id, name } => {
                // Cannot read a local in its own initializer.
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme) == Some(&false) {
                        self.diagnostics.report(WrenchError::resolve(
                            name.line,
                            "Cannot read local variable in its own initializer",
                        ));
                    }
                }

                self.resolve_local(*id, name);
            }

            Expr::Assign { id, name, value } => {
                // First resolve the RHS, then bind the LHS.
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);
                for arg in arguments {
                    self.resolve_expr(arg);
                }
            }

            Expr::Get { object, .. } => self.resolve_expr(object),

            Expr::Set { object, value, .. } => {
                self.resolve_expr(object);
                self.resolve_expr(value);
            }

            Expr::This { id, keyword } => {
                if self.class_stack.is_empty() {
                    self.diagnostics.report(WrenchError::resolve(
                        keyword.line,
                        "Cannot use 'this' outside of a class",
                    ));
                    return;
                }

                self.resolve_local(*id, keyword);
            }

            Expr::Super { id, keyword, .. } => {
                match self.class_stack.last() {
                    None => {
                        self.diagnostics.report(WrenchError::resolve(
                            keyword.line,
                            "Cannot use 'super' outside of a class",
                        ));
                        return;
                    }

                    Some(ClassKind::Class) => {
                        self.diagnostics.report(WrenchError::resolve(
                            keyword.line,
                            "Cannot use 'super' in a class with no superclass",
                        ));
                        return;
                    }

                    Some(ClassKind::Subclass) => {}
                }

                self.resolve_local(*id, keyword);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function’s parameters + body.  Parameters
    /// are declared *and* defined at once: they have no initializer hazard.
    fn resolve_function(&mut self, declaration: &FunctionDecl, kind: FunctionKind) {
        self.function_stack.push(kind);

        self.begin_scope();
        for param in &declaration.params {
            self.declare(param);
            self.define(param);
        }
        for stmt in &declaration.body {
            self.resolve_stmt(stmt);
        }
        self.end_scope();

        self.function_stack.pop();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    #[inline]
    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(&name.lexeme) {
                self.diagnostics.report(WrenchError::resolve(
                    name.line,
                    "Variable already declared in this scope",
                ));
                return;
            }

            scope.insert(name.lexeme.clone(), false);
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    /// Define a keyword binding (`this`/`super`) in the innermost scope.
    fn define_implicit(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), true);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding‑distance helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Record this reference as a local at its scope distance, or leave it
    /// unrecorded (⇒ global fallback) if no scope declares the name.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        // innermost → outermost
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                debug!("Resolved '{}' at depth {}", name.lexeme, depth);
                self.interpreter.resolve(id, depth);
                return;
            }
        }

        debug!("Resolved '{}' as global", name.lexeme);
    }
}
