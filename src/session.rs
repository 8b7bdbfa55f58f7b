//! Embedding facade: one persistent interpreter fed many source inputs.
//!
//! A [`Session`] owns an [`Interpreter`] whose global environment survives
//! across calls, so `let x = 1;` in one input is visible to `x + 2` in the
//! next.  `run` executes a program for its effects; `evaluate` additionally
//! understands REPL input ending in a bare expression and returns its value.
//!
//! Each call runs the full pipeline — scan, parse, resolve, interpret — and
//! stops at the first stage that reports an error.  Nothing executes unless
//! the input is statically clean, so a bad input never half‑mutates the
//! session.

use log::info;

use crate::ast::ExprId;
use crate::diagnostics::Diagnostics;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::token::Token;
use crate::value::Value;

pub struct Session {
    interpreter: Interpreter,
    next_id: ExprId,
}

impl Session {
    pub fn new() -> Self {
        info!("Session created");

        Session {
            interpreter: Interpreter::new(),
            next_id: 0,
        }
    }

    /// Execute `source` as a program, for its side effects.
    pub fn run(&mut self, source: &str) -> Result<(), Diagnostics> {
        let mut diagnostics = Diagnostics::new();

        let tokens = self.scan(source, &mut diagnostics);

        // A corrupt token stream would only cascade into bogus parse errors.
        if !diagnostics.is_clean() {
            return Err(diagnostics);
        }

        let mut parser = Parser::with_base_id(&tokens, self.next_id);
        let statements = parser.parse(&mut diagnostics);
        self.next_id = parser.next_id();

        if !diagnostics.is_clean() {
            return Err(diagnostics);
        }

        Resolver::new(&mut self.interpreter, &mut diagnostics).resolve(&statements);

        if !diagnostics.is_clean() {
            return Err(diagnostics);
        }

        if let Err(e) = self.interpreter.interpret(&statements) {
            diagnostics.report(e);
            return Err(diagnostics);
        }

        Ok(())
    }

    /// Execute `source` as REPL input: statements optionally followed by one
    /// bare trailing expression, whose value (if present) is returned.
    pub fn evaluate(&mut self, source: &str) -> Result<Option<Value>, Diagnostics> {
        let mut diagnostics = Diagnostics::new();

        let tokens = self.scan(source, &mut diagnostics);

        if !diagnostics.is_clean() {
            return Err(diagnostics);
        }

        let mut parser = Parser::with_base_id(&tokens, self.next_id);
        let (statements, trailing) = parser.parse_repl(&mut diagnostics);
        self.next_id = parser.next_id();

        if !diagnostics.is_clean() {
            return Err(diagnostics);
        }

        {
            let mut resolver = Resolver::new(&mut self.interpreter, &mut diagnostics);
            resolver.resolve(&statements);

            if let Some(ref expr) = trailing {
                resolver.resolve_expression(expr);
            }
        }

        if !diagnostics.is_clean() {
            return Err(diagnostics);
        }

        if let Err(e) = self.interpreter.interpret(&statements) {
            diagnostics.report(e);
            return Err(diagnostics);
        }

        match trailing {
            Some(expr) => match self.interpreter.evaluate(&expr) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    diagnostics.report(e);
                    Err(diagnostics)
                }
            },
            None => Ok(None),
        }
    }

    fn scan(&self, source: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();

        for item in Scanner::new(source.as_bytes()) {
            match item {
                Ok(token) => tokens.push(token),
                Err(e) => diagnostics.report(e),
            }
        }

        tokens
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
