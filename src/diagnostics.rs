//! Explicit diagnostics collector shared by the pipeline stages.
//!
//! The scanner, parser and resolver can each surface several errors in one
//! pass.  Instead of a global error‑reporter with sticky flags, every stage
//! appends to a [`Diagnostics`] value and the driver inspects it between
//! stages to decide whether execution may proceed.

use std::fmt;

use log::debug;

use crate::error::WrenchError;

/// An ordered batch of errors produced by one pipeline run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<WrenchError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics { errors: Vec::new() }
    }

    /// Record one error.  Recording never aborts the current stage; the
    /// stage itself decides how far it can meaningfully continue.
    pub fn report(&mut self, error: WrenchError) {
        debug!("Diagnostic recorded: {}", error);

        self.errors.push(error);
    }

    /// True when no error has been recorded so far.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WrenchError> {
        self.errors.iter()
    }

    /// Did any recorded error occur during execution (as opposed to the
    /// static front‑end)?  Drivers conventionally map runtime failures to
    /// exit code 70 and static ones to 65.
    pub fn had_runtime_error(&self) -> bool {
        self.errors.iter().any(WrenchError::is_runtime)
    }
}

impl From<WrenchError> for Diagnostics {
    fn from(error: WrenchError) -> Self {
        Diagnostics {
            errors: vec![error],
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }

        Ok(())
    }
}

impl IntoIterator for Diagnostics {
    type Item = WrenchError;
    type IntoIter = std::vec::IntoIter<WrenchError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
