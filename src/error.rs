use std::fmt;

use crate::token::{Token, Type};

/// Accumulates whether a phase (or a whole run) produced any error.
///
/// Replaces the historical pair of process-wide `had_error` /
/// `had_runtime_error` flags with a value the driver owns and threads
/// through the pipeline explicitly. The REPL resets it after each line;
/// file mode reads it once after the run to pick an exit code.
#[derive(Debug, Default, Clone, Copy)]
pub struct Diagnostics {
    had_error: bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn reset(&mut self) {
        *self = Diagnostics::default();
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn mark_error(&mut self) {
        self.had_error = true;
    }

    pub fn mark_runtime_error(&mut self) {
        self.had_runtime_error = true;
    }
}

/// Every diagnostic type knows how to render itself as the `[line: L]
/// Error ...` line the driver writes to standard output, the same stream
/// `print` writes to.
pub trait Report {
    fn report(&self) -> String;
}

#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Report for ScanError {
    fn report(&self) -> String {
        format!("[line: {}] Error: {}", self.line, self.message)
    }
}

#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Report for ParseError {
    fn report(&self) -> String {
        if self.token.r#type == Type::Eof {
            format!("[line: {}] Error at end: {}", self.token.line, self.message)
        } else {
            format!(
                "[line: {}] Error at '{}': {}",
                self.token.line, self.token.lexeme, self.message
            )
        }
    }
}

#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Report for ResolveError {
    fn report(&self) -> String {
        format!(
            "[line: {}] Error at '{}': {}",
            self.token.line, self.token.lexeme, self.message
        )
    }
}

#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Report for RuntimeError {
    fn report(&self) -> String {
        format!("{}\n[line: {}]", self.message, self.token.line)
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RuntimeError {}
