//! Lox is a dynamically typed, lexically scoped scripting language with
//! first-class functions and single-inheritance classes, evaluated here by
//! a tree-walking interpreter with a hand-written recursive descent parser.
//!
//! ## Scanning
//! The first step is scanning: turning source text into a flat list of
//! tokens. The scanner is implemented in [`scanner`] as a small state
//! machine over a peekable character stream. It reports [`error::ScanError`]
//! for things like unterminated strings, but keeps scanning past them so a
//! single run can surface every lexical problem at once.
//!
//! ## Parsing
//! The token list is turned into a tree of [`expr::Expr`]/[`stmt::Stmt`]
//! nodes by the recursive descent parser in [`parser`]. Expressions produce
//! an [`object::Object`] when evaluated; statements perform side effects.
//! Parse errors ([`error::ParseError`]) are recovered from by discarding
//! tokens up to the next likely statement boundary (`synchronize`), so
//! parsing continues and more errors can be reported in one pass.
//!
//! ## Resolving
//! Before interpreting, [`resolver::Resolver`] walks the tree once to
//! compute, for every variable reference, how many lexical scopes separate
//! it from its declaration. This pre-computed distance is what makes
//! closures and `this`/`super` behave correctly without the interpreter
//! needing to re-discover scope at every access. The resolver also catches
//! purely static mistakes ([`error::ResolveError`]) — `return` outside a
//! function, `this` outside a class, and the like.
//!
//! ## Interpreting
//! [`interpreter::Interpreter`] walks the tree, using the resolver's
//! distances to look variables up in [`environment::Environment`], a chain
//! of scopes rooted at a shared globals environment. Runtime errors
//! ([`error::RuntimeError`]) stop the current run but not the process.

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod repl;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use std::fs;
use std::io::{self, Write};

use error::{Diagnostics, Report};
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// The driver that wires the scanner/parser/resolver/interpreter pipeline
/// together. Generic over nothing, but dynamic over where `print` output
/// goes: the binary gives it real stdout, tests give it an in-memory
/// buffer so they can assert on captured output without spawning a
/// subprocess.
pub struct Lox {
    interpreter: Interpreter,
    diagnostics: Diagnostics,
}

impl Lox {
    pub fn new() -> Self {
        Lox::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(writer: Box<dyn Write>) -> Self {
        Lox { interpreter: Interpreter::new(writer), diagnostics: Diagnostics::new() }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Reads `path` and runs it as a single program. Returns the process
    /// exit code the driver should use: 0 on success, 1 if scanning,
    /// parsing, resolving, or interpreting produced any error.
    pub fn run_file(&mut self, path: &str) -> i32 {
        let contents = fs::read_to_string(path).unwrap_or_else(|err| {
            eprintln!("Could not read '{path}': {err}");
            std::process::exit(1);
        });

        self.run_source(&contents);

        if self.diagnostics.had_error() || self.diagnostics.had_runtime_error() {
            1
        } else {
            0
        }
    }

    /// Enters the interactive prompt. Each line (or block) resets
    /// diagnostics before running so one mistake doesn't poison the rest
    /// of the session.
    pub fn run_prompt(&mut self) {
        if let Err(err) = repl::run(self) {
            eprintln!("REPL error: {err}");
        }
    }

    /// Runs one program or REPL line through the full pipeline, reporting
    /// every diagnostic it collects to standard output, the same stream
    /// `print` writes to.
    pub fn run_source(&mut self, source: &str) {
        self.diagnostics.reset();

        let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
        for error in &scan_errors {
            self.interpreter.write_line(&error.report());
            self.diagnostics.mark_error();
        }
        if self.diagnostics.had_error() {
            return;
        }

        let (statements, parse_errors) = Parser::new(tokens).parse();
        for error in &parse_errors {
            self.interpreter.write_line(&error.report());
            self.diagnostics.mark_error();
        }
        if self.diagnostics.had_error() {
            return;
        }

        let (locals, resolve_errors) = Resolver::new().resolve(&statements);
        for error in &resolve_errors {
            self.interpreter.write_line(&error.report());
            self.diagnostics.mark_error();
        }
        if self.diagnostics.had_error() {
            return;
        }

        self.interpreter.set_locals(locals);
        if let Err(error) = self.interpreter.interpret(&statements) {
            self.interpreter.write_line(&error.report());
            self.diagnostics.mark_runtime_error();
        }
    }
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}
