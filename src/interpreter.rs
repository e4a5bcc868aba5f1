//! API to control the interpreter.

use std::io::prelude::*;
use std::rc::Rc;

use thiserror::Error;

use crate::env::Env;
use crate::eval::Evaluator;
use crate::parser::Parser;
use crate::scanner::Scanner;

pub use crate::value::Value;

/// Errors the interpreter can raise.
///
/// Runtime failures are NOT represented here: they are `Value::Error`
/// results, returned like any other value so the caller decides their
/// severity (the interactive loop echoes them, the file runner exits).
#[derive(Debug, Error)]
pub enum BrioError {
    /// The parser accumulated one or more diagnostics; the program was not
    /// evaluated.
    #[error("parsing failed with {} error(s)", .0.len())]
    Parse(Vec<String>),
}

impl BrioError {
    /// The parser diagnostics carried by a `Parse` error.
    pub fn diagnostics(&self) -> &[String] {
        match self {
            BrioError::Parse(diags) => diags,
        }
    }
}

/// Tree-walk interpreter.
///
/// The global environment persists across `eval` calls, so definitions made
/// in one source unit are visible in the next.
///
/// # Example
///
/// Invoke the interpreter a first time to define a function and additional
/// times to call it:
///
/// ```
/// # use brio::interpreter::{BrioError, Interpreter};
///
/// let mut output: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output);
///
/// let adder_def = r#"
///     let adder = fn(x) {
///         fn(y) { x + y };
///     };
///     let addTwo = adder(2);
/// "#;
/// interp.eval(adder_def)?;
///
/// interp.eval("printLine(addTwo(2));")?;
/// interp.eval("printLine(addTwo(40));")?;
///
/// assert_eq!(output, b"4\n42\n");
/// # Ok::<(), BrioError>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'t, W: Write> {
    evaluator: Evaluator<'t, W>,
    globals: Rc<Env>,
}

impl<'t, W: Write> Interpreter<'t, W> {
    pub fn new(output: &'t mut W) -> Interpreter<'t, W> {
        Interpreter {
            evaluator: Evaluator::new(output),
            globals: Env::new(),
        }
    }

    /// Scans, parses and evaluates one source unit in the global
    /// environment.
    ///
    /// Returns `Ok(None)` when the final statement produces no value.
    pub fn eval(&mut self, source: &str) -> Result<Option<Value>, BrioError> {
        let mut parser = Parser::new(Scanner::new(source));
        let program = parser.parse_program();
        if !parser.errors().is_empty() {
            return Err(BrioError::Parse(parser.errors().to_vec()));
        }
        Ok(self.evaluator.eval_program(&program, &self.globals))
    }
}
