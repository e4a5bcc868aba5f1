//! A tree-walk interpreter for Brio, a small dynamically-typed expression
//! language with 64-bit integers, byte strings, booleans, arrays and
//! first-class closures.
//!
//! # Examples
//!
//! See [`crate::interpreter::Interpreter`].
//!
//! # Limitations
//!
//! - An unterminated string literal silently runs to the end of the input.
//! - Evaluation recurses on the host stack; deeply nested expressions can
//!   exhaust it.
//! - Strings are byte sequences: `len` counts bytes and indexing yields
//!   single bytes.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod interpreter;

mod ast;
mod env;
mod eval;
mod parser;
mod scanner;
mod token;
mod value;
