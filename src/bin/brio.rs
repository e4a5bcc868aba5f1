//! Brio interpreter command-line.
//!
//! When called without argument it drops into an interactive
//! read-evaluate-print loop.
//!
//! When called with a file path it evaluates that file and exits: nonzero
//! on parse errors, status 1 when evaluation produced an error value.

use std::env;
use std::fs;
use std::io;
use std::io::prelude::*;
use std::process;

use anyhow::{self, Context};

use brio::interpreter::{BrioError, Interpreter};

fn main() -> Result<(), anyhow::Error> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    match args.first() {
        Some(path) => run_file(path),
        None => run_prompt().map_err(anyhow::Error::from),
    }
}

fn run_file(path: &str) -> Result<(), anyhow::Error> {
    let source = fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;

    let mut interp_stdout = io::stdout();
    let mut interp = Interpreter::new(&mut interp_stdout);

    match interp.eval(&source) {
        Err(BrioError::Parse(diagnostics)) => {
            for d in &diagnostics {
                eprintln!("{}", d);
            }
            process::exit(2);
        }
        Ok(Some(result)) if result.is_error() => {
            println!("{}", result.printable());
            process::exit(1);
        }
        Ok(_) => Ok(()),
    }
}

fn run_prompt() -> Result<(), io::Error> {
    let stdin = io::stdin();
    let mut repl_stdout = io::stdout();
    let mut interp_stdout = io::stdout();

    let mut interp = Interpreter::new(&mut interp_stdout);

    let mut input = String::new();
    loop {
        repl_stdout.write_all(b"> ")?;
        repl_stdout.flush()?;

        input.clear();
        let nbytes = stdin.read_line(&mut input)?;
        if nbytes == 0 {
            break;
        }

        match interp.eval(&input) {
            Err(BrioError::Parse(diagnostics)) => {
                for d in &diagnostics {
                    println!("\t{}", d);
                }
            }
            Ok(Some(result)) => println!("{}", result.inspect()),
            Ok(None) => (),
        }
    }

    Ok(())
}
