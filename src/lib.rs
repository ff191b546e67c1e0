/*!
Chemistry Language (CL): a small, dynamically-typed interpreted language for
chemistry homework, where every number carries a decimal magnitude, a
physical unit, and an optional chemical formula.

This crate is organized leaves-first: the decimal engine, the formula
parser, the unit registry, the `Quantity` value and its operator semantics,
the reaction balancer, and the `->` conversion pipeline form the evaluation
core; the scanner, parser, and tree-walking interpreter are the front end
that drives that core from CL source text.
*/

pub mod ast;
pub mod config;
pub mod conversion;
pub mod decimal;
pub mod element;
pub mod error;
pub mod formula;
pub mod interpreter;
pub mod parser;
pub mod quantity;
pub mod reaction;
pub mod repl;
pub mod scanner;
pub mod token;
pub mod unit;
pub mod value;

use error::CLResult;
use interpreter::Interpreter;

/// Scans, parses, and runs one chunk of CL source text against `interp`'s
/// environment (shared by `crate::repl` and the script-running branch of
/// `crate::main`).
pub fn run_source(interp: &Interpreter, source: &str) -> CLResult<()> {
    let tokens = scanner::scan(source)?;
    let program = parser::parse(tokens)?;
    interp.run(&program)
}
