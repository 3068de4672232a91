pub mod ast;
pub mod ast_printer;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod repl;
pub mod scanner;
pub mod stack;
pub mod token;
pub mod value;

use crate::ast::Program;
use crate::environment::Env;
use crate::evaluator::Evaluator;
use crate::parser::Parser;
use crate::scanner::Scanner;
use crate::value::Value;

/// Parse `source` into a program.
pub fn parse(source: &str) -> std::result::Result<Program, error::ParseError> {
    Parser::new(Scanner::new(source)).parse_program()
}

/// Parse and evaluate `source` in `env`: the two-call sequence the front end
/// runs for every input.
pub fn run(source: &str, env: &Env, evaluator: &mut Evaluator) -> error::Result<Value> {
    let program: Program = parse(source)?;

    Ok(evaluator.evaluate(&program, env)?)
}
