//! fern is a small, dynamically-typed, expression-oriented scripting
//! language. The crate is a strict pipeline: a streaming lexer feeds a Pratt
//! parser, and a tree-walking evaluator runs the resulting AST against a
//! lexically-scoped environment with first-class closures.

pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;

use error::FernError;
use evaluator::object::Value;
use evaluator::Env;
use lexer::Lexer;
use parser::Parser;

/// Parse and evaluate `source` against `env`.
///
/// Syntax errors are reported before any evaluation happens. The returned
/// value may still be a `Value::Error`, since in-language failures are
/// values, not host errors.
pub fn interpret(source: &str, env: &Env) -> Result<Value, FernError> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse();

    if !parser.errors().is_empty() {
        return Err(FernError::Parse(parser.errors().to_vec()));
    }

    Ok(evaluator::eval_program(&program, env))
}
