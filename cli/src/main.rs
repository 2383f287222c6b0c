//! Fern CLI - script runner and REPL.
//!
//! Usage:
//!   fern <SCRIPT>     Evaluate a script file and print its final value
//!   fern              REPL on a terminal, line-by-line evaluation on a pipe

mod repl;

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use fern_lang::error::FernError;
use fern_lang::evaluator::environment::Environment;
use fern_lang::evaluator::object::Value;

/// fern - a small, expression-oriented scripting language
#[derive(Parser, Debug)]
#[command(name = "fern")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The script file to run; reads stdin when omitted
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match &args.script {
        Some(path) => run_file(path),
        None => {
            if io::stdin().is_terminal() {
                repl::start()
            } else {
                repl::run_piped()
            }
        }
    }
}

/// Read, parse and evaluate a whole file; print the final value unless the
/// program produced none.
fn run_file(path: &Path) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error reading file {:?}: {}", path, error);
            return ExitCode::from(1);
        }
    };

    let env = Environment::new();
    match fern_lang::interpret(&source, &env) {
        Ok(value) => {
            if !matches!(value, Value::Void) {
                println!("{}", value.inspect());
            }
            ExitCode::SUCCESS
        }
        Err(FernError::Parse(errors)) => {
            for error in errors {
                eprintln!("\t{}", error);
            }
            ExitCode::from(1)
        }
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args_with_script() {
        let args = Args::try_parse_from(["fern", "script.fern"]).unwrap();
        assert_eq!(args.script, Some(PathBuf::from("script.fern")));
    }

    #[test]
    fn parse_args_without_script() {
        let args = Args::try_parse_from(["fern"]).unwrap();
        assert_eq!(args.script, None);
    }

    #[test]
    fn parse_args_rejects_extra_positionals() {
        assert!(Args::try_parse_from(["fern", "a.fern", "b.fern"]).is_err());
    }
}
