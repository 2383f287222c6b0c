//! Line-based evaluation loops over stdin.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use fern_lang::error::FernError;
use fern_lang::evaluator::environment::Environment;
use fern_lang::evaluator::object::Value;
use fern_lang::evaluator::Env;

const PROMPT: &str = ">> ";

/// The interactive REPL: prompt, read a line, evaluate it in a persistent
/// environment, print any non-void result. EOF ends the session.
pub fn start() -> ExitCode {
    run(true)
}

/// The same loop over piped stdin, without a prompt.
pub fn run_piped() -> ExitCode {
    run(false)
}

fn run(interactive: bool) -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let env: Env = Environment::new();

    loop {
        if interactive {
            print!("{}", PROMPT);
            let _ = stdout.flush();
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return ExitCode::SUCCESS,
            Ok(_) => {}
            Err(error) => {
                eprintln!("I/O error: {}", error);
                return ExitCode::from(1);
            }
        }

        match fern_lang::interpret(&line, &env) {
            Ok(value) => {
                if !matches!(value, Value::Void) {
                    println!("{}", value.inspect());
                }
            }
            // Parse errors report and the loop keeps going.
            Err(FernError::Parse(errors)) => {
                for error in errors {
                    eprintln!("\t{}", error);
                }
            }
            Err(error) => eprintln!("{}", error),
        }
    }
}
