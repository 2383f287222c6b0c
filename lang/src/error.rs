//! Unified error handling for fern.
//!
//! In-language failures are `Value::Error` control values and never leave the
//! evaluator; this module covers what can go wrong *around* it (syntax
//! errors collected by the parser, I/O on the source) as one type for
//! embedders and the CLI.

#[cfg(test)]
mod tests;

use std::fmt;
use std::io;

use crate::parser::ParseError;

#[derive(Debug)]
pub enum FernError {
    /// One or more syntax errors collected by the parser.
    Parse(Vec<ParseError>),
    /// The source could not be read.
    Io(io::Error),
}

impl FernError {
    /// Get a short error kind description.
    pub fn kind(&self) -> &'static str {
        match self {
            FernError::Parse(_) => "ParseError",
            FernError::Io(_) => "IoError",
        }
    }
}

impl fmt::Display for FernError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FernError::Parse(errors) => {
                for (i, error) in errors.iter().enumerate() {
                    if i != 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", error)?;
                }
                Ok(())
            }
            FernError::Io(error) => write!(f, "I/O error: {}", error),
        }
    }
}

impl std::error::Error for FernError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FernError::Parse(_) => None,
            FernError::Io(error) => Some(error),
        }
    }
}

impl From<Vec<ParseError>> for FernError {
    fn from(errors: Vec<ParseError>) -> Self {
        FernError::Parse(errors)
    }
}

impl From<io::Error> for FernError {
    fn from(error: io::Error) -> Self {
        FernError::Io(error)
    }
}
