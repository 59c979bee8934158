/*
    This module reads the input contract: a production count, the
    productions, then the sentence to parse
*/

use std::fmt::Display;
use std::io::Read;
use std::path::PathBuf;

use crate::error_handling::*;

#[derive(Debug)]
pub enum InputErrorType {
    // The input ends before the production count
    MissingCount,
    // The production count is not a number
    InvalidCount(String),
    // Fewer production lines than announced
    MissingProductions { expected: usize, found: usize },
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for InputErrorType {}

impl PartialEq for InputErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (InputErrorType::FileError(a), InputErrorType::FileError(b)) => a.kind() == b.kind(),
            (InputErrorType::InvalidCount(a), InputErrorType::InvalidCount(b)) => a == b,
            (
                InputErrorType::MissingProductions { expected: e1, found: f1 },
                InputErrorType::MissingProductions { expected: e2, found: f2 }
            ) => e1 == e2 && f1 == f2,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for InputErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputErrorType::MissingCount => write!(f, "Expected the number of productions"),
            InputErrorType::InvalidCount(s) => write!(f, "`{}` is not a number of productions", s),
            InputErrorType::MissingProductions { expected, found } => write!(f, "Expected {} productions, found {}", expected, found),
            InputErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type InputError = Error<InputErrorType>;
pub type InputResult<T> = std::result::Result<T, InputError>;

/// Productions with their locations and the sentence to parse.
#[derive(Debug, PartialEq)]
pub struct Problem {
    pub productions: Vec<(Location, String)>,
    pub sentence: String,
}

fn is_content_line(line: &str) -> bool {
    !line.is_empty() && !line.starts_with(';')
}

pub fn parse_input(text: &str, file: &PathBuf) -> InputResult<Problem> {
    let location = |line| Location::in_file(file.clone(), line);
    let mut lines = text.lines()
        .enumerate()
        .map(|(num, line)| (num + 1, line.trim()))
        .filter(|(_, line)| is_content_line(line));

    let (count_line, count_text) = lines.next()
        .ok_or_else(|| InputError { location: location(0), error: InputErrorType::MissingCount })?;
    let count: usize = count_text.parse()
        .map_err(|_| InputError { location: location(count_line), error: InputErrorType::InvalidCount(count_text.to_string()) })?;

    let productions = lines.by_ref()
        .take(count)
        .map(|(num, line)| (location(num), line.to_string()))
        .collect::<Vec<_>>();
    if productions.len() < count {
        return Err(InputError {
            location: location(0),
            error: InputErrorType::MissingProductions { expected: count, found: productions.len() }
        });
    }

    // A missing sentence line is the empty sentence
    let sentence = lines.next().map(|(_, line)| line.to_string()).unwrap_or_default();

    return Ok(Problem { productions, sentence });
}

// Reads the input contract from a file, or from stdin for `-`
pub fn read_file(path: &PathBuf) -> InputResult<Problem> {
    let io_error = |e| InputError { location: Location::in_file(path.clone(), 0), error: InputErrorType::FileError(e) };

    let mut text = String::new();
    if path.as_os_str() == "-" {
        std::io::stdin().read_to_string(&mut text).map_err(io_error)?;
    } else {
        text = std::fs::read_to_string(path).map_err(io_error)?;
    }

    return parse_input(&text, path);
}
