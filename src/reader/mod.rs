/*
    This module reads `X->alt1|alt2|...` productions into a grammar
*/

mod lexer;
mod verifier;

use std::fmt::Display;

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;
use verifier::verify_start;

#[derive(Debug, PartialEq, Clone)]
pub enum FormatErrorType {
    // There is no `->` in the line
    MissingArrow,
    // The `->` does not come right after a single-character head
    MisplacedArrow,
    // A marker or `|` is used as a grammar symbol
    ReservedSymbol(char),
    // An alternative with no symbols at all, not even the epsilon marker
    EmptyAlternative,
    // The production list is empty
    NoProductions,
    // The requested start symbol does not occur in the grammar
    UndefinedStart(String),
    // The requested start symbol has no productions
    StartNotNonterminal(String),
    // Somehow a head or an arrow ended up inside an alternative
    // This is a problem with llkit, not the grammar
    UnsplitRule,
}

impl ErrorType for FormatErrorType {}

impl Display for FormatErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatErrorType::MissingArrow => write!(f, "Can not find `->` in production"),
            FormatErrorType::MisplacedArrow => write!(f, "Expected `->` right after a single-character head"),
            FormatErrorType::ReservedSymbol(c) => write!(f, "`{}` is reserved and can not be used as a symbol", c),
            FormatErrorType::EmptyAlternative => write!(f, "Empty alternative (write the epsilon marker instead)"),
            FormatErrorType::NoProductions => write!(f, "No productions given"),
            FormatErrorType::UndefinedStart(s) => write!(f, "Start symbol `{}` does not occur in the grammar", s),
            FormatErrorType::StartNotNonterminal(s) => write!(f, "Start symbol `{}` has no productions", s),
            FormatErrorType::UnsplitRule => write!(f, "Rule was not fully split (this is a problem with llkit, not the grammar)"),
        }
    }
}

pub type FormatError = Error<FormatErrorType>;
pub type FormatErrors = Errors<FormatErrorType>;

pub type Result<T> = std::result::Result<T, FormatErrorType>;
pub type LineResult<T> = std::result::Result<T, FormatError>;
pub type FileResult<T> = std::result::Result<T, FormatErrors>;

#[derive(PartialEq, Debug)]
struct Rule {
    head: char,
    rewrite: Vec<Vec<char>>,
    location: Location
}

// Epsilon markers are dropped: an alternative made only of them is empty
fn parse_alternative(tokens: &[Token]) -> Result<Vec<char>> {
    if tokens.is_empty() {
        return Err(FormatErrorType::EmptyAlternative);
    }

    tokens.iter().filter_map(|t| match t {
        Token::Head(_) | Token::Arrow | Token::Or => Some(Err(FormatErrorType::UnsplitRule)),
        Token::Epsilon => None,
        Token::Symbol(c) => Some(Ok(*c))
    }).collect()
}

fn parse_rewrite(tokens: &[Token]) -> Result<Vec<Vec<char>>> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    let head = match tokens.first() {
        Some(Token::Head(c)) => Ok(*c),
        _ => Err(FormatErrorType::MisplacedArrow)
    }?;

    if tokens.get(1) != Some(&Token::Arrow) {
        return Err(FormatErrorType::MissingArrow)
    }

    let rewrite = parse_rewrite(&tokens[2..])?;

    return Ok(Rule {
        head,
        rewrite,
        location
    });
}

fn parse_lex_line(line: &str, location: Location, markers: Markers) -> LineResult<Rule> {
    lexer::lex_line(line, markers)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| FormatError { location, error })
}

fn grammar_from_rules(rules: Vec<Rule>, start: Option<&str>, origin: Location, markers: Markers) -> FileResult<Grammar> {
    let mut builder = Grammar::builder(markers);
    for rule in rules {
        let alternatives = rule.rewrite.iter()
            .map(|alt| alt.iter().map(char::to_string).collect_vec())
            .collect_vec();
        builder.add_rule(&rule.head.to_string(), &alternatives);
    }

    let start = verify_start(&builder, start)
        .map_err(|error| vec![FormatError { location: origin, error }])?;

    return Ok(builder.build(start));
}

/// Reads productions that already carry their location. Every malformed
/// line is reported; `origin` locates errors about the grammar as a whole.
pub fn read_located<S: AsRef<str>>(
    lines: impl IntoIterator<Item = (Location, S)>,
    start: Option<&str>,
    origin: Location,
    markers: Markers
) -> FileResult<Grammar> {
    let parsed_lines = lines.into_iter()
        .map(|(location, line)| parse_lex_line(line.as_ref().trim(), location, markers));

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if !errors.is_empty() {
        return Err(errors);
    }

    return grammar_from_rules(rules, start, origin, markers);
}

/// Reads an in-memory production list, numbering lines from 1.
#[cfg(test)]
pub fn read_productions<S: AsRef<str>>(lines: &[S], start: Option<&str>, markers: Markers) -> FileResult<Grammar> {
    let located = lines.iter()
        .enumerate()
        .map(|(num, line)| (Location::line(num + 1), line.as_ref()));

    read_located(located, start, Location::line(0), markers)
}
