use itertools::{Itertools, PeekingNext};

use crate::grammar::Markers;
use super::{FormatErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    Head(char),
    Arrow,
    Or,
    Epsilon,
    Symbol(char)
}

// Splits off the single head character. The arrow must come right after it.
pub fn split_head(line: &str) -> Result<(char, &str)> {
    let arrow = line.find("->").ok_or(FormatErrorType::MissingArrow)?;

    match line.chars().next() {
        Some(head) if head.len_utf8() == arrow && !head.is_whitespace() => Ok((head, &line[arrow + 2..])),
        _ => Err(FormatErrorType::MisplacedArrow)
    }
}

pub fn lex_alternative(body: &mut impl PeekingNext<Item = char>, markers: Markers) -> Result<Vec<Token>> {
    body.peeking_take_while(|&c| c != '|')
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            c if c == markers.epsilon => Ok(Token::Epsilon),
            c if c == markers.end => Err(FormatErrorType::ReservedSymbol(c)),
            c => Ok(Token::Symbol(c))
        })
        .collect()
}

pub fn lex_line(line: &str, markers: Markers) -> Result<Vec<Token>> {
    let (head, body) = split_head(line)?;
    if markers.is_reserved(head) {
        return Err(FormatErrorType::ReservedSymbol(head));
    }

    let mut tokens = vec![Token::Head(head), Token::Arrow];
    let mut body_chars = body.chars().peekable();

    loop {
        tokens.extend(lex_alternative(&mut body_chars, markers)?);
        // Consume the separator if there is one
        match body_chars.next() {
            Some('|') => tokens.push(Token::Or),
            _ => break
        }
    }

    return Ok(tokens);
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    #[test]
    fn split_normal_head() {
        assert_eq!(split_head("E->E+T|T"), Ok(('E', "E+T|T")));
        assert_eq!(split_head("S->"), Ok(('S', "")));
        // The first arrow is the separator, later ones are body symbols
        assert_eq!(split_head("S->a->b"), Ok(('S', "a->b")));
    }

    #[test]
    fn split_malformed_head() {
        assert_eq!(split_head("E=E+T"), Err(FormatErrorType::MissingArrow));
        assert_eq!(split_head("EA->a"), Err(FormatErrorType::MisplacedArrow));
        assert_eq!(split_head("->a"), Err(FormatErrorType::MisplacedArrow));
        assert_eq!(split_head(" ->a"), Err(FormatErrorType::MisplacedArrow));
    }

    #[test]
    fn lex_normal_alternative() {
        let lines = vec!["+TA|?", "a b|c", "?"];
        // (tokens from the function, rest of the iterator)
        let answers = vec![
            (vec![Token::Symbol('+'), Token::Symbol('T'), Token::Symbol('A')], "|?"),
            (vec![Token::Symbol('a'), Token::Symbol('b')], "|c"),
            (vec![Token::Epsilon], "")
        ];

        for (line, (answer_tokens, answer_rest)) in zip(lines, answers) {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_alternative(&mut chars, Markers::default()).unwrap(), answer_tokens);
            assert_eq!(chars.collect::<String>(), answer_rest);
        }
    }

    #[test]
    fn lex_normal_line() {
        assert_eq!(lex_line("A->+TA|?", Markers::default()).unwrap(), vec![
            Token::Head('A'),
            Token::Arrow,
            Token::Symbol('+'),
            Token::Symbol('T'),
            Token::Symbol('A'),
            Token::Or,
            Token::Epsilon
        ]);
        assert_eq!(lex_line("S->", Markers::default()).unwrap(), vec![Token::Head('S'), Token::Arrow]);
    }

    #[test]
    fn lex_reserved_symbols() {
        assert_eq!(lex_line("S->a#", Markers::default()), Err(FormatErrorType::ReservedSymbol('#')));
        assert_eq!(lex_line("?->a", Markers::default()), Err(FormatErrorType::ReservedSymbol('?')));
        assert_eq!(lex_line("|->a", Markers::default()), Err(FormatErrorType::ReservedSymbol('|')));

        let markers = Markers { epsilon: 'e', end: '$' };
        assert_eq!(lex_line("S->e|#", markers).unwrap(), vec![
            Token::Head('S'),
            Token::Arrow,
            Token::Epsilon,
            Token::Or,
            Token::Symbol('#')
        ]);
    }
}
