//! Hand-written tokenizer for GraphQL query documents.

use std::{fmt, iter::Peekable, str::CharIndices};

use derive_more::{Display, Error};

use crate::ast::{SourcePosition, Spanning};

/// A single lexical token.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum Token {
    Name(String),
    Int(i64),
    Float(f64),
    String(String),
    ExclamationMark,
    Dollar,
    ParenOpen,
    ParenClose,
    BracketOpen,
    BracketClose,
    CurlyOpen,
    CurlyClose,
    Ellipsis,
    Colon,
    Equals,
    At,
    Pipe,
    Amp,
    EndOfFile,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(n) => write!(f, "{n}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::ExclamationMark => write!(f, "!"),
            Self::Dollar => write!(f, "$"),
            Self::ParenOpen => write!(f, "("),
            Self::ParenClose => write!(f, ")"),
            Self::BracketOpen => write!(f, "["),
            Self::BracketClose => write!(f, "]"),
            Self::CurlyOpen => write!(f, "{{"),
            Self::CurlyClose => write!(f, "}}"),
            Self::Ellipsis => write!(f, "..."),
            Self::Colon => write!(f, ":"),
            Self::Equals => write!(f, "="),
            Self::At => write!(f, "@"),
            Self::Pipe => write!(f, "|"),
            Self::Amp => write!(f, "&"),
            Self::EndOfFile => write!(f, "<EOF>"),
        }
    }
}

/// An error raised while tokenizing the source.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum LexerError {
    #[display("Unknown character \"{_0}\"")]
    UnknownCharacter(#[error(not(source))] char),
    #[display("Unexpected character \"{_0}\"")]
    UnexpectedCharacter(#[error(not(source))] char),
    #[display("Unterminated string literal")]
    UnterminatedString,
    #[display("Invalid character in string literal: \"{_0}\"")]
    UnknownCharacterInString(#[error(not(source))] char),
    #[display("Unknown escape sequence \"{_0}\"")]
    UnknownEscapeSequence(#[error(not(source))] String),
    #[display("Unexpected end of input")]
    UnexpectedEndOfFile,
    #[display("Invalid number literal")]
    InvalidNumber,
}

pub type LexerResult = Result<Spanning<Token>, Spanning<LexerError>>;

/// Tokenizes GraphQL query source, one [`Token`] at a time.
pub struct Lexer<'a> {
    iterator: Peekable<CharIndices<'a>>,
    source: &'a str,
    position: SourcePosition,
    reached_eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            iterator: source.char_indices().peekable(),
            source,
            position: SourcePosition::new(1, 1),
            reached_eof: false,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.iterator.peek().map(|&(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let (_, c) = self.iterator.next()?;
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    fn skip_ignored(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() || c == ',' => {
                    self.advance();
                }
                Some('#') => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_name(&mut self, start: SourcePosition) -> LexerResult {
        let start_idx = self.iterator.peek().map(|&(i, _)| i).unwrap_or(self.source.len());
        let mut end_idx = start_idx;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                end_idx += c.len_utf8();
                self.advance();
            } else {
                break;
            }
        }
        Ok(Spanning::new(
            start,
            self.position,
            Token::Name(self.source[start_idx..end_idx].to_string()),
        ))
    }

    fn read_number(&mut self, start: SourcePosition) -> LexerResult {
        let start_idx = self.iterator.peek().map(|&(i, _)| i).unwrap_or(self.source.len());
        let mut end_idx = start_idx;
        let mut is_float = false;

        if self.peek_char() == Some('-') {
            end_idx += 1;
            self.advance();
        }
        while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
            end_idx += 1;
            self.advance();
        }
        if self.peek_char() == Some('.') {
            is_float = true;
            end_idx += 1;
            self.advance();
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                end_idx += 1;
                self.advance();
            }
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            is_float = true;
            end_idx += 1;
            self.advance();
            if matches!(self.peek_char(), Some('+') | Some('-')) {
                end_idx += 1;
                self.advance();
            }
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                end_idx += 1;
                self.advance();
            }
        }

        let text = &self.source[start_idx..end_idx];
        let token = if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| Spanning::new(start, self.position, LexerError::InvalidNumber))?
        } else {
            text.parse::<i64>()
                .map(Token::Int)
                .map_err(|_| Spanning::new(start, self.position, LexerError::InvalidNumber))?
        };
        Ok(Spanning::new(start, self.position, token))
    }

    fn read_string(&mut self, start: SourcePosition) -> LexerResult {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.advance() {
                None => return Err(Spanning::new(start, self.position, LexerError::UnterminatedString)),
                Some('"') => break,
                Some('\n') => {
                    return Err(Spanning::new(start, self.position, LexerError::UnterminatedString));
                }
                Some('\\') => match self.advance() {
                    Some('"') => value.push('"'),
                    Some('\\') => value.push('\\'),
                    Some('/') => value.push('/'),
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('b') => value.push('\u{8}'),
                    Some('f') => value.push('\u{c}'),
                    Some('u') => {
                        let mut code = String::with_capacity(4);
                        for _ in 0..4 {
                            match self.advance() {
                                Some(c) => code.push(c),
                                None => {
                                    return Err(Spanning::new(
                                        start,
                                        self.position,
                                        LexerError::UnexpectedEndOfFile,
                                    ));
                                }
                            }
                        }
                        let point = u32::from_str_radix(&code, 16).map_err(|_| {
                            Spanning::new(
                                start,
                                self.position,
                                LexerError::UnknownEscapeSequence(format!("\\u{code}")),
                            )
                        })?;
                        let c = char::from_u32(point).ok_or_else(|| {
                            Spanning::new(
                                start,
                                self.position,
                                LexerError::UnknownEscapeSequence(format!("\\u{code}")),
                            )
                        })?;
                        value.push(c);
                    }
                    Some(other) => {
                        return Err(Spanning::new(
                            start,
                            self.position,
                            LexerError::UnknownEscapeSequence(format!("\\{other}")),
                        ));
                    }
                    None => {
                        return Err(Spanning::new(start, self.position, LexerError::UnexpectedEndOfFile));
                    }
                },
                Some(c) if (c as u32) < 0x20 => {
                    return Err(Spanning::new(
                        start,
                        self.position,
                        LexerError::UnknownCharacterInString(c),
                    ));
                }
                Some(c) => value.push(c),
            }
        }
        Ok(Spanning::new(start, self.position, Token::String(value)))
    }

    fn next_token(&mut self) -> LexerResult {
        self.skip_ignored();
        let start = self.position;
        let Some(c) = self.peek_char() else {
            self.reached_eof = true;
            return Ok(Spanning::new(start, start, Token::EndOfFile));
        };

        match c {
            '!' => {
                self.advance();
                Ok(Spanning::new(start, self.position, Token::ExclamationMark))
            }
            '$' => {
                self.advance();
                Ok(Spanning::new(start, self.position, Token::Dollar))
            }
            '(' => {
                self.advance();
                Ok(Spanning::new(start, self.position, Token::ParenOpen))
            }
            ')' => {
                self.advance();
                Ok(Spanning::new(start, self.position, Token::ParenClose))
            }
            '[' => {
                self.advance();
                Ok(Spanning::new(start, self.position, Token::BracketOpen))
            }
            ']' => {
                self.advance();
                Ok(Spanning::new(start, self.position, Token::BracketClose))
            }
            '{' => {
                self.advance();
                Ok(Spanning::new(start, self.position, Token::CurlyOpen))
            }
            '}' => {
                self.advance();
                Ok(Spanning::new(start, self.position, Token::CurlyClose))
            }
            ':' => {
                self.advance();
                Ok(Spanning::new(start, self.position, Token::Colon))
            }
            '=' => {
                self.advance();
                Ok(Spanning::new(start, self.position, Token::Equals))
            }
            '@' => {
                self.advance();
                Ok(Spanning::new(start, self.position, Token::At))
            }
            '|' => {
                self.advance();
                Ok(Spanning::new(start, self.position, Token::Pipe))
            }
            '&' => {
                self.advance();
                Ok(Spanning::new(start, self.position, Token::Amp))
            }
            '.' => {
                self.advance();
                if self.peek_char() == Some('.') {
                    self.advance();
                    if self.peek_char() == Some('.') {
                        self.advance();
                        Ok(Spanning::new(start, self.position, Token::Ellipsis))
                    } else {
                        Err(Spanning::new(start, self.position, LexerError::UnexpectedCharacter('.')))
                    }
                } else {
                    Err(Spanning::new(start, self.position, LexerError::UnexpectedCharacter('.')))
                }
            }
            '"' => self.read_string(start),
            '-' => self.read_number(start),
            c if c.is_ascii_digit() => self.read_number(start),
            c if c.is_alphabetic() || c == '_' => self.read_name(start),
            c => {
                self.advance();
                Err(Spanning::new(start, self.position, LexerError::UnknownCharacter(c)))
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = LexerResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reached_eof {
            return None;
        }
        Some(self.next_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        Lexer::new(source).map(|r| r.unwrap().item).collect()
    }

    #[test]
    fn punctuation_and_names() {
        assert_eq!(
            tokens("{ name(id: $id) }"),
            vec![
                Token::CurlyOpen,
                Token::Name("name".to_string()),
                Token::ParenOpen,
                Token::Name("id".to_string()),
                Token::Colon,
                Token::Dollar,
                Token::Name("id".to_string()),
                Token::ParenClose,
                Token::CurlyClose,
                Token::EndOfFile,
            ]
        );
    }

    #[test]
    fn commas_and_comments_are_ignored_like_whitespace() {
        assert_eq!(
            tokens("a,, # a trailing comment\n b"),
            vec![
                Token::Name("a".to_string()),
                Token::Name("b".to_string()),
                Token::EndOfFile,
            ]
        );
    }

    #[test]
    fn integers_and_floats() {
        assert_eq!(tokens("42"), vec![Token::Int(42), Token::EndOfFile]);
        assert_eq!(tokens("-7"), vec![Token::Int(-7), Token::EndOfFile]);
        assert_eq!(tokens("3.14"), vec![Token::Float(3.14), Token::EndOfFile]);
        assert_eq!(tokens("1e10"), vec![Token::Float(1e10), Token::EndOfFile]);
    }

    #[test]
    fn ellipsis_requires_exactly_three_dots() {
        assert_eq!(tokens("..."), vec![Token::Ellipsis, Token::EndOfFile]);
        assert!(Lexer::new("..").collect::<Vec<_>>().into_iter().any(|r| r.is_err()));
    }

    #[test]
    fn string_literal_with_escapes() {
        assert_eq!(
            tokens(r#""a\n\tA""#),
            vec![Token::String("a\n\tA".to_string()), Token::EndOfFile]
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let result: Vec<_> = Lexer::new("\"abc").collect();
        assert!(matches!(
            result.last(),
            Some(Err(Spanning { item: LexerError::UnterminatedString, .. }))
        ));
    }

    #[test]
    fn tracks_line_and_column_across_newlines() {
        let mut lexer = Lexer::new("a\nbc");
        let first = lexer.next().unwrap().unwrap();
        assert_eq!(first.start, SourcePosition::new(1, 1));
        let second = lexer.next().unwrap().unwrap();
        assert_eq!(second.start, SourcePosition::new(2, 1));
    }

    #[test]
    fn unknown_character_is_an_error() {
        let result: Vec<_> = Lexer::new("%").collect();
        assert!(matches!(
            result[0],
            Err(Spanning { item: LexerError::UnknownCharacter('%'), .. })
        ));
    }
}
