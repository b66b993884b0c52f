//! Reference lexer/parser turning query text into the [`crate::ast`] model.
//!
//! In a larger deployment document building could be an external collaborator feeding
//! pre-built trees straight to validation and execution, but a working implementation is
//! included here so the validator and executor can be exercised end to end against query text
//! rather than hand-built trees.

mod lexer;
mod parser;

pub use self::{
    lexer::{Lexer, LexerError, Token},
    parser::{ParseError, parse_document},
};

use crate::ast::SourcePosition;

/// Result alias for a spanned parse failure.
pub type ParseResult<T> = Result<T, crate::ast::Spanning<ParseError>>;

pub(crate) fn pos(line: usize, column: usize) -> SourcePosition {
    SourcePosition::new(line, column)
}
