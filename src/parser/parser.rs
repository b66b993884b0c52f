//! Recursive-descent parser building [`crate::ast::Document`] from a [`Token`] stream.

use derive_more::{Display, Error, From};

use super::lexer::{Lexer, LexerError, Token};
use crate::ast::{
    Definition, Directive, Document, Field, FragmentDefinition, FragmentSpread, InlineFragment,
    OperationDefinition, OperationType, Selection, SourcePosition, Spanning, Type,
    Value as AstValue, VariableDefinition,
};

/// An error encountered while parsing a query document.
#[derive(Clone, Debug, Display, Eq, Error, From, PartialEq)]
pub enum ParseError {
    #[display("Unexpected \"{_0}\"")]
    UnexpectedToken(#[error(not(source))] String),
    #[display("Unexpected end of input")]
    UnexpectedEndOfFile,
    #[display("{_0}")]
    Lexer(LexerError),
}

type PResult<T> = Result<T, Spanning<ParseError>>;

struct Parser {
    tokens: Vec<Spanning<Token>>,
    index: usize,
}

/// Parses `source` into a [`Document`], or the first error encountered.
///
/// This is the reference implementation of the "document build API" external collaborator
/// described by the engine's execution contract: parse failures short-circuit validation and
/// execution entirely (§6, §7).
pub fn parse_document(source: &str) -> PResult<Document> {
    let mut tokens = Vec::new();
    for tok in Lexer::new(source) {
        match tok {
            Ok(t) => {
                let is_eof = matches!(t.item, Token::EndOfFile);
                tokens.push(t);
                if is_eof {
                    break;
                }
            }
            Err(e) => return Err(e.map(ParseError::from)),
        }
    }
    if tokens.is_empty() || !matches!(tokens.last().unwrap().item, Token::EndOfFile) {
        let pos = tokens.last().map_or(SourcePosition::new(1, 1), |t| t.end);
        tokens.push(Spanning::new(pos, pos, Token::EndOfFile));
    }

    let mut parser = Parser { tokens, index: 0 };
    parser.parse_document()
}

impl Parser {
    fn peek(&self) -> &Spanning<Token> {
        &self.tokens[self.index]
    }

    fn advance(&mut self) -> Spanning<Token> {
        let tok = self.tokens[self.index].clone();
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        tok
    }

    fn unexpected(&self, tok: &Spanning<Token>) -> Spanning<ParseError> {
        let err = match &tok.item {
            Token::EndOfFile => ParseError::UnexpectedEndOfFile,
            other => ParseError::UnexpectedToken(other.to_string()),
        };
        Spanning::new(tok.start, tok.end, err)
    }

    fn expect(&mut self, expected: &Token) -> PResult<Spanning<Token>> {
        if &self.peek().item == expected {
            Ok(self.advance())
        } else {
            Err(self.unexpected(self.peek()))
        }
    }

    fn expect_name(&mut self) -> PResult<Spanning<String>> {
        match &self.peek().item {
            Token::Name(_) => {
                let tok = self.advance();
                Ok(tok.map(|t| match t {
                    Token::Name(n) => n,
                    _ => unreachable!(),
                }))
            }
            _ => Err(self.unexpected(self.peek())),
        }
    }

    fn peek_name(&self, name: &str) -> bool {
        matches!(&self.peek().item, Token::Name(n) if n == name)
    }

    fn parse_document(&mut self) -> PResult<Document> {
        let mut definitions = Vec::new();
        while !matches!(self.peek().item, Token::EndOfFile) {
            definitions.push(self.parse_definition()?);
        }
        Ok(Document { definitions })
    }

    fn parse_definition(&mut self) -> PResult<Definition> {
        if self.peek_name("fragment") {
            self.parse_fragment_definition()
        } else if self.peek_name("query") || self.peek_name("mutation") || self.peek_name("subscription") {
            self.parse_operation_definition(false)
        } else if matches!(self.peek().item, Token::CurlyOpen) {
            self.parse_operation_definition(true)
        } else {
            Err(self.unexpected(self.peek()))
        }
    }

    fn parse_operation_definition(&mut self, shorthand: bool) -> PResult<Definition> {
        let start = self.peek().start;
        let operation_type = if shorthand {
            OperationType::Query
        } else {
            let name = self.expect_name()?;
            match name.item.as_str() {
                "query" => OperationType::Query,
                "mutation" => OperationType::Mutation,
                "subscription" => OperationType::Subscription,
                _ => {
                    let err = ParseError::UnexpectedToken(name.item.clone());
                    return Err(Spanning::new(name.start, name.end, err));
                }
            }
        };

        let name = if !shorthand && matches!(self.peek().item, Token::Name(_)) {
            Some(self.expect_name()?)
        } else {
            None
        };

        let variable_definitions = if !shorthand && matches!(self.peek().item, Token::ParenOpen) {
            self.parse_variable_definitions()?
        } else {
            Vec::new()
        };

        let directives = self.parse_directives()?;
        let selection_set = self.parse_selection_set()?;
        let end = self.tokens[self.index.saturating_sub(1)].end;

        Ok(Definition::Operation(Spanning::new(
            start,
            end,
            OperationDefinition {
                operation_type,
                name,
                variable_definitions,
                directives,
                selection_set,
            },
        )))
    }

    fn parse_fragment_definition(&mut self) -> PResult<Definition> {
        let start = self.peek().start;
        self.expect_name()?; // "fragment"
        let name = self.expect_name()?;
        self.expect_name_eq("on")?;
        let type_condition = self.expect_name()?;
        let directives = self.parse_directives()?;
        let selection_set = self.parse_selection_set()?;
        let end = self.tokens[self.index.saturating_sub(1)].end;

        Ok(Definition::Fragment(Spanning::new(
            start,
            end,
            FragmentDefinition {
                name,
                type_condition,
                directives,
                selection_set,
            },
        )))
    }

    fn expect_name_eq(&mut self, expected: &str) -> PResult<()> {
        let name = self.expect_name()?;
        if name.item == expected {
            Ok(())
        } else {
            Err(Spanning::new(
                name.start,
                name.end,
                ParseError::UnexpectedToken(name.item),
            ))
        }
    }

    fn parse_variable_definitions(&mut self) -> PResult<Vec<VariableDefinition>> {
        self.expect(&Token::ParenOpen)?;
        let mut defs = Vec::new();
        while !matches!(self.peek().item, Token::ParenClose) {
            self.expect(&Token::Dollar)?;
            let name = self.expect_name()?;
            self.expect(&Token::Colon)?;
            let var_type = self.parse_type()?;
            let default_value = if matches!(self.peek().item, Token::Equals) {
                self.advance();
                Some(self.parse_value()?)
            } else {
                None
            };
            defs.push(VariableDefinition {
                name,
                var_type,
                default_value,
            });
        }
        self.expect(&Token::ParenClose)?;
        Ok(defs)
    }

    fn parse_type(&mut self) -> PResult<Spanning<Type>> {
        let start = self.peek().start;
        let ty = if matches!(self.peek().item, Token::BracketOpen) {
            self.advance();
            let inner = self.parse_type()?;
            self.expect(&Token::BracketClose)?;
            inner.item.wrap_list()
        } else {
            let name = self.expect_name()?;
            Type::named(name.item)
        };
        let ty = if matches!(self.peek().item, Token::ExclamationMark) {
            self.advance();
            ty.wrap_non_null()
        } else {
            ty
        };
        let end = self.tokens[self.index.saturating_sub(1)].end;
        Ok(Spanning::new(start, end, ty))
    }

    fn parse_directives(&mut self) -> PResult<Vec<Spanning<Directive>>> {
        let mut directives = Vec::new();
        while matches!(self.peek().item, Token::At) {
            let start = self.peek().start;
            self.advance();
            let name = self.expect_name()?;
            let arguments = self.parse_arguments()?;
            let end = self.tokens[self.index.saturating_sub(1)].end;
            directives.push(Spanning::new(start, end, Directive { name, arguments }));
        }
        Ok(directives)
    }

    fn parse_arguments(&mut self) -> PResult<Vec<(Spanning<String>, Spanning<AstValue>)>> {
        if !matches!(self.peek().item, Token::ParenOpen) {
            return Ok(Vec::new());
        }
        self.advance();
        let mut args = Vec::new();
        while !matches!(self.peek().item, Token::ParenClose) {
            let name = self.expect_name()?;
            self.expect(&Token::Colon)?;
            let value = self.parse_value()?;
            args.push((name, value));
        }
        self.expect(&Token::ParenClose)?;
        Ok(args)
    }

    fn parse_selection_set(&mut self) -> PResult<Vec<Selection>> {
        self.expect(&Token::CurlyOpen)?;
        let mut selections = Vec::new();
        while !matches!(self.peek().item, Token::CurlyClose) {
            selections.push(self.parse_selection()?);
        }
        self.expect(&Token::CurlyClose)?;
        Ok(selections)
    }

    fn parse_selection(&mut self) -> PResult<Selection> {
        if matches!(self.peek().item, Token::Ellipsis) {
            self.parse_fragment_or_inline()
        } else {
            self.parse_field()
        }
    }

    fn parse_field(&mut self) -> PResult<Selection> {
        let start = self.peek().start;
        let first = self.expect_name()?;
        let (alias, name) = if matches!(self.peek().item, Token::Colon) {
            self.advance();
            (Some(first), self.expect_name()?)
        } else {
            (None, first)
        };
        let arguments = self.parse_arguments()?;
        let directives = self.parse_directives()?;
        let selection_set = if matches!(self.peek().item, Token::CurlyOpen) {
            self.parse_selection_set()?
        } else {
            Vec::new()
        };
        let end = self.tokens[self.index.saturating_sub(1)].end;
        Ok(Selection::Field(Spanning::new(
            start,
            end,
            Field {
                alias,
                name,
                arguments,
                directives,
                selection_set,
            },
        )))
    }

    fn parse_fragment_or_inline(&mut self) -> PResult<Selection> {
        let start = self.peek().start;
        self.advance(); // "..."
        if self.peek_name("on") {
            self.advance();
            let type_condition = Some(self.expect_name()?);
            let directives = self.parse_directives()?;
            let selection_set = self.parse_selection_set()?;
            let end = self.tokens[self.index.saturating_sub(1)].end;
            Ok(Selection::InlineFragment(Spanning::new(
                start,
                end,
                InlineFragment {
                    type_condition,
                    directives,
                    selection_set,
                },
            )))
        } else if matches!(self.peek().item, Token::Name(ref n) if n != "on") {
            let name = self.expect_name()?;
            let directives = self.parse_directives()?;
            let end = self.tokens[self.index.saturating_sub(1)].end;
            Ok(Selection::FragmentSpread(Spanning::new(
                start,
                end,
                FragmentSpread { name, directives },
            )))
        } else {
            // bare inline fragment with no type condition: `...{ ... }`
            let directives = self.parse_directives()?;
            let selection_set = self.parse_selection_set()?;
            let end = self.tokens[self.index.saturating_sub(1)].end;
            Ok(Selection::InlineFragment(Spanning::new(
                start,
                end,
                InlineFragment {
                    type_condition: None,
                    directives,
                    selection_set,
                },
            )))
        }
    }

    fn parse_value(&mut self) -> PResult<Spanning<AstValue>> {
        let start = self.peek().start;
        let tok = self.advance();
        let value = match tok.item {
            Token::Dollar => {
                let name = self.expect_name()?;
                AstValue::Variable(name.item)
            }
            Token::Int(i) => AstValue::Int(i),
            Token::Float(f) => AstValue::Float(f),
            Token::String(s) => AstValue::String(s),
            Token::Name(n) => match n.as_str() {
                "true" => AstValue::Boolean(true),
                "false" => AstValue::Boolean(false),
                "null" => AstValue::Null,
                _ => AstValue::Enum(n),
            },
            Token::BracketOpen => {
                let mut items = Vec::new();
                while !matches!(self.peek().item, Token::BracketClose) {
                    items.push(self.parse_value()?);
                }
                self.expect(&Token::BracketClose)?;
                AstValue::List(items)
            }
            Token::CurlyOpen => {
                let mut fields = Vec::new();
                while !matches!(self.peek().item, Token::CurlyClose) {
                    let name = self.expect_name()?;
                    self.expect(&Token::Colon)?;
                    let value = self.parse_value()?;
                    fields.push((name, value));
                }
                self.expect(&Token::CurlyClose)?;
                AstValue::Object(fields)
            }
            other => {
                return Err(Spanning::new(
                    tok.start,
                    tok.end,
                    ParseError::UnexpectedToken(other.to_string()),
                ));
            }
        };
        let end = self.tokens[self.index.saturating_sub(1)].end;
        Ok(Spanning::new(start, end, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::OperationType;

    #[test]
    fn shorthand_query_with_nested_selection() {
        let doc = parse_document("{ dog { name owner { name } } }").unwrap();
        assert_eq!(doc.definitions.len(), 1);
        let Definition::Operation(op) = &doc.definitions[0] else { panic!("expected operation") };
        assert_eq!(op.item.operation_type, OperationType::Query);
        assert_eq!(op.item.selection_set.len(), 1);
    }

    #[test]
    fn named_mutation_with_variables_and_arguments() {
        let doc = parse_document("mutation Bump($id: ID!) { bump(id: $id) { value } }").unwrap();
        let Definition::Operation(op) = &doc.definitions[0] else { panic!("expected operation") };
        assert_eq!(op.item.operation_type, OperationType::Mutation);
        assert_eq!(op.item.name.as_ref().unwrap().item, "Bump");
        assert_eq!(op.item.variable_definitions.len(), 1);
        assert!(op.item.variable_definitions[0].var_type.item.is_non_null());
    }

    #[test]
    fn fragment_spread_and_inline_fragment_and_alias() {
        let doc = parse_document(
            "{ dog { n: name ...Frag ... on Cat { meows } } } fragment Frag on Dog { nickname }",
        )
        .unwrap();
        assert_eq!(doc.definitions.len(), 2);
        let Definition::Operation(op) = &doc.definitions[0] else { panic!("expected operation") };
        let Selection::Field(field) = &op.item.selection_set[0] else { panic!("expected field") };
        assert_eq!(field.item.selection_set.len(), 3);
        let Selection::Field(first) = &field.item.selection_set[0] else { panic!() };
        assert_eq!(first.item.alias.as_ref().unwrap().item, "n");
        assert!(matches!(field.item.selection_set[1], Selection::FragmentSpread(_)));
        assert!(matches!(field.item.selection_set[2], Selection::InlineFragment(_)));
    }

    #[test]
    fn list_and_object_literal_values() {
        let value = Parser {
            tokens: {
                let mut toks: Vec<_> = Lexer::new(r#"[1, {a: "x", b: null}]"#).map(|t| t.unwrap()).collect();
                toks
            },
            index: 0,
        }
        .parse_value()
        .unwrap();
        let AstValue::List(items) = value.item else { panic!("expected list") };
        assert_eq!(items[0].item, AstValue::Int(1));
        let AstValue::Object(fields) = &items[1].item else { panic!("expected object") };
        assert_eq!(fields[0].1.item, AstValue::String("x".to_string()));
        assert_eq!(fields[1].1.item, AstValue::Null);
    }

    #[test]
    fn unexpected_token_is_reported_with_its_location() {
        let err = parse_document("{ dog( }").unwrap_err();
        assert!(matches!(err.item, ParseError::UnexpectedToken(_)));
    }

    #[test]
    fn unterminated_document_is_unexpected_end_of_file() {
        let err = parse_document("{ dog").unwrap_err();
        assert_eq!(err.item, ParseError::UnexpectedEndOfFile);
    }
}
