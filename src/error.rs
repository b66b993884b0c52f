//! Diagnostics: error kinds, response paths, and the fail-fast/fatal propagation policy.

use derive_more::{Display, Error, From};
use itertools::Itertools as _;
use serde::Serialize;

use crate::ast::SourcePosition;
use crate::parser::ParseError;
use crate::validation::RuleError;
use crate::value::Value;

/// A segment of a response path: a field name, or the index of a list element.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// The kind of failure behind an [`ExecutionError`] or a fatal [`GraphQLError`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorKind {
    Parse,
    Validation,
    VariableCoercion,
    LiteralCoercion,
    ValueCoercion,
    Serialization,
    Resolver,
    NonNullViolation,
    ListExpected,
    AbstractResolution,
    AmbiguousOperation,
    Canceled,
    Internal,
}

/// An error raised during execution of a single field, carrying the response path it
/// occurred at in addition to its source location.
#[derive(Clone, Debug, Display, Error, PartialEq)]
#[display("{message}")]
pub struct ExecutionError {
    #[error(not(source))]
    pub message: String,
    pub kind: ErrorKind,
    pub path: Vec<PathSegment>,
    pub locations: Vec<SourcePosition>,
    pub extensions: Option<Value>,
}

impl ExecutionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            path: Vec::new(),
            locations: Vec::new(),
            extensions: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = path;
        self
    }

    #[must_use]
    pub fn with_location(mut self, loc: SourcePosition) -> Self {
        self.locations.push(loc);
        self
    }

    #[must_use]
    pub fn with_extensions(mut self, extensions: Option<Value>) -> Self {
        self.extensions = extensions;
        self
    }
}

/// A failure that prevents execution from starting at all: parsing, validation, or variable
/// coercion. These are fatal — no `data` key is produced.
#[derive(Clone, Debug, Display, Error, From, PartialEq)]
pub enum GraphQLError {
    #[display("{_0}")]
    Parse(#[error(not(source))] crate::ast::Spanning<ParseError>),
    #[display("{}", _0.iter().format("; "))]
    Validation(#[error(not(source))] Vec<RuleError>),
    #[display("{}", _0.iter().format("; "))]
    VariableCoercion(#[error(not(source))] Vec<ExecutionError>),
    #[display("No operation named \"{_0}\" found in document")]
    #[from(ignore)]
    UnknownOperationName(#[error(not(source))] String),
    #[display("Document contains multiple operations; an operation name must be given")]
    AmbiguousOperation,
    #[display("Schema does not define a mutation type")]
    MutationRootMissing,
    #[display("Schema does not define a subscription type")]
    SubscriptionRootMissing,
    #[display("Execution was canceled")]
    Canceled,
    #[display("Internal error: {_0}")]
    #[from(ignore)]
    Internal(#[error(not(source))] String),
}

impl From<RuleError> for GraphQLError {
    fn from(value: RuleError) -> Self {
        Self::Validation(vec![value])
    }
}

/// The wire-format error object: `{message, locations?, path?, extensions?}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponseError {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<SourcePosition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl Serialize for SourcePosition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("SourcePosition", 2)?;
        s.serialize_field("line", &self.line)?;
        s.serialize_field("column", &self.column)?;
        s.end()
    }
}

impl From<&ExecutionError> for ResponseError {
    fn from(e: &ExecutionError) -> Self {
        Self {
            message: e.message.clone(),
            locations: e.locations.clone(),
            path: e.path.clone(),
            extensions: e.extensions.clone(),
        }
    }
}

impl From<&RuleError> for ResponseError {
    fn from(e: &RuleError) -> Self {
        Self {
            message: e.message().to_string(),
            locations: e.locations().to_vec(),
            path: Vec::new(),
            extensions: None,
        }
    }
}

/// The top-level result of [`crate::execute`]: `{data?, errors?}`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ResponseError>,
}

impl Response {
    pub fn data_only(data: Value, errors: Vec<ExecutionError>) -> Self {
        Self {
            data: Some(data),
            errors: errors.iter().map(ResponseError::from).collect(),
        }
    }

    pub fn fatal(errors: Vec<ResponseError>) -> Self {
        Self { data: None, errors }
    }
}

impl From<GraphQLError> for Response {
    fn from(err: GraphQLError) -> Self {
        let errors = match err {
            GraphQLError::Parse(e) => vec![ResponseError {
                message: e.item.to_string(),
                locations: vec![e.start],
                path: Vec::new(),
                extensions: None,
            }],
            GraphQLError::Validation(errs) => errs.iter().map(ResponseError::from).collect(),
            GraphQLError::VariableCoercion(errs) => errs.iter().map(ResponseError::from).collect(),
            other => vec![ResponseError {
                message: other.to_string(),
                locations: Vec::new(),
                path: Vec::new(),
                extensions: None,
            }],
        };
        Response::fatal(errors)
    }
}
