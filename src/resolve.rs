//! Resolver machinery: the seam between the type system and user code.
//!
//! A resolver is a plain async closure, not a derive-macro-bound method: schema construction
//! is a runtime API here (see [`crate::schema::builder`]), so field dispatch is a dynamic
//! lookup by name rather than a compile-time-generated match arm. There is no companion
//! codegen crate generating monomorphic resolver types per field; every field stores the same
//! boxed-future resolver type and is dispatched through it dynamically.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use derive_more::{Display, Error};
use futures::future::BoxFuture;
use indexmap::IndexMap;

use crate::value::Value;

/// An error raised by a resolver. Its `message` is surfaced verbatim in the response.
#[derive(Clone, Debug, Display, Error, PartialEq)]
#[display("{message}")]
pub struct FieldError {
    #[error(not(source))]
    pub message: String,
    pub extensions: Option<Value>,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: None,
        }
    }

    #[must_use]
    pub fn with_extensions(mut self, extensions: Value) -> Self {
        self.extensions = Some(extensions);
        self
    }
}

impl From<String> for FieldError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for FieldError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// What a resolver returns.
pub type FieldResult = Result<Value, FieldError>;

/// A resolver's return type: a boxed future yielding a [`FieldResult`], allowing resolvers to
/// suspend on I/O without the executor ever holding a lock across the call.
pub type FieldFuture = BoxFuture<'static, FieldResult>;

/// Opaque, `Any`-erased per-request user context, threaded unchanged through resolver calls.
pub type UserContext = Arc<dyn Any + Send + Sync>;

/// Everything a resolver needs to produce a value for one field invocation.
pub struct ResolveContext {
    /// The field's declared name (not its alias).
    pub field_name: String,
    /// Coerced argument values, keyed by declared argument name.
    pub arguments: IndexMap<String, Value>,
    /// The resolved value of the parent object.
    pub source: Value,
    /// Request-scoped user context, as passed into [`crate::execute`].
    pub context: UserContext,
}

impl ResolveContext {
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }
}

/// A field resolver: takes the coerced call context, returns a future of the field's value.
pub type Resolver = Arc<dyn Fn(ResolveContext) -> FieldFuture + Send + Sync>;

impl fmt::Debug for ResolveContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveContext")
            .field("field_name", &self.field_name)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Wraps a synchronous function returning a [`FieldResult`] as a [`Resolver`].
pub fn sync_resolver<F>(f: F) -> Resolver
where
    F: Fn(&ResolveContext) -> FieldResult + Send + Sync + 'static,
{
    Arc::new(move |ctx: ResolveContext| {
        let result = f(&ctx);
        Box::pin(async move { result })
    })
}

/// Wraps an async function returning a [`FieldResult`] as a [`Resolver`].
pub fn async_resolver<F, Fut>(f: F) -> Resolver
where
    F: Fn(ResolveContext) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = FieldResult> + Send + 'static,
{
    Arc::new(move |ctx: ResolveContext| Box::pin(f(ctx)) as FieldFuture)
}
