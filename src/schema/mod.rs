//! The runtime type system: type objects, value coercion, and schema assembly.

pub mod builder;
pub mod meta;
pub mod model;
pub mod scalars;

pub use self::{
    builder::SchemaBuilder,
    meta::{MetaType, TypeRef},
    model::Schema,
};
