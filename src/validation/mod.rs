//! The validator. A single [`visitor::visit`] pass drives every rule in [`rules`]
//! through a [`multi_visitor::MultiVisitor`], collecting diagnostics into a
//! [`context::ValidatorContext`].

pub mod context;
mod multi_visitor;
mod rules;
#[cfg(test)]
mod test_harness;
pub mod traits;
mod visitor;

pub use context::RuleError;

use crate::ast::Document;
use crate::schema::model::Schema;

/// Runs every validation rule over `document` against `schema`, returning every diagnostic
/// collected (empty if the document is valid). Stops early once the first diagnostic lands when
/// `fail_on_first_error` is set.
pub fn validate(schema: &Schema, document: &Document, fail_on_first_error: bool) -> Vec<RuleError> {
    let mut ctx = context::ValidatorContext::new(schema, document, fail_on_first_error);
    let mut multi = multi_visitor::MultiVisitor::new(rules::all_rules());
    visitor::visit(&mut ctx, document, &mut multi);
    ctx.into_errors()
}
