//! The `Visitor` capability: every rule implements this trait, and a single traversal
//! (`visitor::visit`) drives all of them in one pass over the document.

use crate::ast::{
    Directive, Field, FragmentDefinition, FragmentSpread, InlineFragment, OperationDefinition, SourcePosition, Value,
    VariableDefinition,
};
use crate::validation::context::ValidatorContext;

/// No-op default methods: a rule overrides only the hooks it cares about.
#[allow(unused_variables, reason = "default hooks are intentionally empty")]
pub trait Visitor {
    fn enter_operation_definition(&mut self, ctx: &mut ValidatorContext<'_>, op: &OperationDefinition) {}
    fn exit_operation_definition(&mut self, ctx: &mut ValidatorContext<'_>, op: &OperationDefinition) {}

    fn enter_fragment_definition(&mut self, ctx: &mut ValidatorContext<'_>, frag: &FragmentDefinition) {}
    fn exit_fragment_definition(&mut self, ctx: &mut ValidatorContext<'_>, frag: &FragmentDefinition) {}

    fn enter_variable_definition(&mut self, ctx: &mut ValidatorContext<'_>, var: &VariableDefinition) {}
    fn exit_variable_definition(&mut self, ctx: &mut ValidatorContext<'_>, var: &VariableDefinition) {}

    fn enter_directive(&mut self, ctx: &mut ValidatorContext<'_>, directive: &Directive) {}
    fn exit_directive(&mut self, ctx: &mut ValidatorContext<'_>, directive: &Directive) {}

    fn enter_field(&mut self, ctx: &mut ValidatorContext<'_>, field: &Field) {}
    fn exit_field(&mut self, ctx: &mut ValidatorContext<'_>, field: &Field) {}

    fn enter_fragment_spread(&mut self, ctx: &mut ValidatorContext<'_>, spread: &FragmentSpread) {}
    fn exit_fragment_spread(&mut self, ctx: &mut ValidatorContext<'_>, spread: &FragmentSpread) {}

    fn enter_inline_fragment(&mut self, ctx: &mut ValidatorContext<'_>, inline: &InlineFragment) {}
    fn exit_inline_fragment(&mut self, ctx: &mut ValidatorContext<'_>, inline: &InlineFragment) {}

    fn enter_argument(&mut self, ctx: &mut ValidatorContext<'_>, name: &str, value: &Value, location: SourcePosition) {}
    fn exit_argument(&mut self, ctx: &mut ValidatorContext<'_>, name: &str, value: &Value, location: SourcePosition) {}

    fn enter_selection_set(&mut self, ctx: &mut ValidatorContext<'_>) {}
    fn exit_selection_set(&mut self, ctx: &mut ValidatorContext<'_>) {}

    fn enter_document(&mut self, ctx: &mut ValidatorContext<'_>) {}
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'_>) {}
}
