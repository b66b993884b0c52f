//! Combines every rule into a single [`Visitor`], so the traversal driver only ever calls one
//! set of hooks instead of re-walking the document once per rule.

use crate::ast::{
    Directive, Field, FragmentDefinition, FragmentSpread, InlineFragment, OperationDefinition, SourcePosition, Value,
    VariableDefinition,
};
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

pub struct MultiVisitor {
    visitors: Vec<Box<dyn Visitor>>,
}

impl MultiVisitor {
    pub fn new(visitors: Vec<Box<dyn Visitor>>) -> Self {
        Self { visitors }
    }
}

macro_rules! dispatch {
    ($self:ident, $ctx:ident, $method:ident $(, $arg:ident)*) => {
        for visitor in &mut $self.visitors {
            visitor.$method($ctx, $($arg),*);
            if $ctx.should_stop() {
                break;
            }
        }
    };
}

impl Visitor for MultiVisitor {
    fn enter_operation_definition(&mut self, ctx: &mut ValidatorContext<'_>, op: &OperationDefinition) {
        dispatch!(self, ctx, enter_operation_definition, op);
    }
    fn exit_operation_definition(&mut self, ctx: &mut ValidatorContext<'_>, op: &OperationDefinition) {
        dispatch!(self, ctx, exit_operation_definition, op);
    }
    fn enter_fragment_definition(&mut self, ctx: &mut ValidatorContext<'_>, frag: &FragmentDefinition) {
        dispatch!(self, ctx, enter_fragment_definition, frag);
    }
    fn exit_fragment_definition(&mut self, ctx: &mut ValidatorContext<'_>, frag: &FragmentDefinition) {
        dispatch!(self, ctx, exit_fragment_definition, frag);
    }
    fn enter_variable_definition(&mut self, ctx: &mut ValidatorContext<'_>, var: &VariableDefinition) {
        dispatch!(self, ctx, enter_variable_definition, var);
    }
    fn exit_variable_definition(&mut self, ctx: &mut ValidatorContext<'_>, var: &VariableDefinition) {
        dispatch!(self, ctx, exit_variable_definition, var);
    }
    fn enter_directive(&mut self, ctx: &mut ValidatorContext<'_>, directive: &Directive) {
        dispatch!(self, ctx, enter_directive, directive);
    }
    fn exit_directive(&mut self, ctx: &mut ValidatorContext<'_>, directive: &Directive) {
        dispatch!(self, ctx, exit_directive, directive);
    }
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'_>, field: &Field) {
        dispatch!(self, ctx, enter_field, field);
    }
    fn exit_field(&mut self, ctx: &mut ValidatorContext<'_>, field: &Field) {
        dispatch!(self, ctx, exit_field, field);
    }
    fn enter_fragment_spread(&mut self, ctx: &mut ValidatorContext<'_>, spread: &FragmentSpread) {
        dispatch!(self, ctx, enter_fragment_spread, spread);
    }
    fn exit_fragment_spread(&mut self, ctx: &mut ValidatorContext<'_>, spread: &FragmentSpread) {
        dispatch!(self, ctx, exit_fragment_spread, spread);
    }
    fn enter_inline_fragment(&mut self, ctx: &mut ValidatorContext<'_>, inline: &InlineFragment) {
        dispatch!(self, ctx, enter_inline_fragment, inline);
    }
    fn exit_inline_fragment(&mut self, ctx: &mut ValidatorContext<'_>, inline: &InlineFragment) {
        dispatch!(self, ctx, exit_inline_fragment, inline);
    }
    fn enter_argument(&mut self, ctx: &mut ValidatorContext<'_>, name: &str, value: &Value, location: SourcePosition) {
        dispatch!(self, ctx, enter_argument, name, value, location);
    }
    fn exit_argument(&mut self, ctx: &mut ValidatorContext<'_>, name: &str, value: &Value, location: SourcePosition) {
        dispatch!(self, ctx, exit_argument, name, value, location);
    }
    fn enter_selection_set(&mut self, ctx: &mut ValidatorContext<'_>) {
        dispatch!(self, ctx, enter_selection_set);
    }
    fn exit_selection_set(&mut self, ctx: &mut ValidatorContext<'_>) {
        dispatch!(self, ctx, exit_selection_set);
    }
    fn enter_document(&mut self, ctx: &mut ValidatorContext<'_>) {
        dispatch!(self, ctx, enter_document);
    }
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'_>) {
        dispatch!(self, ctx, exit_document);
    }
}
