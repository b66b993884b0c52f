//! `KnownDirectivesInAllowedLocations`: a directive must be declared and used only where its
//! schema definition permits.
//!
//! Location is threaded via a small stack pushed by the enter hooks that can carry a
//! directive (field, fragment spread, inline fragment, fragment definition, operation).

use crate::ast::{Directive, Field, FragmentDefinition, FragmentSpread, InlineFragment, OperationDefinition, OperationType};
use crate::schema::model::DirectiveLocation;
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct KnownDirectivesInAllowedLocations {
    location_stack: Vec<DirectiveLocation>,
}

impl Visitor for KnownDirectivesInAllowedLocations {
    fn enter_operation_definition(&mut self, _ctx: &mut ValidatorContext<'_>, op: &OperationDefinition) {
        self.location_stack.push(match op.operation_type {
            OperationType::Query => DirectiveLocation::Query,
            OperationType::Mutation => DirectiveLocation::Mutation,
            OperationType::Subscription => DirectiveLocation::Subscription,
        });
    }
    fn exit_operation_definition(&mut self, _ctx: &mut ValidatorContext<'_>, _op: &OperationDefinition) {
        self.location_stack.pop();
    }

    fn enter_fragment_definition(&mut self, _ctx: &mut ValidatorContext<'_>, _frag: &FragmentDefinition) {
        self.location_stack.push(DirectiveLocation::FragmentDefinition);
    }
    fn exit_fragment_definition(&mut self, _ctx: &mut ValidatorContext<'_>, _frag: &FragmentDefinition) {
        self.location_stack.pop();
    }

    fn enter_field(&mut self, _ctx: &mut ValidatorContext<'_>, _field: &Field) {
        self.location_stack.push(DirectiveLocation::Field);
    }
    fn exit_field(&mut self, _ctx: &mut ValidatorContext<'_>, _field: &Field) {
        self.location_stack.pop();
    }

    fn enter_fragment_spread(&mut self, _ctx: &mut ValidatorContext<'_>, _spread: &FragmentSpread) {
        self.location_stack.push(DirectiveLocation::FragmentSpread);
    }
    fn exit_fragment_spread(&mut self, _ctx: &mut ValidatorContext<'_>, _spread: &FragmentSpread) {
        self.location_stack.pop();
    }

    fn enter_inline_fragment(&mut self, _ctx: &mut ValidatorContext<'_>, _inline: &InlineFragment) {
        self.location_stack.push(DirectiveLocation::InlineFragment);
    }
    fn exit_inline_fragment(&mut self, _ctx: &mut ValidatorContext<'_>, _inline: &InlineFragment) {
        self.location_stack.pop();
    }

    fn enter_directive(&mut self, ctx: &mut ValidatorContext<'_>, directive: &Directive) {
        let name = directive.name.item.as_str();
        let Some(def) = ctx.schema.directive_by_name(name) else {
            ctx.report_error(format!("Unknown directive \"@{name}\"."), vec![directive.name.start]);
            return;
        };
        let Some(&current) = self.location_stack.last() else { return };
        if !def.locations.contains(&current) {
            ctx.report_error(
                format!("Directive \"@{name}\" may not be used here."),
                vec![directive.name.start],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::KnownDirectivesInAllowedLocations;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn skip_on_field_is_allowed() {
        expect_passes_rule::<KnownDirectivesInAllowedLocations>("{ dog { name @skip(if: true) } }");
    }

    #[test]
    fn unknown_directive() {
        expect_fails_rule::<KnownDirectivesInAllowedLocations>(
            "{ dog @bogus { name } }",
            &[("Unknown directive \"@bogus\".", &[(1, 7)])],
        );
    }

    #[test]
    fn directive_in_wrong_location() {
        expect_fails_rule::<KnownDirectivesInAllowedLocations>(
            "query @skip(if: true) { dog { name } }",
            &[("Directive \"@skip\" may not be used here.", &[(1, 7)])],
        );
    }
}
