//! `PossibleFragmentSpreads`: a fragment spread (named or inline) is only valid if its type
//! condition overlaps with the type of the scope it's spread into.

use crate::ast::{FragmentSpread, InlineFragment};
use crate::schema::meta::MetaType;
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct PossibleFragmentSpreads;

impl Visitor for PossibleFragmentSpreads {
    fn enter_fragment_spread(&mut self, ctx: &mut ValidatorContext<'_>, spread: &FragmentSpread) {
        let Some(parent) = ctx.current_type() else { return };
        let Some(frag) = ctx.fragment(&spread.name.item) else { return };
        let Some(frag_type) = ctx.schema.type_by_name(&frag.type_condition.item) else { return };
        if !overlaps(ctx, parent, frag_type) {
            ctx.report_error(
                format!(
                    "Fragment \"{}\" cannot be spread here as objects of type \"{}\" can never be of type \"{}\".",
                    spread.name.item, parent.name(), frag_type.name()
                ),
                vec![spread.name.start],
            );
        }
    }

    fn enter_inline_fragment(&mut self, ctx: &mut ValidatorContext<'_>, inline: &InlineFragment) {
        let Some(cond) = &inline.type_condition else { return };
        let Some(parent) = ctx.current_type() else { return };
        let Some(frag_type) = ctx.schema.type_by_name(&cond.item) else { return };
        if !overlaps(ctx, parent, frag_type) {
            ctx.report_error(
                format!(
                    "Fragment cannot be spread here as objects of type \"{}\" can never be of type \"{}\".",
                    parent.name(), frag_type.name()
                ),
                vec![cond.start],
            );
        }
    }
}

fn overlaps(ctx: &ValidatorContext<'_>, parent: &MetaType, frag_type: &MetaType) -> bool {
    let schema = ctx.schema;
    let parent_possible = schema.possible_types(parent.name());
    let frag_possible = schema.possible_types(frag_type.name());
    parent_possible.iter().any(|t| frag_possible.contains(t))
}

#[cfg(test)]
mod tests {
    use super::PossibleFragmentSpreads;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn of_the_same_object() {
        expect_passes_rule::<PossibleFragmentSpreads>(
            "{ dog { ...dogFrag } } fragment dogFrag on Dog { barkVolume }",
        );
    }

    #[test]
    fn on_an_interface_the_object_implements() {
        expect_passes_rule::<PossibleFragmentSpreads>("{ dog { ... on Being { name } } }");
    }

    #[test]
    fn of_a_disjoint_object_type() {
        expect_fails_rule::<PossibleFragmentSpreads>(
            "{ dog { ...catFrag } } fragment catFrag on Cat { meows }",
            &[(
                "Fragment \"catFrag\" cannot be spread here as objects of type \"Dog\" can never be of type \"Cat\".",
                &[(1, 12)],
            )],
        );
    }
}
