//! `NoUnusedFragments`: every fragment must be reachable from some operation.

use std::collections::HashSet;

use crate::ast::Selection;
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct NoUnusedFragments;

impl Visitor for NoUnusedFragments {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'_>) {
        let mut reachable = HashSet::new();
        for op in ctx.document.operations() {
            mark_reachable(ctx, &op.item.selection_set, &mut reachable);
        }
        for frag in ctx.document.fragments() {
            let name = frag.item.name.item.as_str();
            if !reachable.contains(name) {
                ctx.report_error(format!("Fragment \"{name}\" is never used."), vec![frag.item.name.start]);
            }
        }
    }
}

fn mark_reachable<'a>(ctx: &ValidatorContext<'a>, selections: &'a [Selection], reachable: &mut HashSet<&'a str>) {
    for selection in selections {
        match selection {
            Selection::Field(field) => mark_reachable(ctx, &field.item.selection_set, reachable),
            Selection::InlineFragment(inline) => mark_reachable(ctx, &inline.item.selection_set, reachable),
            Selection::FragmentSpread(spread) => {
                let name = spread.item.name.item.as_str();
                let Some(frag) = ctx.fragment(name) else { continue };
                if reachable.insert(name) {
                    mark_reachable(ctx, &frag.selection_set, reachable);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NoUnusedFragments;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn all_fragments_used() {
        expect_passes_rule::<NoUnusedFragments>("{ dog { ...used } } fragment used on Dog { name }");
    }

    #[test]
    fn fragment_not_used() {
        expect_fails_rule::<NoUnusedFragments>(
            "{ dog { name } } fragment unused on Dog { name }",
            &[("Fragment \"unused\" is never used.", &[(1, 27)])],
        );
    }
}
