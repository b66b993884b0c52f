//! `KnownFragmentNames`: every fragment spread must target a defined fragment.

use crate::ast::FragmentSpread;
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct KnownFragmentNames;

impl Visitor for KnownFragmentNames {
    fn enter_fragment_spread(&mut self, ctx: &mut ValidatorContext<'_>, spread: &FragmentSpread) {
        if !ctx.is_known_fragment(&spread.name.item) {
            ctx.report_error(format!("Unknown fragment \"{}\".", spread.name.item), vec![spread.name.start]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::KnownFragmentNames;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn known_fragment_names_are_valid() {
        expect_passes_rule::<KnownFragmentNames>("{ dog { ...dogFields } } fragment dogFields on Dog { name }");
    }

    #[test]
    fn unknown_fragment_names_are_invalid() {
        expect_fails_rule::<KnownFragmentNames>(
            "{ dog { ...missingFields } }",
            &[("Unknown fragment \"missingFields\".", &[(1, 12)])],
        );
    }
}
