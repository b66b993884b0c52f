//! `LoneAnonymousOperation`: at most one operation may be anonymous, and only if it is the
//! document's only operation.

use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct LoneAnonymousOperation;

impl Visitor for LoneAnonymousOperation {
    fn enter_document(&mut self, ctx: &mut ValidatorContext<'_>) {
        let operations: Vec<_> = ctx.document.operations().collect();
        if operations.len() <= 1 {
            return;
        }
        for op in &operations {
            if op.item.name.is_none() {
                ctx.report_error(
                    "This anonymous operation must be the only defined operation.",
                    vec![op.start],
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LoneAnonymousOperation;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn single_anonymous_operation() {
        expect_passes_rule::<LoneAnonymousOperation>("{ dog { name } }");
    }

    #[test]
    fn multiple_named_operations() {
        expect_passes_rule::<LoneAnonymousOperation>("query A { dog { name } } query B { cat { name } }");
    }

    #[test]
    fn anonymous_operation_with_another_operation() {
        expect_fails_rule::<LoneAnonymousOperation>(
            "{ dog { name } } query Named { cat { name } }",
            &[("This anonymous operation must be the only defined operation.", &[(1, 1)])],
        );
    }
}
