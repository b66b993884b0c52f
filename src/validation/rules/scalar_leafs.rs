//! `ScalarLeafs`: fields whose type is a scalar or enum must not have a sub-selection, and
//! fields whose type is composite must have one.

use crate::ast::Field;
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct ScalarLeafs;

impl Visitor for ScalarLeafs {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'_>, field: &Field) {
        let Some(def) = ctx.parent_type().and_then(|t| t.field(&field.name.item)) else { return };
        let Some(field_type) = ctx.schema.resolve(&def.field_type) else { return };
        let has_selection = !field.selection_set.is_empty();

        if field_type.is_leaf() && has_selection {
            ctx.report_error(
                format!("Field \"{}\" must not have a selection since type \"{}\" has no subfields.", field.name.item, def.field_type),
                vec![field.name.start],
            );
        } else if field_type.is_composite() && !has_selection {
            ctx.report_error(
                format!("Field \"{}\" of type \"{}\" must have a selection of subfields.", field.name.item, def.field_type),
                vec![field.name.start],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScalarLeafs;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn valid_scalar_selection() {
        expect_passes_rule::<ScalarLeafs>("{ dog { barkVolume } }");
    }

    #[test]
    fn object_type_missing_selection() {
        expect_fails_rule::<ScalarLeafs>(
            "{ human }",
            &[("Field \"human\" of type \"Human\" must have a selection of subfields.", &[(1, 3)])],
        );
    }

    #[test]
    fn scalar_selection_not_allowed() {
        expect_fails_rule::<ScalarLeafs>(
            "{ dog { barkVolume { sinceWhen } } }",
            &[("Field \"barkVolume\" must not have a selection since type \"Int\" has no subfields.", &[(1, 9)])],
        );
    }
}
