//! `KnownTypeNames`: every type reference in a variable declaration or fragment type
//! condition must resolve against the schema.

use crate::ast::{FragmentDefinition, InlineFragment, VariableDefinition};
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct KnownTypeNames;

impl Visitor for KnownTypeNames {
    fn enter_variable_definition(&mut self, ctx: &mut ValidatorContext<'_>, var: &VariableDefinition) {
        let name = var.var_type.item.innermost_name();
        if ctx.schema.type_by_name(name).is_none() {
            ctx.report_error(format!("Unknown type \"{name}\"."), vec![var.var_type.start]);
        }
    }

    fn enter_fragment_definition(&mut self, ctx: &mut ValidatorContext<'_>, frag: &FragmentDefinition) {
        let name = frag.type_condition.item.as_str();
        if ctx.schema.type_by_name(name).is_none() {
            ctx.report_error(format!("Unknown type \"{name}\"."), vec![frag.type_condition.start]);
        }
    }

    fn enter_inline_fragment(&mut self, ctx: &mut ValidatorContext<'_>, inline: &InlineFragment) {
        if let Some(cond) = &inline.type_condition {
            if ctx.schema.type_by_name(&cond.item).is_none() {
                ctx.report_error(format!("Unknown type \"{}\".", cond.item), vec![cond.start]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::KnownTypeNames;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn known_types_are_valid() {
        expect_passes_rule::<KnownTypeNames>("query ($dog: Dog) { dog { name } }");
    }

    #[test]
    fn unknown_variable_type() {
        expect_fails_rule::<KnownTypeNames>(
            "query ($dog: Doge) { dog { name } }",
            &[("Unknown type \"Doge\".", &[(1, 14)])],
        );
    }

    #[test]
    fn unknown_fragment_type_condition() {
        expect_fails_rule::<KnownTypeNames>(
            "{ dog { ...F } } fragment F on NotInSchema { name }",
            &[("Unknown type \"NotInSchema\".", &[(1, 33)])],
        );
    }
}
