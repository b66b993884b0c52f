//! `KnownArgumentNames`: field and directive arguments must be declared.

use crate::ast::{Directive, Field};
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct KnownArgumentNames;

impl Visitor for KnownArgumentNames {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'_>, field: &Field) {
        let Some(def) = ctx.parent_type().and_then(|t| t.field(&field.name.item)) else { return };
        for (name, _) in &field.arguments {
            if !def.arguments.contains_key(&name.item) {
                ctx.report_error(
                    format!("Unknown argument \"{}\" on field \"{}\".", name.item, field.name.item),
                    vec![name.start],
                );
            }
        }
    }

    fn enter_directive(&mut self, ctx: &mut ValidatorContext<'_>, directive: &Directive) {
        let Some(def) = ctx.schema.directive_by_name(&directive.name.item) else { return };
        for (name, _) in &directive.arguments {
            if !def.arguments.contains_key(&name.item) {
                ctx.report_error(
                    format!("Unknown argument \"{}\" on directive \"@{}\".", name.item, directive.name.item),
                    vec![name.start],
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::KnownArgumentNames;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn single_known_argument() {
        expect_passes_rule::<KnownArgumentNames>("{ dog { isHousetrained(atOtherHomes: true) } }");
    }

    #[test]
    fn unknown_field_argument() {
        expect_fails_rule::<KnownArgumentNames>(
            "{ dog { isHousetrained(unknown: true) } }",
            &[("Unknown argument \"unknown\" on field \"isHousetrained\".", &[(1, 25)])],
        );
    }

    #[test]
    fn unknown_directive_argument() {
        expect_fails_rule::<KnownArgumentNames>(
            "{ dog @skip(unknown: true) { name } }",
            &[("Unknown argument \"unknown\" on directive \"@skip\".", &[(1, 13)])],
        );
    }
}
