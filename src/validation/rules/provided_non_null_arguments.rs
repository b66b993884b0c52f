//! `ProvidedNonNullArguments`: every `NonNull`-typed argument without a default must be
//! supplied, on both fields and directives.

use crate::ast::{Directive, Field};
use crate::schema::meta::ArgumentDef;
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;
use indexmap::IndexMap;

fn check(ctx: &mut ValidatorContext<'_>, args: &IndexMap<String, ArgumentDef>, provided: &[(crate::ast::Spanning<String>, crate::ast::Spanning<crate::ast::Value>)], loc: crate::ast::SourcePosition, owner: &str) {
    for def in args.values() {
        if !def.arg_type.is_non_null() || def.default_value.is_some() {
            continue;
        }
        let has_value = provided.iter().any(|(n, v)| n.item == def.name && !matches!(v.item, crate::ast::Value::Null));
        if !has_value {
            ctx.report_error(
                format!("Argument \"{}\" of required type \"{}\" was not provided on \"{owner}\".", def.name, def.arg_type),
                vec![loc],
            );
        }
    }
}

#[derive(Default)]
pub struct ProvidedNonNullArguments;

impl Visitor for ProvidedNonNullArguments {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'_>, field: &Field) {
        let Some(def) = ctx.parent_type().and_then(|t| t.field(&field.name.item)) else { return };
        check(ctx, &def.arguments, &field.arguments, field.name.start, &field.name.item);
    }

    fn enter_directive(&mut self, ctx: &mut ValidatorContext<'_>, directive: &Directive) {
        let Some(def) = ctx.schema.directive_by_name(&directive.name.item) else { return };
        check(ctx, &def.arguments, &directive.arguments, directive.name.start, &format!("@{}", directive.name.item));
    }
}

#[cfg(test)]
mod tests {
    use super::ProvidedNonNullArguments;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn required_arguments_provided() {
        expect_passes_rule::<ProvidedNonNullArguments>(
            "{ complicatedArgs { multipleReqs(req1: 1, req2: 2) } }",
        );
    }

    #[test]
    fn missing_required_argument() {
        expect_fails_rule::<ProvidedNonNullArguments>(
            "{ complicatedArgs { multipleReqs(req1: 1) } }",
            &[("Argument \"req2\" of required type \"Int!\" was not provided on \"multipleReqs\".", &[(1, 21)])],
        );
    }

    #[test]
    fn missing_required_directive_argument() {
        expect_fails_rule::<ProvidedNonNullArguments>(
            "{ dog @skip { name } }",
            &[("Argument \"if\" of required type \"Boolean!\" was not provided on \"@skip\".", &[(1, 7)])],
        );
    }
}
