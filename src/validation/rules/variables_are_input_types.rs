//! `VariablesAreInputTypes`: a variable's declared type must resolve to a scalar, enum, or
//! input-object type, regardless of `List`/`NonNull` wrapping.

use crate::ast::VariableDefinition;
use crate::schema::meta::TypeRef;
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct VariablesAreInputTypes;

impl Visitor for VariablesAreInputTypes {
    fn enter_variable_definition(&mut self, ctx: &mut ValidatorContext<'_>, var: &VariableDefinition) {
        let type_ref = TypeRef::from_ast(&var.var_type.item);
        let Some(meta) = ctx.schema.type_by_name(type_ref.innermost_name()) else {
            return;
        };
        if !meta.is_input() {
            ctx.report_error(
                format!("Variable \"${}\" cannot be of non-input type \"{type_ref}\".", var.name.item),
                vec![var.var_type.start],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::VariablesAreInputTypes;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn input_types_are_allowed() {
        expect_passes_rule::<VariablesAreInputTypes>("query Foo($a: Int, $b: FurColor, $c: ComplexInput) { dog { name } }");
    }

    #[test]
    fn output_type_is_rejected() {
        expect_fails_rule::<VariablesAreInputTypes>(
            "query Foo($a: Dog) { dog { name } }",
            &[("Variable \"$a\" cannot be of non-input type \"Dog\".", &[(1, 15)])],
        );
    }
}
