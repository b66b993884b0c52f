//! `VariablesInAllowedPosition`: a variable used at some field/directive argument position must
//! be compatible with the type expected there, accounting for default values relaxing
//! `NonNull` requirements.

use std::collections::HashMap;

use crate::ast::{OperationDefinition, SourcePosition, Value};
use crate::schema::meta::TypeRef;
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct VariablesInAllowedPosition {
    declared: HashMap<String, (TypeRef, bool)>,
}

impl Visitor for VariablesInAllowedPosition {
    fn enter_operation_definition(&mut self, _ctx: &mut ValidatorContext<'_>, op: &OperationDefinition) {
        self.declared = op
            .variable_definitions
            .iter()
            .map(|v| (v.name.item.clone(), (TypeRef::from_ast(&v.var_type.item), v.default_value.is_some())))
            .collect();
    }

    fn exit_operation_definition(&mut self, _ctx: &mut ValidatorContext<'_>, _op: &OperationDefinition) {
        self.declared.clear();
    }

    fn enter_argument(&mut self, ctx: &mut ValidatorContext<'_>, _name: &str, value: &Value, location: SourcePosition) {
        let expected = ctx.current_input_type().cloned();
        self.check_value(ctx, value, location, expected);
    }
}

impl VariablesInAllowedPosition {
    fn check_value(&self, ctx: &mut ValidatorContext<'_>, value: &Value, location: SourcePosition, expected: Option<TypeRef>) {
        let Some(expected) = expected else { return };
        match value {
            Value::Variable(name) => {
                let Some((var_type, has_default)) = self.declared.get(name) else { return };
                if !is_compatible(var_type, &expected, *has_default) {
                    ctx.report_error(
                        format!("Variable \"${name}\" of type \"{var_type}\" used in position expecting type \"{expected}\"."),
                        vec![location],
                    );
                }
            }
            Value::List(items) => {
                let inner = expected.unwrap_one().cloned();
                for item in items {
                    self.check_value(ctx, &item.item, item.start, inner.clone());
                }
            }
            Value::Object(fields) => {
                for (_, v) in fields {
                    self.check_value(ctx, &v.item, v.start, None);
                }
            }
            _ => {}
        }
    }
}

/// A variable of type `var_type` may be used where `expected` is required when the effective
/// (default-relaxed) nullability and inner names agree.
fn is_compatible(var_type: &TypeRef, expected: &TypeRef, has_default: bool) -> bool {
    if expected.is_non_null() && !var_type.is_non_null() {
        if !has_default {
            return false;
        }
        let Some(inner_expected) = expected.unwrap_one() else { return false };
        return is_compatible(var_type, inner_expected, false);
    }
    match (var_type, expected) {
        (TypeRef::NonNull(a), TypeRef::NonNull(b)) => is_compatible(a, b, false),
        (TypeRef::NonNull(a), b) => is_compatible(a, b, false),
        (TypeRef::List(a), TypeRef::List(b)) => is_compatible(a, b, false),
        (TypeRef::Named(a), TypeRef::Named(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::VariablesInAllowedPosition;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn compatible_variable_usage() {
        expect_passes_rule::<VariablesInAllowedPosition>(
            "query Foo($a: Int) { complicatedArgs { intArgField(intArg: $a) } }",
        );
    }

    #[test]
    fn nullable_variable_with_default_satisfies_non_null() {
        expect_passes_rule::<VariablesInAllowedPosition>(
            "query Foo($a: Int = 1) { complicatedArgs { nonNullIntArgField(nonNullIntArg: $a) } }",
        );
    }

    #[test]
    fn incompatible_variable_usage() {
        expect_fails_rule::<VariablesInAllowedPosition>(
            "query Foo($a: String) { complicatedArgs { nonNullIntArgField(nonNullIntArg: $a) } }",
            &[("Variable \"$a\" of type \"String\" used in position expecting type \"Int!\".", &[(1, 77)])],
        );
    }
}
