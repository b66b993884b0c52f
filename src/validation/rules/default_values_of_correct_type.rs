//! `DefaultValuesOfCorrectType`: a variable's default value literal must match its declared
//! type, and `NonNull` variables may not declare a default at all.

use crate::ast::{Value, VariableDefinition};
use crate::schema::meta::TypeRef;
use crate::schema::model::Schema;
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct DefaultValuesOfCorrectType;

impl Visitor for DefaultValuesOfCorrectType {
    fn enter_variable_definition(&mut self, ctx: &mut ValidatorContext<'_>, var: &VariableDefinition) {
        let Some(default) = &var.default_value else { return };
        let type_ref = TypeRef::from_ast(&var.var_type.item);

        if type_ref.is_non_null() {
            ctx.report_error(
                format!(
                    "Variable \"${}\" of type \"{type_ref}\" is required and will never use the default value.",
                    var.name.item
                ),
                vec![default.start],
            );
            return;
        }

        if let Some(detail) = check(ctx.schema, &type_ref, &default.item, 0) {
            ctx.report_error(
                format!(
                    "Variable \"${}\" of type \"{type_ref}\" has invalid default value {}.\n{detail}",
                    var.name.item, default.item
                ),
                vec![default.start],
            );
        }
    }
}

/// Returns `Some(detail)` describing the mismatch, or `None` if `value` matches `type_ref`.
/// `element` is 1-based and only rendered for nested list elements.
fn check(schema: &Schema, type_ref: &TypeRef, value: &Value, element: usize) -> Option<String> {
    let describe = |v: &Value| format!("Expected type '{type_ref}', found {v}.");

    match type_ref {
        TypeRef::NonNull(inner) => check(schema, inner, value, element),
        TypeRef::List(inner) => match value {
            Value::Null => None,
            Value::List(items) => items.iter().enumerate().find_map(|(i, v)| {
                check(schema, inner, &v.item, i + 1).map(|detail| format!("In element #{}: [{detail}]", i + 1))
            }),
            other => check(schema, inner, other, element),
        },
        TypeRef::Named(name) => {
            if matches!(value, Value::Null) {
                return None;
            }
            match schema.type_by_name(name) {
                Some(crate::schema::meta::MetaType::Scalar(s)) => {
                    if s.can_parse_literal(value) {
                        None
                    } else {
                        Some(describe(value))
                    }
                }
                Some(crate::schema::meta::MetaType::Enum(e)) => match value {
                    Value::Enum(n) if e.value_by_name(n).is_some() => None,
                    _ => Some(describe(value)),
                },
                Some(crate::schema::meta::MetaType::InputObject(o)) => match value {
                    Value::Object(fields) => fields.iter().find_map(|(k, v)| {
                        o.fields.get(&k.item).and_then(|f| check(schema, &f.input_type, &v.item, element))
                    }),
                    _ => Some(describe(value)),
                },
                _ => Some(describe(value)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DefaultValuesOfCorrectType;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn variables_with_valid_default_values() {
        expect_passes_rule::<DefaultValuesOfCorrectType>("query Foo($a: Int = 1, $b: String = \"ok\") { dog { name } }");
    }

    #[test]
    fn non_null_variable_rejects_default() {
        expect_fails_rule::<DefaultValuesOfCorrectType>(
            "query Foo($a: Int! = 1) { dog { name } }",
            &[("Variable \"$a\" of type \"Int!\" is required and will never use the default value.", &[(1, 22)])],
        );
    }

    #[test]
    fn list_element_has_invalid_default_value() {
        expect_fails_rule::<DefaultValuesOfCorrectType>(
            "query Foo($a: [String] = [\"one\", 2]) { dog { name } }",
            &[(
                "Variable \"$a\" of type \"[String]\" has invalid default value [\"one\", 2].\nIn element #2: [Expected type 'String', found 2.]",
                &[(1, 26)],
            )],
        );
    }
}
