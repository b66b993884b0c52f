//! `NoUnusedVariables`: every variable declared on an operation must be used, directly or
//! through a fragment spread.

use std::collections::HashSet;

use crate::ast::{OperationDefinition, Selection, Value};
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct NoUnusedVariables;

impl Visitor for NoUnusedVariables {
    fn exit_operation_definition(&mut self, ctx: &mut ValidatorContext<'_>, op: &OperationDefinition) {
        let mut used = HashSet::new();
        let mut seen_fragments = HashSet::new();
        collect_used(ctx, &op.selection_set, &mut seen_fragments, &mut used);

        for var_def in &op.variable_definitions {
            if !used.contains(&var_def.name.item) {
                let op_label = op.name.as_ref().map_or_else(String::new, |n| format!(" by operation \"{}\"", n.item));
                ctx.report_error(
                    format!("Variable \"${}\" is never used{op_label}.", var_def.name.item),
                    vec![var_def.name.start],
                );
            }
        }
    }
}

fn collect_used(ctx: &ValidatorContext<'_>, selections: &[Selection], seen_fragments: &mut HashSet<String>, out: &mut HashSet<String>) {
    for selection in selections {
        match selection {
            Selection::Field(field) => {
                for (_, v) in &field.item.arguments {
                    collect_value(&v.item, out);
                }
                collect_used(ctx, &field.item.selection_set, seen_fragments, out);
            }
            Selection::InlineFragment(inline) => {
                collect_used(ctx, &inline.item.selection_set, seen_fragments, out);
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.item.name.item.as_str();
                let Some(frag) = ctx.fragment(name) else { continue };
                if !seen_fragments.insert(name.to_string()) {
                    continue;
                }
                collect_used(ctx, &frag.selection_set, seen_fragments, out);
            }
        }
    }
}

fn collect_value(value: &Value, out: &mut HashSet<String>) {
    match value {
        Value::Variable(name) => {
            out.insert(name.clone());
        }
        Value::List(items) => items.iter().for_each(|v| collect_value(&v.item, out)),
        Value::Object(fields) => fields.iter().for_each(|(_, v)| collect_value(&v.item, out)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::NoUnusedVariables;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn all_variables_used() {
        expect_passes_rule::<NoUnusedVariables>("query Foo($a: Int) { dog { isAtLocation(x: $a, y: $a) } }");
    }

    #[test]
    fn multiple_variables_not_all_used() {
        expect_fails_rule::<NoUnusedVariables>(
            "query Foo($a: String, $b: String, $c: String) { field(b: $b) }",
            &[
                ("Variable \"$a\" is never used by operation \"Foo\".", &[(1, 12)]),
                ("Variable \"$c\" is never used by operation \"Foo\".", &[(1, 36)]),
            ],
        );
    }
}
