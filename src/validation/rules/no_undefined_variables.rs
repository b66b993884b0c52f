//! `NoUndefinedVariables`: every variable used in an operation, directly or through a
//! fragment spread, must be declared on that operation.

use std::collections::HashSet;

use crate::ast::{OperationDefinition, Selection, Value};
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct NoUndefinedVariables;

impl Visitor for NoUndefinedVariables {
    fn exit_operation_definition(&mut self, ctx: &mut ValidatorContext<'_>, op: &OperationDefinition) {
        let declared: HashSet<&str> = op.variable_definitions.iter().map(|v| v.name.item.as_str()).collect();
        let mut used = Vec::new();
        let mut seen_fragments = HashSet::new();
        collect_used_variables(ctx, &op.selection_set, &mut seen_fragments, &mut used);

        for (name, loc) in used {
            if !declared.contains(name.as_str()) {
                let op_label = op.name.as_ref().map_or_else(String::new, |n| format!(" by operation \"{}\"", n.item));
                ctx.report_error(format!("Variable \"${name}\" is not defined{op_label}."), vec![loc]);
            }
        }
    }
}

fn collect_used_variables(
    ctx: &ValidatorContext<'_>,
    selections: &[Selection],
    seen_fragments: &mut HashSet<String>,
    out: &mut Vec<(String, crate::ast::SourcePosition)>,
) {
    for selection in selections {
        match selection {
            Selection::Field(field) => {
                for (_, v) in &field.item.arguments {
                    collect_value_variables(&v.item, v.start, out);
                }
                collect_used_variables(ctx, &field.item.selection_set, seen_fragments, out);
            }
            Selection::InlineFragment(inline) => {
                collect_used_variables(ctx, &inline.item.selection_set, seen_fragments, out);
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.item.name.item.as_str();
                let Some(frag) = ctx.fragment(name) else { continue };
                if !seen_fragments.insert(name.to_string()) {
                    continue;
                }
                collect_used_variables(ctx, &frag.selection_set, seen_fragments, out);
            }
        }
    }
}

fn collect_value_variables(value: &Value, loc: crate::ast::SourcePosition, out: &mut Vec<(String, crate::ast::SourcePosition)>) {
    match value {
        Value::Variable(name) => out.push((name.clone(), loc)),
        Value::List(items) => {
            for item in items {
                collect_value_variables(&item.item, item.start, out);
            }
        }
        Value::Object(fields) => {
            for (_, v) in fields {
                collect_value_variables(&v.item, v.start, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::NoUndefinedVariables;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn all_variables_defined() {
        expect_passes_rule::<NoUndefinedVariables>(
            "query Foo($a: Int) { dog { isAtLocation(x: $a, y: $a) } }",
        );
    }

    #[test]
    fn variable_not_defined() {
        expect_fails_rule::<NoUndefinedVariables>(
            "query Foo($a: Int) { dog { isAtLocation(x: $a, y: $b) } }",
            &[("Variable \"$b\" is not defined by operation \"Foo\".", &[(1, 51)])],
        );
    }
}
