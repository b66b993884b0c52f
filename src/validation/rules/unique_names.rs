//! Duplicate-name detection rules: `UniqueArgumentNames`, `UniqueVariableNames`,
//! `UniqueInputFieldNames`, `UniqueDirectivesPerLocation`, `UniqueFragmentNames`, and
//! `UniqueOperationNames`. Every violation reports both the first and the duplicate
//! occurrence's locations.

use std::collections::HashMap;

use crate::ast::{Directive, Field, OperationDefinition, Value};
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

fn check_duplicates(ctx: &mut ValidatorContext<'_>, kind: &str, entries: impl Iterator<Item = (String, crate::ast::SourcePosition)>) {
    let mut seen: HashMap<String, crate::ast::SourcePosition> = HashMap::new();
    for (name, loc) in entries {
        if let Some(&first) = seen.get(&name) {
            ctx.report_error(format!("There can be only one {kind} named \"{name}\"."), vec![first, loc]);
        } else {
            seen.insert(name, loc);
        }
    }
}

#[derive(Default)]
pub struct UniqueArgumentNames;

impl Visitor for UniqueArgumentNames {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'_>, field: &Field) {
        check_duplicates(ctx, "argument", field.arguments.iter().map(|(n, _)| (n.item.clone(), n.start)));
    }
    fn enter_directive(&mut self, ctx: &mut ValidatorContext<'_>, directive: &Directive) {
        check_duplicates(ctx, "argument", directive.arguments.iter().map(|(n, _)| (n.item.clone(), n.start)));
    }
}

#[derive(Default)]
pub struct UniqueVariableNames;

impl Visitor for UniqueVariableNames {
    fn enter_operation_definition(&mut self, ctx: &mut ValidatorContext<'_>, op: &OperationDefinition) {
        check_duplicates(
            ctx,
            "variable",
            op.variable_definitions.iter().map(|v| (v.name.item.clone(), v.name.start)),
        );
    }
}

#[derive(Default)]
pub struct UniqueInputFieldNames;

impl Visitor for UniqueInputFieldNames {
    fn enter_argument(&mut self, ctx: &mut ValidatorContext<'_>, _name: &str, value: &Value, _location: crate::ast::SourcePosition) {
        check_input_object(ctx, value);
    }
}

fn check_input_object(ctx: &mut ValidatorContext<'_>, value: &Value) {
    match value {
        Value::Object(fields) => {
            check_duplicates(ctx, "input field", fields.iter().map(|(n, _)| (n.item.clone(), n.start)));
            for (_, v) in fields {
                check_input_object(ctx, &v.item);
            }
        }
        Value::List(items) => {
            for item in items {
                check_input_object(ctx, &item.item);
            }
        }
        _ => {}
    }
}

#[derive(Default)]
pub struct UniqueDirectivesPerLocation {
    stack: Vec<Vec<(String, crate::ast::SourcePosition)>>,
}

impl UniqueDirectivesPerLocation {
    fn flush(&mut self, ctx: &mut ValidatorContext<'_>) {
        if let Some(entries) = self.stack.pop() {
            check_duplicates(ctx, "directive", entries.into_iter());
        }
    }
}

impl Visitor for UniqueDirectivesPerLocation {
    fn enter_field(&mut self, _ctx: &mut ValidatorContext<'_>, field: &Field) {
        self.stack.push(field.directives.iter().map(|d| (d.item.name.item.clone(), d.item.name.start)).collect());
    }
    fn exit_field(&mut self, ctx: &mut ValidatorContext<'_>, _field: &Field) {
        self.flush(ctx);
    }
    fn enter_fragment_spread(&mut self, _ctx: &mut ValidatorContext<'_>, spread: &crate::ast::FragmentSpread) {
        self.stack.push(spread.directives.iter().map(|d| (d.item.name.item.clone(), d.item.name.start)).collect());
    }
    fn exit_fragment_spread(&mut self, ctx: &mut ValidatorContext<'_>, _spread: &crate::ast::FragmentSpread) {
        self.flush(ctx);
    }
    fn enter_inline_fragment(&mut self, _ctx: &mut ValidatorContext<'_>, inline: &crate::ast::InlineFragment) {
        self.stack.push(inline.directives.iter().map(|d| (d.item.name.item.clone(), d.item.name.start)).collect());
    }
    fn exit_inline_fragment(&mut self, ctx: &mut ValidatorContext<'_>, _inline: &crate::ast::InlineFragment) {
        self.flush(ctx);
    }
    fn enter_operation_definition(&mut self, _ctx: &mut ValidatorContext<'_>, op: &OperationDefinition) {
        self.stack.push(op.directives.iter().map(|d| (d.item.name.item.clone(), d.item.name.start)).collect());
    }
    fn exit_operation_definition(&mut self, ctx: &mut ValidatorContext<'_>, _op: &OperationDefinition) {
        self.flush(ctx);
    }
    fn enter_fragment_definition(&mut self, _ctx: &mut ValidatorContext<'_>, frag: &crate::ast::FragmentDefinition) {
        self.stack.push(frag.directives.iter().map(|d| (d.item.name.item.clone(), d.item.name.start)).collect());
    }
    fn exit_fragment_definition(&mut self, ctx: &mut ValidatorContext<'_>, _frag: &crate::ast::FragmentDefinition) {
        self.flush(ctx);
    }
}

#[derive(Default)]
pub struct UniqueFragmentNames;

impl Visitor for UniqueFragmentNames {
    fn enter_document(&mut self, ctx: &mut ValidatorContext<'_>) {
        check_duplicates(
            ctx,
            "fragment",
            ctx.document.fragments().map(|f| (f.item.name.item.clone(), f.item.name.start)).collect::<Vec<_>>().into_iter(),
        );
    }
}

#[derive(Default)]
pub struct UniqueOperationNames;

impl Visitor for UniqueOperationNames {
    fn enter_document(&mut self, ctx: &mut ValidatorContext<'_>) {
        check_duplicates(
            ctx,
            "operation",
            ctx.document
                .operations()
                .filter_map(|op| op.item.name.as_ref().map(|n| (n.item.clone(), n.start)))
                .collect::<Vec<_>>()
                .into_iter(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{UniqueArgumentNames, UniqueDirectivesPerLocation, UniqueFragmentNames, UniqueInputFieldNames, UniqueOperationNames, UniqueVariableNames};
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn no_duplicate_arguments() {
        expect_passes_rule::<UniqueArgumentNames>("{ dog { isAtLocation(x: 1, y: 2) } }");
    }

    #[test]
    fn duplicate_arguments() {
        expect_fails_rule::<UniqueArgumentNames>(
            "{ dog { isAtLocation(x: 1, x: 2) } }",
            &[("There can be only one argument named \"x\".", &[(1, 22), (1, 28)])],
        );
    }

    #[test]
    fn no_duplicate_variables() {
        expect_passes_rule::<UniqueVariableNames>("query Foo($a: Int, $b: Int) { dog { name } }");
    }

    #[test]
    fn duplicate_fragment_names() {
        expect_fails_rule::<UniqueFragmentNames>(
            "fragment A on Dog { name } fragment A on Dog { nickname }",
            &[("There can be only one fragment named \"A\".", &[(1, 10), (1, 37)])],
        );
    }

    #[test]
    fn duplicate_operation_names() {
        expect_fails_rule::<UniqueOperationNames>(
            "query A { dog { name } } query A { cat { name } }",
            &[("There can be only one operation named \"A\".", &[(1, 7), (1, 32)])],
        );
    }

    #[test]
    fn no_duplicate_input_field_names() {
        expect_passes_rule::<UniqueInputFieldNames>(
            "{ complicatedArgs { complexArgField(complexArg: { requiredField: true, intField: 1 }) } }",
        );
    }

    #[test]
    fn no_duplicate_directives_per_location() {
        expect_passes_rule::<UniqueDirectivesPerLocation>("{ dog { name @skip(if: true) } }");
    }
}
