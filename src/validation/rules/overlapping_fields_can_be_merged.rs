//! `OverlappingFieldsCanBeMerged`: fields sharing a response key within the same selection set
//! must be mergeable — same underlying field name, same arguments.
//!
//! A deliberate simplification: compares sibling fields pairwise within a single selection set
//! level, flattening fragment spreads into that level, rather than expanding the full
//! fragment-spread cross product (see DESIGN.md).

use std::collections::HashSet;

use crate::ast::{Field, FragmentSpread, Selection, SourcePosition, Value};
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

struct Entry {
    response_key: String,
    field_name: String,
    arguments: Vec<(String, Value)>,
    location: SourcePosition,
}

#[derive(Default)]
pub struct OverlappingFieldsCanBeMerged {
    frames: Vec<Vec<Entry>>,
}

impl Visitor for OverlappingFieldsCanBeMerged {
    fn enter_selection_set(&mut self, _ctx: &mut ValidatorContext<'_>) {
        self.frames.push(Vec::new());
    }

    fn enter_field(&mut self, _ctx: &mut ValidatorContext<'_>, field: &Field) {
        let Some(frame) = self.frames.last_mut() else { return };
        frame.push(entry_for(field));
    }

    fn enter_fragment_spread(&mut self, ctx: &mut ValidatorContext<'_>, spread: &FragmentSpread) {
        let Some(frag) = ctx.fragment(&spread.name.item) else { return };
        let mut visited = HashSet::new();
        visited.insert(spread.name.item.clone());
        let mut collected = Vec::new();
        collect_entries(ctx, &frag.selection_set, &mut visited, &mut collected);
        if let Some(frame) = self.frames.last_mut() {
            frame.extend(collected);
        }
    }

    fn exit_selection_set(&mut self, ctx: &mut ValidatorContext<'_>) {
        let Some(frame) = self.frames.pop() else { return };
        for i in 0..frame.len() {
            for j in (i + 1)..frame.len() {
                let a = &frame[i];
                let b = &frame[j];
                if a.response_key != b.response_key {
                    continue;
                }
                if a.field_name != b.field_name {
                    ctx.report_error(
                        format!(
                            "Fields \"{}\" conflict because {} and {} are different fields.",
                            a.response_key, a.field_name, b.field_name
                        ),
                        vec![a.location, b.location],
                    );
                } else if a.arguments != b.arguments {
                    ctx.report_error(
                        format!("Fields \"{}\" conflict because they have differing arguments.", a.response_key),
                        vec![a.location, b.location],
                    );
                }
            }
        }
    }
}

fn entry_for(field: &Field) -> Entry {
    Entry {
        response_key: field.response_key().to_string(),
        field_name: field.name.item.clone(),
        arguments: field.arguments.iter().map(|(n, v)| (n.item.clone(), v.item.clone())).collect(),
        location: field.name.start,
    }
}

/// Flattens fields reachable from `selections` one level deep, following inline fragments and
/// (cycle-guarded) named fragment spreads, without descending into any field's own
/// sub-selection.
fn collect_entries(ctx: &ValidatorContext<'_>, selections: &[Selection], visited: &mut HashSet<String>, out: &mut Vec<Entry>) {
    for selection in selections {
        match selection {
            Selection::Field(field) => out.push(entry_for(&field.item)),
            Selection::InlineFragment(inline) => collect_entries(ctx, &inline.item.selection_set, visited, out),
            Selection::FragmentSpread(spread) => {
                if !visited.insert(spread.item.name.item.clone()) {
                    continue;
                }
                if let Some(frag) = ctx.fragment(&spread.item.name.item) {
                    collect_entries(ctx, &frag.selection_set, visited, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OverlappingFieldsCanBeMerged;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn non_conflicting_sibling_fields() {
        expect_passes_rule::<OverlappingFieldsCanBeMerged>("{ dog { name nickname } }");
    }

    #[test]
    fn same_field_same_arguments_twice() {
        expect_passes_rule::<OverlappingFieldsCanBeMerged>(
            "{ dog { doesKnowCommand(dogCommand: SIT) doesKnowCommand(dogCommand: SIT) } }",
        );
    }

    #[test]
    fn same_alias_different_arguments_conflict() {
        expect_fails_rule::<OverlappingFieldsCanBeMerged>(
            "{ dog { doesKnowCommand(dogCommand: SIT) doesKnowCommand(dogCommand: HEEL) } }",
            &[(
                "Fields \"doesKnowCommand\" conflict because they have differing arguments.",
                &[(1, 9), (1, 42)],
            )],
        );
    }

    #[test]
    fn conflicting_fields_merged_through_fragment_spreads() {
        expect_fails_rule::<OverlappingFieldsCanBeMerged>(
            "{ dog { ...A ...B } } fragment A on Dog { x: name } fragment B on Dog { x: nickname }",
            &[("Fields \"x\" conflict because name and nickname are different fields.", &[(1, 46), (1, 76)])],
        );
    }
}
