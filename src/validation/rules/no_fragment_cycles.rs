//! `NoFragmentCycles`: no fragment may transitively spread itself. A DFS from each fragment
//! definition tracks the spread path; a back-edge to the entry fragment is reported once,
//! naming the intermediate chain.

use std::collections::HashSet;

use crate::ast::{FragmentDefinition, Selection, SourcePosition};
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct NoFragmentCycles;

impl Visitor for NoFragmentCycles {
    fn enter_fragment_definition(&mut self, ctx: &mut ValidatorContext<'_>, frag: &FragmentDefinition) {
        let entry = frag.name.item.as_str();
        let mut path: Vec<(String, SourcePosition)> = Vec::new();
        let mut on_path = HashSet::new();
        on_path.insert(entry.to_string());
        if let Some(cycle) = find_cycle(ctx, entry, &frag.selection_set, &mut path, &mut on_path) {
            let chain = cycle.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>().join(", ");
            let locations = cycle.iter().map(|(_, loc)| *loc).collect();
            ctx.report_error(
                format!("Cannot spread fragment \"{entry}\" within itself (via {chain})."),
                locations,
            );
        }
    }
}

fn find_cycle(
    ctx: &ValidatorContext<'_>,
    entry: &str,
    selection_set: &[Selection],
    path: &mut Vec<(String, SourcePosition)>,
    on_path: &mut HashSet<String>,
) -> Option<Vec<(String, SourcePosition)>> {
    for selection in selection_set {
        match selection {
            Selection::Field(field) => {
                if let Some(found) = find_cycle(ctx, entry, &field.item.selection_set, path, on_path) {
                    return Some(found);
                }
            }
            Selection::InlineFragment(inline) => {
                if let Some(found) = find_cycle(ctx, entry, &inline.item.selection_set, path, on_path) {
                    return Some(found);
                }
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.item.name.item.as_str();
                if name == entry {
                    return Some(path.clone());
                }
                if on_path.contains(name) {
                    continue;
                }
                let Some(target) = ctx.fragment(name) else { continue };
                path.push((name.to_string(), spread.start));
                on_path.insert(name.to_string());
                if let Some(found) = find_cycle(ctx, entry, &target.selection_set, path, on_path) {
                    return Some(found);
                }
                on_path.remove(name);
                path.pop();
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::NoFragmentCycles;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn no_spreading_itself() {
        expect_passes_rule::<NoFragmentCycles>(
            "{ dog { ...fragA } } fragment fragA on Dog { name }",
        );
    }

    #[test]
    fn spreading_twice_is_not_a_cycle() {
        expect_passes_rule::<NoFragmentCycles>(
            "{ dog { ...fragA ...fragA } } fragment fragA on Dog { name }",
        );
    }

    #[test]
    fn two_fragments_spread_each_other() {
        expect_fails_rule::<NoFragmentCycles>(
            "{ dog { ...fragA } } fragment fragA on Dog { ...fragB } fragment fragB on Dog { ...fragA }",
            &[
                ("Cannot spread fragment \"fragA\" within itself (via fragB).", &[(1, 46)]),
                ("Cannot spread fragment \"fragB\" within itself (via fragA).", &[(1, 81)]),
            ],
        );
    }
}
