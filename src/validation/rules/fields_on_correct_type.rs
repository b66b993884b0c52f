//! `FieldsOnCorrectType`: a selected field must exist on its containing type. Suggests up to
//! 5 alternative field names within edit distance 2.

use crate::ast::Field;
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct FieldsOnCorrectType;

impl Visitor for FieldsOnCorrectType {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'_>, field: &Field) {
        let name = field.name.item.as_str();
        if name == "__typename" || name == "__schema" || name == "__type" {
            return;
        }
        let Some(parent) = ctx.parent_type() else { return };
        if !parent.is_composite() {
            return;
        }
        if parent.field(name).is_some() {
            return;
        }

        let suggestions: Vec<&str> = parent
            .fields()
            .into_iter()
            .flat_map(|fields| fields.keys())
            .map(String::as_str)
            .filter(|candidate| edit_distance(name, candidate) <= 2)
            .take(5)
            .collect();

        let message = if suggestions.is_empty() {
            format!("Cannot query field \"{name}\" on type \"{}\".", parent.name())
        } else {
            format!(
                "Cannot query field \"{name}\" on type \"{}\". Did you mean {}?",
                parent.name(),
                suggestions.iter().map(|s| format!("\"{s}\"")).collect::<Vec<_>>().join(", ")
            )
        };
        ctx.report_error(message, vec![field.name.start]);
    }
}

/// Classic Levenshtein distance, used to bound suggestion relevance.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let tmp = row[j + 1];
            row[j + 1] = if ca == cb {
                prev
            } else {
                1 + prev.min(row[j]).min(row[j + 1])
            };
            prev = tmp;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::FieldsOnCorrectType;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn field_exists_on_type() {
        expect_passes_rule::<FieldsOnCorrectType>("{ dog { name barkVolume } }");
    }

    #[test]
    fn unknown_field_no_suggestion() {
        expect_fails_rule::<FieldsOnCorrectType>(
            "{ dog { volume } }",
            &[("Cannot query field \"volume\" on type \"Dog\".", &[(1, 9)])],
        );
    }

    #[test]
    fn unknown_field_with_suggestion() {
        expect_fails_rule::<FieldsOnCorrectType>(
            "{ dog { bark } }",
            &[("Cannot query field \"bark\" on type \"Dog\". Did you mean \"barks\"?", &[(1, 9)])],
        );
    }
}
