//! The full set of validation rules. Each rule is a small, independently testable
//! [`crate::validation::traits::Visitor`]; [`all_rules`] is what `validation::validate` drives
//! through a single [`crate::validation::multi_visitor::MultiVisitor`] pass.

mod arguments_of_correct_type;
mod default_values_of_correct_type;
mod fields_on_correct_type;
mod known_argument_names;
mod known_directives_in_allowed_locations;
mod known_fragment_names;
mod known_type_names;
mod lone_anonymous_operation;
mod no_fragment_cycles;
mod no_undefined_variables;
mod no_unused_fragments;
mod no_unused_variables;
mod overlapping_fields_can_be_merged;
mod possible_fragment_spreads;
mod provided_non_null_arguments;
mod scalar_leafs;
mod unique_names;
mod variables_are_input_types;
mod variables_in_allowed_position;

use crate::validation::traits::Visitor;

pub fn all_rules() -> Vec<Box<dyn Visitor>> {
    vec![
        Box::new(known_type_names::KnownTypeNames),
        Box::new(fields_on_correct_type::FieldsOnCorrectType),
        Box::new(known_argument_names::KnownArgumentNames),
        Box::new(known_directives_in_allowed_locations::KnownDirectivesInAllowedLocations::default()),
        Box::new(known_fragment_names::KnownFragmentNames),
        Box::new(no_fragment_cycles::NoFragmentCycles),
        Box::new(no_undefined_variables::NoUndefinedVariables),
        Box::new(no_unused_fragments::NoUnusedFragments),
        Box::new(no_unused_variables::NoUnusedVariables),
        Box::new(lone_anonymous_operation::LoneAnonymousOperation),
        Box::new(unique_names::UniqueArgumentNames),
        Box::new(unique_names::UniqueVariableNames),
        Box::new(unique_names::UniqueInputFieldNames),
        Box::new(unique_names::UniqueDirectivesPerLocation::default()),
        Box::new(unique_names::UniqueFragmentNames),
        Box::new(unique_names::UniqueOperationNames),
        Box::new(provided_non_null_arguments::ProvidedNonNullArguments),
        Box::new(arguments_of_correct_type::ArgumentsOfCorrectType),
        Box::new(default_values_of_correct_type::DefaultValuesOfCorrectType),
        Box::new(variables_are_input_types::VariablesAreInputTypes),
        Box::new(variables_in_allowed_position::VariablesInAllowedPosition::default()),
        Box::new(overlapping_fields_can_be_merged::OverlappingFieldsCanBeMerged::default()),
        Box::new(scalar_leafs::ScalarLeafs),
        Box::new(possible_fragment_spreads::PossibleFragmentSpreads),
    ]
}
