//! Validation context: traversal state shared by every rule — type stacks, the fragment
//! table, and the error sink.

use std::collections::HashMap;

use derive_more::{Display, Error};

use crate::ast::{Document, FragmentDefinition, SourcePosition};
use crate::schema::meta::{MetaType, TypeRef};
use crate::schema::model::Schema;

/// One validation diagnostic. Cross-referencing rules (duplicates, cycles) attach more than
/// one location; all others attach exactly one.
#[derive(Clone, Debug, Display, Error, PartialEq)]
#[display("{message}")]
pub struct RuleError {
    #[error(not(source))]
    message: String,
    locations: Vec<SourcePosition>,
}

impl RuleError {
    pub fn new(message: impl Into<String>, locations: Vec<SourcePosition>) -> Self {
        Self {
            message: message.into(),
            locations,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn locations(&self) -> &[SourcePosition] {
        &self.locations
    }
}

/// Traversal state threaded through the single validation pass.
pub struct ValidatorContext<'a> {
    pub schema: &'a Schema,
    pub document: &'a Document,
    pub fail_on_first_error: bool,
    errors: Vec<RuleError>,
    type_stack: Vec<Option<&'a MetaType>>,
    parent_type_stack: Vec<Option<&'a MetaType>>,
    input_type_stack: Vec<Option<TypeRef>>,
    fragments: HashMap<&'a str, &'a FragmentDefinition>,
}

impl<'a> ValidatorContext<'a> {
    pub fn new(schema: &'a Schema, document: &'a Document, fail_on_first_error: bool) -> Self {
        let fragments = document.fragments().map(|f| (f.item.name.item.as_str(), &f.item)).collect();
        Self {
            schema,
            document,
            fail_on_first_error,
            errors: Vec::new(),
            type_stack: Vec::new(),
            parent_type_stack: Vec::new(),
            input_type_stack: Vec::new(),
            fragments,
        }
    }

    /// No-op once fail-fast has already recorded one diagnostic, so a rule that emits several
    /// errors per hook (duplicate names, unused variables, ...) still stops at exactly one.
    pub fn report_error(&mut self, message: impl Into<String>, locations: Vec<SourcePosition>) {
        if self.should_stop() {
            return;
        }
        self.errors.push(RuleError::new(message, locations));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Stops the traversal once the first diagnostic lands, when `fail_on_first_error` is set.
    pub fn should_stop(&self) -> bool {
        self.fail_on_first_error && self.has_errors()
    }

    pub fn into_errors(mut self) -> Vec<RuleError> {
        self.errors.sort_by(|a, b| a.locations.first().cmp(&b.locations.first()));
        self.errors
    }

    pub fn fragment(&self, name: &str) -> Option<&'a FragmentDefinition> {
        self.fragments.get(name).copied()
    }

    pub fn is_known_fragment(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    pub fn fragment_names(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().copied()
    }

    pub fn push_type(&mut self, ty: Option<&'a MetaType>) {
        self.type_stack.push(ty);
    }

    pub fn pop_type(&mut self) {
        self.type_stack.pop();
    }

    pub fn current_type(&self) -> Option<&'a MetaType> {
        self.type_stack.last().copied().flatten()
    }

    pub fn push_parent_type(&mut self, ty: Option<&'a MetaType>) {
        self.parent_type_stack.push(ty);
    }

    pub fn pop_parent_type(&mut self) {
        self.parent_type_stack.pop();
    }

    pub fn parent_type(&self) -> Option<&'a MetaType> {
        self.parent_type_stack.last().copied().flatten()
    }

    pub fn push_input_type(&mut self, ty: Option<TypeRef>) {
        self.input_type_stack.push(ty);
    }

    pub fn pop_input_type(&mut self) {
        self.input_type_stack.pop();
    }

    pub fn current_input_type(&self) -> Option<&TypeRef> {
        self.input_type_stack.last().and_then(|t| t.as_ref())
    }
}
