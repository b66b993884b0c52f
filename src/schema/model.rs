//! The assembled schema: the type map plus root operation types and directive definitions.

use fnv::FnvHashMap;
use indexmap::IndexMap;

use crate::schema::meta::{MetaType, TypeRef};

/// Where a directive is allowed to appear, checked by `KnownDirectivesInAllowedLocations`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
}

#[derive(Clone, Debug)]
pub struct DirectiveType {
    pub name: String,
    pub locations: Vec<DirectiveLocation>,
    pub arguments: IndexMap<String, crate::schema::meta::ArgumentDef>,
}

impl DirectiveType {
    pub fn new(name: impl Into<String>, locations: Vec<DirectiveLocation>) -> Self {
        Self {
            name: name.into(),
            locations,
            arguments: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn argument(mut self, arg: crate::schema::meta::ArgumentDef) -> Self {
        self.arguments.insert(arg.name.clone(), arg);
        self
    }
}

/// The assembled, validated schema.
///
/// Construction goes exclusively through [`crate::schema::builder::SchemaBuilder`], which
/// enforces the structural invariants this type assumes hold everywhere else (every
/// referenced type exists, enum/input-object field and value names are unique, every object
/// declares every field of the interfaces it implements) — the executor and validator never
/// re-check them.
#[derive(Clone, Debug)]
pub struct Schema {
    pub(crate) types: IndexMap<String, MetaType>,
    pub(crate) directives: IndexMap<String, DirectiveType>,
    pub(crate) query_type: String,
    pub(crate) mutation_type: Option<String>,
    pub(crate) subscription_type: Option<String>,
    /// Precomputed supertype -> subtype(s) map for interfaces and unions, built once at
    /// construction so `is_possible_type` is O(1) instead of scanning every type per call.
    pub(crate) possible_types: FnvHashMap<String, Vec<String>>,
}

impl Schema {
    pub fn type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &MetaType> {
        self.types.values()
    }

    pub fn directive_by_name(&self, name: &str) -> Option<&DirectiveType> {
        self.directives.get(name)
    }

    pub fn directives(&self) -> impl Iterator<Item = &DirectiveType> {
        self.directives.values()
    }

    pub fn query_type(&self) -> &MetaType {
        self.types.get(&self.query_type).expect("query type registered at build time")
    }

    pub fn query_type_name(&self) -> &str {
        &self.query_type
    }

    pub fn mutation_type(&self) -> Option<&MetaType> {
        self.mutation_type.as_ref().and_then(|n| self.types.get(n))
    }

    pub fn subscription_type(&self) -> Option<&MetaType> {
        self.subscription_type.as_ref().and_then(|n| self.types.get(n))
    }

    /// Resolves a [`TypeRef`] to its innermost [`MetaType`], ignoring list/non-null wrappers.
    pub fn resolve(&self, type_ref: &TypeRef) -> Option<&MetaType> {
        self.types.get(type_ref.innermost_name())
    }

    /// True if `maybe_sub` is a concrete object type that implements or belongs to the
    /// abstract type `abstract_name`; used by `PossibleFragmentSpreads` and
    /// `OverlappingFieldsCanBeMerged`.
    pub fn is_possible_type(&self, abstract_name: &str, maybe_sub: &str) -> bool {
        if abstract_name == maybe_sub {
            return true;
        }
        self.possible_types
            .get(abstract_name)
            .is_some_and(|subs| subs.iter().any(|s| s == maybe_sub))
    }

    /// True if `sub_name` satisfies `super_name` for the purposes of fragment spreads: either
    /// they're the same object type, or `super_name` is an interface/union that `sub_name`
    /// belongs to.
    pub fn is_subtype(&self, super_name: &str, sub_name: &str) -> bool {
        if super_name == sub_name {
            return true;
        }
        self.is_possible_type(super_name, sub_name)
    }

    /// All concrete object type names a fragment on `abstract_name` could apply to. For an
    /// object type this is just itself.
    pub fn possible_types(&self, abstract_name: &str) -> Vec<String> {
        match self.possible_types.get(abstract_name) {
            Some(subs) => subs.clone(),
            None => vec![abstract_name.to_string()],
        }
    }
}
