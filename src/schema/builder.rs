//! Fluent schema assembly: register types incrementally, validate once at the end.
//!
//! Construction is incremental and fallible only at [`SchemaBuilder::build`], which checks the
//! structural invariants the rest of the engine assumes hold: every named type referenced from
//! a field/argument/variable type actually exists; enum/input-object field name and value
//! uniqueness is checked at construction time in [`crate::schema::meta`]; every object type
//! listed as implementing an interface actually declares every field of that interface.

use derive_more::{Display, Error};
use fnv::FnvHashMap;
use indexmap::IndexMap;

use crate::schema::meta::MetaType;
use crate::schema::model::{DirectiveLocation, DirectiveType, Schema};
use crate::schema::scalars;

/// Why [`SchemaBuilder::build`] refused to assemble a schema.
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum SchemaBuildError {
    #[display("unknown type \"{_0}\" referenced by {_1}")]
    UnknownType(#[error(not(source))] String, String),
    #[display("query root type \"{_0}\" is not registered")]
    MissingQueryRoot(#[error(not(source))] String),
    #[display("mutation root type \"{_0}\" is not registered")]
    MissingMutationRoot(#[error(not(source))] String),
    #[display("subscription root type \"{_0}\" is not registered")]
    MissingSubscriptionRoot(#[error(not(source))] String),
    #[display("object type \"{_0}\" implements interface \"{_1}\" but is missing field \"{_2}\"")]
    MissingInterfaceField(String, String, #[error(not(source))] String),
    #[display("object type \"{_0}\" implements unknown interface \"{_1}\"")]
    UnknownInterface(String, #[error(not(source))] String),
    #[display("union \"{_0}\" lists unknown member type \"{_1}\"")]
    UnknownUnionMember(String, #[error(not(source))] String),
}

/// Builds a [`Schema`] by registering named types one at a time, then assembling and
/// validating them in [`build`](Self::build).
pub struct SchemaBuilder {
    types: IndexMap<String, MetaType>,
    directives: IndexMap<String, DirectiveType>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            types: IndexMap::new(),
            directives: IndexMap::new(),
            query_type: None,
            mutation_type: None,
            subscription_type: None,
        };
        builder = builder.register(MetaType::Scalar(scalars::int()));
        builder = builder.register(MetaType::Scalar(scalars::float()));
        builder = builder.register(MetaType::Scalar(scalars::string()));
        builder = builder.register(MetaType::Scalar(scalars::boolean()));
        builder = builder.register(MetaType::Scalar(scalars::id()));
        builder.register_builtin_directives();
        builder
    }

    fn register_builtin_directives(&mut self) {
        use crate::schema::meta::ArgumentDef;
        use crate::schema::meta::TypeRef;
        use crate::value::Value;

        let include = DirectiveType::new(
            "include",
            vec![
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
        )
        .argument(ArgumentDef::new("if", TypeRef::named("Boolean").non_null()));
        let skip = DirectiveType::new(
            "skip",
            vec![
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
        )
        .argument(ArgumentDef::new("if", TypeRef::named("Boolean").non_null()));
        let deprecated = DirectiveType::new(
            "deprecated",
            vec![DirectiveLocation::Field],
        )
        .argument(
            ArgumentDef::new("reason", TypeRef::named("String"))
                .default_value(Value::String("No longer supported".into())),
        );

        self.directives.insert(include.name.clone(), include);
        self.directives.insert(skip.name.clone(), skip);
        self.directives.insert(deprecated.name.clone(), deprecated);
    }

    #[must_use]
    pub fn register(mut self, ty: MetaType) -> Self {
        self.types.insert(ty.name().to_string(), ty);
        self
    }

    #[must_use]
    pub fn directive(mut self, directive: DirectiveType) -> Self {
        self.directives.insert(directive.name.clone(), directive);
        self
    }

    #[must_use]
    pub fn query(mut self, type_name: impl Into<String>) -> Self {
        self.query_type = Some(type_name.into());
        self
    }

    #[must_use]
    pub fn mutation(mut self, type_name: impl Into<String>) -> Self {
        self.mutation_type = Some(type_name.into());
        self
    }

    #[must_use]
    pub fn subscription(mut self, type_name: impl Into<String>) -> Self {
        self.subscription_type = Some(type_name.into());
        self
    }

    /// Validates referenced types and interface implementations, precomputes the
    /// abstract-type possible-types index, then assembles the immutable [`Schema`].
    pub fn build(mut self) -> Result<Schema, SchemaBuildError> {
        let query_type = self
            .query_type
            .clone()
            .unwrap_or_else(|| "Query".to_string());
        if !self.types.contains_key(&query_type) {
            return Err(SchemaBuildError::MissingQueryRoot(query_type));
        }
        if let Some(m) = &self.mutation_type {
            if !self.types.contains_key(m) {
                return Err(SchemaBuildError::MissingMutationRoot(m.clone()));
            }
        }
        if let Some(s) = &self.subscription_type {
            if !self.types.contains_key(s) {
                return Err(SchemaBuildError::MissingSubscriptionRoot(s.clone()));
            }
        }

        self.install_introspection(&query_type);

        self.check_referenced_types()?;
        self.check_interface_implementations()?;
        self.check_union_members()?;

        let possible_types = self.compute_possible_types();

        Ok(Schema {
            types: self.types,
            directives: self.directives,
            query_type,
            mutation_type: self.mutation_type,
            subscription_type: self.subscription_type,
            possible_types,
        })
    }

    /// Registers the `__Schema`/`__Type`/... meta types and adds `__schema`/`__type` fields to
    /// the query root, so introspection queries validate and resolve like any other field.
    /// `__typename` needs no such wiring: every rule and the executor already special-case it
    /// regardless of parent type.
    fn install_introspection(&mut self, query_type: &str) {
        use crate::schema::meta::{ArgumentDef, FieldDef, TypeRef};

        for ty in crate::introspection::meta_types() {
            self.types.entry(ty.name().to_string()).or_insert(ty);
        }

        if let Some(MetaType::Object(query)) = self.types.get_mut(query_type) {
            query
                .fields
                .entry("__schema".to_string())
                .or_insert_with(|| FieldDef::new("__schema", TypeRef::named("__Schema").non_null()));
            query.fields.entry("__type".to_string()).or_insert_with(|| {
                FieldDef::new("__type", TypeRef::named("__Type"))
                    .argument(ArgumentDef::new("name", TypeRef::named("String").non_null()))
            });
        }
    }

    fn check_referenced_types(&self) -> Result<(), SchemaBuildError> {
        let missing = |name: &str, context: &str| {
            SchemaBuildError::UnknownType(name.to_string(), context.to_string())
        };
        for ty in self.types.values() {
            match ty {
                MetaType::Object(o) => {
                    for field in o.fields.values() {
                        let want = field.field_type.innermost_name();
                        if !self.types.contains_key(want) {
                            return Err(missing(want, &format!("{}.{}", o.name, field.name)));
                        }
                        for arg in field.arguments.values() {
                            let want = arg.arg_type.innermost_name();
                            if !self.types.contains_key(want) {
                                return Err(missing(
                                    want,
                                    &format!("{}.{}({})", o.name, field.name, arg.name),
                                ));
                            }
                        }
                    }
                }
                MetaType::Interface(i) => {
                    for field in i.fields.values() {
                        let want = field.field_type.innermost_name();
                        if !self.types.contains_key(want) {
                            return Err(missing(want, &format!("{}.{}", i.name, field.name)));
                        }
                    }
                }
                MetaType::InputObject(o) => {
                    for field in o.fields.values() {
                        let want = field.input_type.innermost_name();
                        if !self.types.contains_key(want) {
                            return Err(missing(want, &format!("{}.{}", o.name, field.name)));
                        }
                    }
                }
                MetaType::Scalar(_) | MetaType::Enum(_) | MetaType::Union(_) => {}
            }
        }
        Ok(())
    }

    fn check_interface_implementations(&self) -> Result<(), SchemaBuildError> {
        for ty in self.types.values() {
            let MetaType::Object(o) = ty else { continue };
            for iface_name in &o.interfaces {
                let Some(MetaType::Interface(iface)) = self.types.get(iface_name) else {
                    return Err(SchemaBuildError::UnknownInterface(
                        o.name.clone(),
                        iface_name.clone(),
                    ));
                };
                for field_name in iface.fields.keys() {
                    if !o.fields.contains_key(field_name) {
                        return Err(SchemaBuildError::MissingInterfaceField(
                            o.name.clone(),
                            iface_name.clone(),
                            field_name.clone(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn check_union_members(&self) -> Result<(), SchemaBuildError> {
        for ty in self.types.values() {
            let MetaType::Union(u) = ty else { continue };
            for member in &u.possible_types {
                match self.types.get(member) {
                    Some(MetaType::Object(_)) => {}
                    _ => {
                        return Err(SchemaBuildError::UnknownUnionMember(
                            u.name.clone(),
                            member.clone(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn compute_possible_types(&self) -> FnvHashMap<String, Vec<String>> {
        let mut map: FnvHashMap<String, Vec<String>> = FnvHashMap::default();
        for ty in self.types.values() {
            match ty {
                MetaType::Union(u) => {
                    map.insert(u.name.clone(), u.possible_types.clone());
                }
                MetaType::Interface(i) => {
                    let members = self
                        .types
                        .values()
                        .filter_map(|t| match t {
                            MetaType::Object(o) if o.interfaces.iter().any(|n| n == &i.name) => {
                                Some(o.name.clone())
                            }
                            _ => None,
                        })
                        .collect();
                    map.insert(i.name.clone(), members);
                }
                _ => {}
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::SchemaBuilder;
    use crate::schema::meta::{FieldDef, InterfaceType, MetaType, ObjectType, TypeRef, UnionType};

    #[test]
    fn builds_a_minimal_schema_with_introspection_installed() {
        let query = ObjectType {
            fields: [FieldDef::new("ok", TypeRef::named("Boolean").non_null())].into_iter().map(|f| (f.name.clone(), f)).collect(),
            ..ObjectType::new("Query")
        };
        let schema = SchemaBuilder::new().register(MetaType::Object(query)).query("Query").build().unwrap();
        assert!(schema.type_by_name("__Schema").is_some());
        assert!(schema.query_type().as_object().unwrap().fields.contains_key("__schema"));
    }

    #[test]
    fn missing_query_root_is_rejected() {
        let err = SchemaBuilder::new().query("Query").build().unwrap_err();
        assert_eq!(err, super::SchemaBuildError::MissingQueryRoot("Query".to_string()));
    }

    #[test]
    fn field_referencing_unknown_type_is_rejected() {
        let query = ObjectType {
            fields: [FieldDef::new("bad", TypeRef::named("Ghost"))].into_iter().map(|f| (f.name.clone(), f)).collect(),
            ..ObjectType::new("Query")
        };
        let err = SchemaBuilder::new().register(MetaType::Object(query)).query("Query").build().unwrap_err();
        assert_eq!(err, super::SchemaBuildError::UnknownType("Ghost".to_string(), "Query.bad".to_string()));
    }

    #[test]
    fn object_missing_an_interface_field_is_rejected() {
        let named = InterfaceType {
            fields: [FieldDef::new("name", TypeRef::named("String").non_null())].into_iter().map(|f| (f.name.clone(), f)).collect(),
            ..InterfaceType::new("Named")
        };
        let dog = ObjectType {
            interfaces: vec!["Named".to_string()],
            ..ObjectType::new("Dog")
        };
        let query = ObjectType {
            fields: [FieldDef::new("dog", TypeRef::named("Dog"))].into_iter().map(|f| (f.name.clone(), f)).collect(),
            ..ObjectType::new("Query")
        };
        let err = SchemaBuilder::new()
            .register(MetaType::Interface(named))
            .register(MetaType::Object(dog))
            .register(MetaType::Object(query))
            .query("Query")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            super::SchemaBuildError::MissingInterfaceField("Dog".to_string(), "Named".to_string(), "name".to_string())
        );
    }

    #[test]
    fn union_listing_an_unknown_member_is_rejected() {
        let union = UnionType::new("CatOrGhost", vec!["Ghost".to_string()]);
        let query = ObjectType {
            fields: [FieldDef::new("thing", TypeRef::named("CatOrGhost"))].into_iter().map(|f| (f.name.clone(), f)).collect(),
            ..ObjectType::new("Query")
        };
        let err = SchemaBuilder::new().register(MetaType::Union(union)).register(MetaType::Object(query)).query("Query").build().unwrap_err();
        assert_eq!(err, super::SchemaBuildError::UnknownUnionMember("CatOrGhost".to_string(), "Ghost".to_string()));
    }

    #[test]
    fn interface_possible_types_are_derived_from_implementing_objects() {
        let named = InterfaceType::new("Named");
        let dog = ObjectType {
            interfaces: vec!["Named".to_string()],
            ..ObjectType::new("Dog")
        };
        let query = ObjectType {
            fields: [FieldDef::new("dog", TypeRef::named("Dog"))].into_iter().map(|f| (f.name.clone(), f)).collect(),
            ..ObjectType::new("Query")
        };
        let schema = SchemaBuilder::new()
            .register(MetaType::Interface(named))
            .register(MetaType::Object(dog))
            .register(MetaType::Object(query))
            .query("Query")
            .build()
            .unwrap();
        assert_eq!(schema.possible_types("Named"), vec!["Dog".to_string()]);
    }
}
