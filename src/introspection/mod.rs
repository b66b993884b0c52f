//! `__schema`/`__type`: builds the introspection result eagerly as a plain
//! [`Value`] tree, so the ordinary executor machinery (default property-lookup resolution,
//! `CompleteValue`) walks it exactly like any other resolver output.
//!
//! `includeDeprecated` on `fields`/`enumValues` is accepted for shape-compatibility but not
//! honored — both always return the full list, a deliberate simplification (DESIGN.md).

use crate::schema::meta::{MetaType, TypeRef};
use crate::schema::model::{DirectiveType, Schema};
use crate::value::{Object, Value};

/// The meta types introspection itself is described in terms of (`__Schema`, `__Type`, ...),
/// registered into every [`Schema`] by [`crate::schema::SchemaBuilder::build`].
pub(crate) fn meta_types() -> Vec<MetaType> {
    use crate::schema::meta::{ArgumentDef, EnumType, EnumValueDef, FieldDef, ObjectType};

    let string = || TypeRef::named("String");
    let string_req = || TypeRef::named("String").non_null();
    let bool_req = || TypeRef::named("Boolean").non_null();
    let type_req = || TypeRef::named("__Type").non_null();
    let type_opt = || TypeRef::named("__Type");

    let type_kind = EnumType {
        name: "__TypeKind".into(),
        description: Some("An enum describing what kind of type a given `__Type` is.".into()),
        values: [
            "SCALAR",
            "OBJECT",
            "INTERFACE",
            "UNION",
            "ENUM",
            "INPUT_OBJECT",
            "LIST",
            "NON_NULL",
        ]
        .into_iter()
        .map(|n| EnumValueDef {
            name: n.into(),
            value: Value::Enum(n.into()),
            description: None,
            deprecation_reason: None,
        })
        .collect(),
    };

    let directive_location = EnumType {
        name: "__DirectiveLocation".into(),
        description: Some("A location a directive may be applied at.".into()),
        values: [
            "QUERY",
            "MUTATION",
            "SUBSCRIPTION",
            "FIELD",
            "FRAGMENT_DEFINITION",
            "FRAGMENT_SPREAD",
            "INLINE_FRAGMENT",
            "VARIABLE_DEFINITION",
        ]
        .into_iter()
        .map(|n| EnumValueDef {
            name: n.into(),
            value: Value::Enum(n.into()),
            description: None,
            deprecation_reason: None,
        })
        .collect(),
    };

    let input_value = ObjectType {
        name: "__InputValue".into(),
        description: None,
        interfaces: Vec::new(),
        fields: [
            FieldDef::new("name", string_req()),
            FieldDef::new("description", string()),
            FieldDef::new("type", type_req()),
            FieldDef::new("defaultValue", string()),
        ]
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect(),
    };

    let enum_value = ObjectType {
        name: "__EnumValue".into(),
        description: None,
        interfaces: Vec::new(),
        fields: [
            FieldDef::new("name", string_req()),
            FieldDef::new("description", string()),
            FieldDef::new("isDeprecated", bool_req()),
            FieldDef::new("deprecationReason", string()),
        ]
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect(),
    };

    let field = ObjectType {
        name: "__Field".into(),
        description: None,
        interfaces: Vec::new(),
        fields: [
            FieldDef::new("name", string_req()),
            FieldDef::new("description", string()),
            FieldDef::new("args", TypeRef::named("__InputValue").non_null().list().non_null()),
            FieldDef::new("type", type_req()),
            FieldDef::new("isDeprecated", bool_req()),
            FieldDef::new("deprecationReason", string()),
        ]
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect(),
    };

    let directive = ObjectType {
        name: "__Directive".into(),
        description: None,
        interfaces: Vec::new(),
        fields: [
            FieldDef::new("name", string_req()),
            FieldDef::new("description", string()),
            FieldDef::new(
                "locations",
                TypeRef::named("__DirectiveLocation").non_null().list().non_null(),
            ),
            FieldDef::new("args", TypeRef::named("__InputValue").non_null().list().non_null()),
        ]
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect(),
    };

    let gql_type = ObjectType {
        name: "__Type".into(),
        description: None,
        interfaces: Vec::new(),
        fields: [
            FieldDef::new("kind", TypeRef::named("__TypeKind").non_null()),
            FieldDef::new("name", string()),
            FieldDef::new("description", string()),
            FieldDef::new("fields", TypeRef::named("__Field").non_null().list())
                .argument(ArgumentDef::new("includeDeprecated", TypeRef::named("Boolean")).default_value(Value::Boolean(false))),
            FieldDef::new("interfaces", type_req().list()),
            FieldDef::new("possibleTypes", type_req().list()),
            FieldDef::new("enumValues", TypeRef::named("__EnumValue").non_null().list())
                .argument(ArgumentDef::new("includeDeprecated", TypeRef::named("Boolean")).default_value(Value::Boolean(false))),
            FieldDef::new("inputFields", TypeRef::named("__InputValue").non_null().list()),
            FieldDef::new("ofType", type_opt()),
        ]
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect(),
    };

    let gql_schema = ObjectType {
        name: "__Schema".into(),
        description: None,
        interfaces: Vec::new(),
        fields: [
            FieldDef::new("types", type_req().list().non_null()),
            FieldDef::new("queryType", type_req()),
            FieldDef::new("mutationType", type_opt()),
            FieldDef::new("subscriptionType", type_opt()),
            FieldDef::new("directives", TypeRef::named("__Directive").non_null().list().non_null()),
        ]
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect(),
    };

    vec![
        MetaType::Enum(type_kind),
        MetaType::Enum(directive_location),
        MetaType::Object(input_value),
        MetaType::Object(enum_value),
        MetaType::Object(field),
        MetaType::Object(directive),
        MetaType::Object(gql_type),
        MetaType::Object(gql_schema),
    ]
}

/// Builds the `__schema` field's value.
pub fn schema_value(schema: &Schema) -> Value {
    let mut o = Object::new();
    let types = schema.types().map(|t| type_value_for_meta(schema, t)).collect();
    o.insert("types", Value::List(types));
    o.insert(
        "queryType",
        schema
            .type_by_name(schema.query_type_name())
            .map(|t| type_value_for_meta(schema, t))
            .unwrap_or(Value::Null),
    );
    o.insert(
        "mutationType",
        schema
            .mutation_type()
            .map(|t| type_value_for_meta(schema, t))
            .unwrap_or(Value::Null),
    );
    o.insert(
        "subscriptionType",
        schema
            .subscription_type()
            .map(|t| type_value_for_meta(schema, t))
            .unwrap_or(Value::Null),
    );
    o.insert(
        "directives",
        Value::List(schema.directives().map(|d| directive_value(schema, d)).collect()),
    );
    Value::Object(o)
}

/// Builds the `__type(name:)` field's value, or `Value::Null` if `name` isn't a registered type.
pub fn type_value(schema: &Schema, name: &str) -> Value {
    schema.type_by_name(name).map(|t| type_value_for_meta(schema, t)).unwrap_or(Value::Null)
}

fn type_value_for_meta(schema: &Schema, meta: &MetaType) -> Value {
    let mut o = Object::new();
    let kind = match meta {
        MetaType::Scalar(_) => "SCALAR",
        MetaType::Object(_) => "OBJECT",
        MetaType::Interface(_) => "INTERFACE",
        MetaType::Union(_) => "UNION",
        MetaType::Enum(_) => "ENUM",
        MetaType::InputObject(_) => "INPUT_OBJECT",
    };
    o.insert("kind", Value::Enum(kind.into()));
    o.insert("name", Value::String(meta.name().to_string()));
    o.insert("description", description_of(meta).map(Value::String).unwrap_or(Value::Null));

    o.insert(
        "fields",
        match meta {
            MetaType::Object(obj) => Value::List(obj.fields.values().map(|f| field_value(schema, f)).collect()),
            MetaType::Interface(i) => Value::List(i.fields.values().map(|f| field_value(schema, f)).collect()),
            _ => Value::Null,
        },
    );
    o.insert(
        "interfaces",
        match meta {
            MetaType::Object(obj) => Value::List(obj.interfaces.iter().map(|n| Value::String(n.clone())).collect()),
            _ => Value::Null,
        },
    );
    o.insert(
        "possibleTypes",
        match meta {
            MetaType::Interface(i) => Value::List(i.possible_types.iter().map(|n| Value::String(n.clone())).collect()),
            MetaType::Union(u) => Value::List(u.possible_types.iter().map(|n| Value::String(n.clone())).collect()),
            _ => Value::Null,
        },
    );
    o.insert(
        "enumValues",
        match meta {
            MetaType::Enum(e) => Value::List(e.values.iter().map(enum_value_value).collect()),
            _ => Value::Null,
        },
    );
    o.insert(
        "inputFields",
        match meta {
            MetaType::InputObject(io) => Value::List(io.fields.values().map(|f| input_value_value(schema, f)).collect()),
            _ => Value::Null,
        },
    );
    o.insert("ofType", Value::Null);
    Value::Object(o)
}

/// Builds a `__Type` value for a field/argument/input-field type reference: `Named` resolves
/// against `schema` so `kind` reflects the actual underlying type rather than assuming scalar.
fn type_ref_value(schema: &Schema, type_ref: &TypeRef) -> Value {
    match type_ref {
        TypeRef::NonNull(inner) => wrapper_value("NON_NULL", schema, inner),
        TypeRef::List(inner) => wrapper_value("LIST", schema, inner),
        TypeRef::Named(name) => schema.type_by_name(name).map(|t| type_value_for_meta(schema, t)).unwrap_or(Value::Null),
    }
}

fn wrapper_value(kind: &str, schema: &Schema, inner: &TypeRef) -> Value {
    let mut o = Object::new();
    o.insert("kind", Value::Enum(kind.into()));
    o.insert("name", Value::Null);
    o.insert("description", Value::Null);
    o.insert("fields", Value::Null);
    o.insert("interfaces", Value::Null);
    o.insert("possibleTypes", Value::Null);
    o.insert("enumValues", Value::Null);
    o.insert("inputFields", Value::Null);
    o.insert("ofType", type_ref_value(schema, inner));
    Value::Object(o)
}

fn field_value(schema: &Schema, def: &crate::schema::meta::FieldDef) -> Value {
    let mut o = Object::new();
    o.insert("name", Value::String(def.name.clone()));
    o.insert("description", def.description.clone().map(Value::String).unwrap_or(Value::Null));
    o.insert("args", Value::List(def.arguments.values().map(|a| argument_value(schema, a)).collect()));
    o.insert("type", type_ref_value(schema, &def.field_type));
    o.insert("isDeprecated", Value::Boolean(def.deprecation_reason.is_some()));
    o.insert(
        "deprecationReason",
        def.deprecation_reason.clone().map(Value::String).unwrap_or(Value::Null),
    );
    Value::Object(o)
}

fn argument_value(schema: &Schema, def: &crate::schema::meta::ArgumentDef) -> Value {
    let mut o = Object::new();
    o.insert("name", Value::String(def.name.clone()));
    o.insert("description", def.description.clone().map(Value::String).unwrap_or(Value::Null));
    o.insert("type", type_ref_value(schema, &def.arg_type));
    o.insert(
        "defaultValue",
        def.default_value.as_ref().map(|v| Value::String(v.to_string())).unwrap_or(Value::Null),
    );
    Value::Object(o)
}

fn input_value_value(schema: &Schema, def: &crate::schema::meta::InputFieldDef) -> Value {
    let mut o = Object::new();
    o.insert("name", Value::String(def.name.clone()));
    o.insert("description", def.description.clone().map(Value::String).unwrap_or(Value::Null));
    o.insert("type", type_ref_value(schema, &def.input_type));
    o.insert(
        "defaultValue",
        def.default_value.as_ref().map(|v| Value::String(v.to_string())).unwrap_or(Value::Null),
    );
    Value::Object(o)
}

fn enum_value_value(def: &crate::schema::meta::EnumValueDef) -> Value {
    let mut o = Object::new();
    o.insert("name", Value::String(def.name.clone()));
    o.insert("description", def.description.clone().map(Value::String).unwrap_or(Value::Null));
    o.insert("isDeprecated", Value::Boolean(def.deprecation_reason.is_some()));
    o.insert(
        "deprecationReason",
        def.deprecation_reason.clone().map(Value::String).unwrap_or(Value::Null),
    );
    Value::Object(o)
}

fn directive_value(schema: &Schema, def: &DirectiveType) -> Value {
    let mut o = Object::new();
    o.insert("name", Value::String(def.name.clone()));
    o.insert("description", Value::Null);
    o.insert(
        "locations",
        Value::List(def.locations.iter().map(|l| Value::Enum(location_name(*l).into())).collect()),
    );
    o.insert("args", Value::List(def.arguments.values().map(|a| argument_value(schema, a)).collect()));
    Value::Object(o)
}

fn location_name(loc: crate::schema::model::DirectiveLocation) -> &'static str {
    use crate::schema::model::DirectiveLocation::*;
    match loc {
        Query => "QUERY",
        Mutation => "MUTATION",
        Subscription => "SUBSCRIPTION",
        Field => "FIELD",
        FragmentDefinition => "FRAGMENT_DEFINITION",
        FragmentSpread => "FRAGMENT_SPREAD",
        InlineFragment => "INLINE_FRAGMENT",
        VariableDefinition => "VARIABLE_DEFINITION",
    }
}

fn description_of(meta: &MetaType) -> Option<String> {
    match meta {
        MetaType::Scalar(s) => s.description.clone(),
        MetaType::Object(o) => o.description.clone(),
        MetaType::Interface(i) => i.description.clone(),
        MetaType::Union(u) => u.description.clone(),
        MetaType::Enum(e) => e.description.clone(),
        MetaType::InputObject(o) => o.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;
    use crate::schema::meta::{FieldDef, ObjectType};

    fn test_schema() -> Schema {
        let dog = ObjectType {
            description: Some("A very good boy.".into()),
            fields: [FieldDef::new("name", TypeRef::named("String").non_null())]
                .into_iter()
                .map(|f| (f.name.clone(), f))
                .collect(),
            ..ObjectType::new("Dog")
        };
        let query = ObjectType {
            fields: [FieldDef::new("dog", TypeRef::named("Dog"))]
                .into_iter()
                .map(|f| (f.name.clone(), f))
                .collect(),
            ..ObjectType::new("Query")
        };
        SchemaBuilder::new()
            .register(MetaType::Object(dog))
            .register(MetaType::Object(query))
            .query("Query")
            .build()
            .unwrap()
    }

    #[test]
    fn schema_value_lists_every_registered_type_and_root() {
        let schema = test_schema();
        let value = schema_value(&schema);
        let types = value.get_field("types").and_then(Value::as_list).unwrap();
        assert!(types.iter().any(|t| t.get_field("name") == Some(&Value::String("Dog".into()))));

        let query_type = value.get_field("queryType").unwrap();
        assert_eq!(query_type.get_field("name"), Some(&Value::String("Query".into())));
        assert_eq!(value.get_field("mutationType"), Some(&Value::Null));
    }

    #[test]
    fn type_value_reports_object_kind_description_and_fields() {
        let schema = test_schema();
        let value = type_value(&schema, "Dog");
        assert_eq!(value.get_field("kind"), Some(&Value::Enum("OBJECT".into())));
        assert_eq!(value.get_field("description"), Some(&Value::String("A very good boy.".into())));

        let fields = value.get_field("fields").and_then(Value::as_list).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].get_field("name"), Some(&Value::String("name".into())));
    }

    #[test]
    fn type_value_for_unknown_name_is_null() {
        let schema = test_schema();
        assert_eq!(type_value(&schema, "Ghost"), Value::Null);
    }

    #[test]
    fn non_null_list_field_type_nests_wrapper_kinds_down_to_the_named_type() {
        let schema = test_schema();
        let value = type_value(&schema, "Dog");
        let name_type = value.get_field("fields").and_then(Value::as_list).unwrap()[0].get_field("type").unwrap();

        assert_eq!(name_type.get_field("kind"), Some(&Value::Enum("NON_NULL".into())));
        let inner = name_type.get_field("ofType").unwrap();
        assert_eq!(inner.get_field("kind"), Some(&Value::Enum("SCALAR".into())));
        assert_eq!(inner.get_field("name"), Some(&Value::String("String".into())));
    }

    #[test]
    fn directives_include_the_built_in_skip_include_and_deprecated() {
        let schema = test_schema();
        let value = schema_value(&schema);
        let names: Vec<&str> = value
            .get_field("directives")
            .and_then(Value::as_list)
            .unwrap()
            .iter()
            .map(|d| d.get_field("name").and_then(Value::as_str).unwrap())
            .collect();
        assert!(names.contains(&"skip"));
        assert!(names.contains(&"include"));
        assert!(names.contains(&"deprecated"));
    }
}
