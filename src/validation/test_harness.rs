//! A schema shared by every rule's unit tests, plus `expect_passes_rule`/`expect_fails_rule`
//! helpers. Mirrors graphql-js's canonical validation test schema (`Being`/`Pet`/`Dog`/`Cat`/
//! `Human`/`Alien`/`ComplicatedArgs`/...) so the boundary scenarios from the system this crate
//! implements (a `dog { name }` query, `complicatedArgs { multipleReqs(...) }`) run unmodified.

use crate::ast::SourcePosition;
use crate::schema::meta::{ArgumentDef, EnumType, EnumValueDef, FieldDef, InputFieldDef, InputObjectType, InterfaceType, MetaType, ObjectType, TypeRef, UnionType};
use crate::schema::model::Schema;
use crate::schema::SchemaBuilder;
use crate::value::Value;

use super::context::RuleError;
use super::multi_visitor::MultiVisitor;
use super::traits::Visitor;
use super::visitor;

fn string() -> TypeRef {
    TypeRef::named("String")
}
fn int() -> TypeRef {
    TypeRef::named("Int")
}
fn bool_() -> TypeRef {
    TypeRef::named("Boolean")
}

pub fn test_schema() -> Schema {
    let being = InterfaceType {
        name: "Being".into(),
        fields: [FieldDef::new("name", string()).argument(ArgumentDef::new("surname", bool_()))]
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect(),
        ..Default::default()
    };

    let pet = InterfaceType {
        name: "Pet".into(),
        fields: [FieldDef::new("name", string()).argument(ArgumentDef::new("surname", bool_()))]
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect(),
        ..Default::default()
    };

    let canine = InterfaceType {
        name: "Canine".into(),
        fields: [FieldDef::new("name", string()).argument(ArgumentDef::new("surname", bool_()))]
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect(),
        ..Default::default()
    };

    let dog_command = EnumType::new(
        "DogCommand",
        ["SIT", "HEEL", "DOWN"]
            .into_iter()
            .map(|n| EnumValueDef::new(n, Value::Enum(n.into())))
            .collect(),
    );

    let fur_color = EnumType::new(
        "FurColor",
        ["BROWN", "BLACK", "TAN", "SPOTTED"]
            .into_iter()
            .map(|n| EnumValueDef::new(n, Value::Enum(n.into())))
            .collect(),
    );

    let dog = ObjectType {
        name: "Dog".into(),
        interfaces: vec!["Being".into(), "Pet".into(), "Canine".into()],
        fields: [
            FieldDef::new("name", string()).argument(ArgumentDef::new("surname", bool_())),
            FieldDef::new("nickname", string()),
            FieldDef::new("barkVolume", int()),
            FieldDef::new("barks", bool_()),
            FieldDef::new("doesKnowCommand", bool_())
                .argument(ArgumentDef::new("dogCommand", TypeRef::named("DogCommand"))),
            FieldDef::new("isHousetrained", bool_())
                .argument(ArgumentDef::new("atOtherHomes", bool_()).default_value(Value::Boolean(true))),
            FieldDef::new("isAtLocation", bool_())
                .argument(ArgumentDef::new("x", int()))
                .argument(ArgumentDef::new("y", int())),
        ]
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect(),
        ..Default::default()
    };

    let cat = ObjectType {
        name: "Cat".into(),
        interfaces: vec!["Being".into(), "Pet".into()],
        fields: [
            FieldDef::new("name", string()).argument(ArgumentDef::new("surname", bool_())),
            FieldDef::new("nickname", string()),
            FieldDef::new("meows", bool_()),
            FieldDef::new("meowVolume", int()),
            FieldDef::new("furColor", TypeRef::named("FurColor")),
        ]
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect(),
        ..Default::default()
    };

    let cat_or_dog = UnionType::new("CatOrDog", vec!["Cat".into(), "Dog".into()]);

    let intelligent = InterfaceType {
        name: "Intelligent".into(),
        fields: [FieldDef::new("iq", int())].into_iter().map(|f| (f.name.clone(), f)).collect(),
        ..Default::default()
    };

    let human = ObjectType {
        name: "Human".into(),
        interfaces: vec!["Being".into(), "Intelligent".into()],
        fields: [
            FieldDef::new("name", string()).argument(ArgumentDef::new("surname", bool_())),
            FieldDef::new("pets", TypeRef::named("Pet").list()),
            FieldDef::new("relatives", TypeRef::named("Human").non_null().list()),
            FieldDef::new("iq", int()),
        ]
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect(),
        ..Default::default()
    };

    let alien = ObjectType {
        name: "Alien".into(),
        interfaces: vec!["Being".into(), "Intelligent".into()],
        fields: [
            FieldDef::new("name", string()).argument(ArgumentDef::new("surname", bool_())),
            FieldDef::new("iq", int()),
            FieldDef::new("numEyes", int()),
        ]
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect(),
        ..Default::default()
    };

    let dog_or_human = UnionType::new("DogOrHuman", vec!["Dog".into(), "Human".into()]);
    let human_or_alien = UnionType::new("HumanOrAlien", vec!["Human".into(), "Alien".into()]);

    let complex_input = InputObjectType::new(
        "ComplexInput",
        vec![
            InputFieldDef::new("requiredField", bool_().non_null()),
            InputFieldDef::new("intField", int()),
            InputFieldDef::new("stringField", string()),
            InputFieldDef::new("booleanField", bool_()),
            InputFieldDef::new("stringListField", string().list()),
        ],
    );

    let complicated_args = ObjectType {
        name: "ComplicatedArgs".into(),
        fields: [
            FieldDef::new("intArgField", string()).argument(ArgumentDef::new("intArg", int())),
            FieldDef::new("nonNullIntArgField", string())
                .argument(ArgumentDef::new("nonNullIntArg", int().non_null())),
            FieldDef::new("stringArgField", string()).argument(ArgumentDef::new("stringArg", string())),
            FieldDef::new("booleanArgField", string()).argument(ArgumentDef::new("booleanArg", bool_())),
            FieldDef::new("enumArgField", string())
                .argument(ArgumentDef::new("enumArg", TypeRef::named("FurColor"))),
            FieldDef::new("floatArgField", string())
                .argument(ArgumentDef::new("floatArg", TypeRef::named("Float"))),
            FieldDef::new("idArgField", string()).argument(ArgumentDef::new("idArg", TypeRef::named("ID"))),
            FieldDef::new("stringListArgField", string())
                .argument(ArgumentDef::new("stringListArg", string().list())),
            FieldDef::new("complexArgField", string())
                .argument(ArgumentDef::new("complexArg", TypeRef::named("ComplexInput"))),
            FieldDef::new("multipleReqs", string())
                .argument(ArgumentDef::new("req1", int().non_null()))
                .argument(ArgumentDef::new("req2", int().non_null())),
            FieldDef::new("multipleOpts", string())
                .argument(ArgumentDef::new("opt1", int()).default_value(Value::Int(0)))
                .argument(ArgumentDef::new("opt2", int()).default_value(Value::Int(0))),
            FieldDef::new("multipleOptAndReq", string())
                .argument(ArgumentDef::new("req1", int().non_null()))
                .argument(ArgumentDef::new("req2", int().non_null()))
                .argument(ArgumentDef::new("opt1", int()).default_value(Value::Int(0)))
                .argument(ArgumentDef::new("opt2", int()).default_value(Value::Int(0))),
        ]
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect(),
        ..Default::default()
    };

    let query_root = ObjectType {
        name: "QueryRoot".into(),
        fields: [
            FieldDef::new("human", TypeRef::named("Human"))
                .argument(ArgumentDef::new("id", TypeRef::named("ID"))),
            FieldDef::new("alien", TypeRef::named("Alien")),
            FieldDef::new("dog", TypeRef::named("Dog")),
            FieldDef::new("cat", TypeRef::named("Cat")),
            FieldDef::new("pet", TypeRef::named("Pet")),
            FieldDef::new("catOrDog", TypeRef::named("CatOrDog")),
            FieldDef::new("dogOrHuman", TypeRef::named("DogOrHuman")),
            FieldDef::new("humanOrAlien", TypeRef::named("HumanOrAlien")),
            FieldDef::new("complicatedArgs", TypeRef::named("ComplicatedArgs")),
        ]
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect(),
        ..Default::default()
    };

    SchemaBuilder::new()
        .register(MetaType::Interface(being))
        .register(MetaType::Interface(pet))
        .register(MetaType::Interface(canine))
        .register(MetaType::Interface(intelligent))
        .register(MetaType::Enum(dog_command))
        .register(MetaType::Enum(fur_color))
        .register(MetaType::Object(dog))
        .register(MetaType::Object(cat))
        .register(MetaType::Union(cat_or_dog))
        .register(MetaType::Object(human))
        .register(MetaType::Object(alien))
        .register(MetaType::Union(dog_or_human))
        .register(MetaType::Union(human_or_alien))
        .register(MetaType::InputObject(complex_input))
        .register(MetaType::Object(complicated_args))
        .register(MetaType::Object(query_root))
        .query("QueryRoot")
        .build()
        .expect("test schema is well-formed")
}

fn run<V: Visitor + Default + 'static>(query: &str) -> Vec<RuleError> {
    let schema = test_schema();
    let document = crate::parser::parse_document(query).expect("test query parses");
    let mut ctx = super::context::ValidatorContext::new(&schema, &document, false);
    let mut multi = MultiVisitor::new(vec![Box::new(V::default())]);
    visitor::visit(&mut ctx, &document, &mut multi);
    ctx.into_errors()
}

pub fn expect_passes_rule<V: Visitor + Default + 'static>(query: &str) {
    let errors = run::<V>(query);
    assert!(errors.is_empty(), "expected no errors, got: {errors:?}");
}

pub fn expect_fails_rule<V: Visitor + Default + 'static>(query: &str, expected: &[(&str, &[(usize, usize)])]) {
    let errors = run::<V>(query);
    let actual: Vec<(String, Vec<(usize, usize)>)> = errors
        .iter()
        .map(|e| {
            (
                e.message().to_string(),
                e.locations().iter().map(|l| (l.line, l.column)).collect(),
            )
        })
        .collect();
    let expected: Vec<(String, Vec<(usize, usize)>)> = expected
        .iter()
        .map(|(msg, locs)| ((*msg).to_string(), locs.to_vec()))
        .collect();
    pretty_assertions::assert_eq!(actual, expected);
}

#[allow(dead_code)]
pub fn loc(line: usize, column: usize) -> SourcePosition {
    SourcePosition { line, column }
}
