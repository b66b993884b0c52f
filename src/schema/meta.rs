//! Runtime type objects: the tagged union of scalar, enum, object, interface, union,
//! input-object, list, and non-null types.
//!
//! Named types live once in [`crate::schema::model::Schema::types`]; [`TypeRef`] is how every
//! other place in the schema (field return types, argument types, variable declarations)
//! *refers* to a named type, possibly wrapped in `List`/`NonNull`.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::ast::Value as AstValue;
use crate::error::ErrorKind;
use crate::resolve::Resolver;
use crate::value::Value;

/// A reference to a type, as it appears on a field, argument, or variable declaration.
///
/// Mirrors [`crate::ast::Type`] but is resolved against the schema's type map rather than
/// being a bare name, and is used pervasively outside variable declarations too (unlike
/// `ast::Type`, which the grammar only allows there).
#[derive(Clone, Debug, PartialEq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn non_null(self) -> Self {
        Self::NonNull(Box::new(self))
    }

    #[must_use]
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            Self::List(_) => true,
            Self::NonNull(inner) => inner.is_list(),
            Self::Named(_) => false,
        }
    }

    /// The name of the innermost named type, unwrapping any `List`/`NonNull` layers.
    pub fn innermost_name(&self) -> &str {
        match self {
            Self::Named(n) => n,
            Self::List(inner) | Self::NonNull(inner) => inner.innermost_name(),
        }
    }

    /// Strips a single outer `NonNull`, if present.
    #[must_use]
    pub fn into_nullable(self) -> Self {
        match self {
            Self::NonNull(inner) => *inner,
            other => other,
        }
    }

    /// The type one layer in, e.g. the element type of a `List`, or the wrapped type of a
    /// `NonNull`. [`None`] for a bare named type.
    pub fn unwrap_one(&self) -> Option<&TypeRef> {
        match self {
            Self::Named(_) => None,
            Self::List(inner) | Self::NonNull(inner) => Some(inner),
        }
    }

    /// Builds a [`TypeRef`] from a parsed [`crate::ast::Type`] literal (variable declarations).
    pub fn from_ast(ty: &crate::ast::Type) -> Self {
        use crate::ast::TypeModifier;
        let mut result = Self::Named(ty.innermost_name().to_string());
        for modifier in ty.modifiers() {
            result = match modifier {
                TypeModifier::List => result.list(),
                TypeModifier::NonNull => result.non_null(),
            };
        }
        result
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

type CoerceLiteral = dyn Fn(&AstValue) -> Result<Value, String> + Send + Sync;
type CoerceValue = dyn Fn(&Value) -> Result<Value, String> + Send + Sync;
type Serialize = dyn Fn(&Value) -> Result<Value, String> + Send + Sync;

/// A leaf scalar type: a name plus its three coercion operations (parse a literal, parse a
/// value, serialize a value).
#[derive(Clone)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
    parse_literal: Arc<CoerceLiteral>,
    parse_value: Arc<CoerceValue>,
    serialize: Arc<Serialize>,
}

impl ScalarType {
    pub fn new(
        name: impl Into<String>,
        parse_literal: impl Fn(&AstValue) -> Result<Value, String> + Send + Sync + 'static,
        parse_value: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
        serialize: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            parse_literal: Arc::new(parse_literal),
            parse_value: Arc::new(parse_value),
            serialize: Arc::new(serialize),
        }
    }

    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn parse_literal(&self, v: &AstValue) -> Result<Value, (ErrorKind, String)> {
        (self.parse_literal)(v).map_err(|e| (ErrorKind::LiteralCoercion, e))
    }

    pub fn parse_value(&self, v: &Value) -> Result<Value, (ErrorKind, String)> {
        (self.parse_value)(v).map_err(|e| (ErrorKind::ValueCoercion, e))
    }

    pub fn serialize(&self, v: &Value) -> Result<Value, (ErrorKind, String)> {
        (self.serialize)(v).map_err(|e| (ErrorKind::Serialization, e))
    }

    pub fn can_parse_literal(&self, v: &AstValue) -> bool {
        (self.parse_literal)(v).is_ok()
    }

    pub fn can_parse_value(&self, v: &Value) -> bool {
        (self.parse_value)(v).is_ok()
    }
}

impl fmt::Debug for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarType").field("name", &self.name).finish_non_exhaustive()
    }
}

/// One member of an [`EnumType`]: its external name, its internal value, and optional metadata.
#[derive(Clone, Debug)]
pub struct EnumValueDef {
    pub name: String,
    pub value: Value,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

impl EnumValueDef {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            description: None,
            deprecation_reason: None,
        }
    }
}

/// An enum type: an ordered, name-unique and value-unique set of members.
///
/// Name lookup is case-sensitive when parsing query literals but case-insensitive when
/// parsing values from a variables payload — the asymmetry is preserved deliberately rather
/// than unified, see DESIGN.md.
#[derive(Clone, Debug, Default)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValueDef>,
}

impl EnumType {
    pub fn new(name: impl Into<String>, values: Vec<EnumValueDef>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values,
        }
    }

    /// Case-sensitive lookup, used by `parseLiteral`.
    pub fn value_by_name(&self, name: &str) -> Option<&EnumValueDef> {
        self.values.iter().find(|v| v.name == name)
    }

    /// Case-insensitive lookup, used by `parseValue`.
    pub fn value_by_name_ci(&self, name: &str) -> Option<&EnumValueDef> {
        self.values.iter().find(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// Finds the member whose internal value matches `value`, reducing both sides to their
    /// underlying comparable form first.
    pub fn value_by_underlying(&self, value: &Value) -> Option<&EnumValueDef> {
        self.values.iter().find(|v| &v.value == value)
    }
}

#[derive(Clone, Debug)]
pub struct ArgumentDef {
    pub name: String,
    pub arg_type: TypeRef,
    pub default_value: Option<Value>,
    pub description: Option<String>,
}

impl ArgumentDef {
    pub fn new(name: impl Into<String>, arg_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            arg_type,
            default_value: None,
            description: None,
        }
    }

    #[must_use]
    pub fn default_value(mut self, v: Value) -> Self {
        self.default_value = Some(v);
        self
    }
}

#[derive(Clone)]
pub struct FieldDef {
    pub name: String,
    pub field_type: TypeRef,
    pub arguments: IndexMap<String, ArgumentDef>,
    pub resolver: Option<Resolver>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("arguments", &self.arguments.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            field_type,
            arguments: IndexMap::new(),
            resolver: None,
            description: None,
            deprecation_reason: None,
        }
    }

    #[must_use]
    pub fn argument(mut self, arg: ArgumentDef) -> Self {
        self.arguments.insert(arg.name.clone(), arg);
        self
    }

    #[must_use]
    pub fn resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, FieldDef>,
    pub interfaces: Vec<String>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A type resolver for an abstract type: given a runtime value, returns the concrete object
/// type name it should be completed as.
pub type TypeResolverFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

#[derive(Clone, Default)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, FieldDef>,
    pub possible_types: Vec<String>,
    pub type_resolver: Option<TypeResolverFn>,
}

impl fmt::Debug for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceType")
            .field("name", &self.name)
            .field("possible_types", &self.possible_types)
            .finish_non_exhaustive()
    }
}

impl InterfaceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Default)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    pub possible_types: Vec<String>,
    pub type_resolver: Option<TypeResolverFn>,
}

impl fmt::Debug for UnionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionType")
            .field("name", &self.name)
            .field("possible_types", &self.possible_types)
            .finish_non_exhaustive()
    }
}

impl UnionType {
    pub fn new(name: impl Into<String>, possible_types: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            possible_types,
            type_resolver: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct InputFieldDef {
    pub name: String,
    pub input_type: TypeRef,
    pub default_value: Option<Value>,
    pub description: Option<String>,
}

impl InputFieldDef {
    pub fn new(name: impl Into<String>, input_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            input_type,
            default_value: None,
            description: None,
        }
    }

    #[must_use]
    pub fn default_value(mut self, v: Value) -> Self {
        self.default_value = Some(v);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, InputFieldDef>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>, fields: Vec<InputFieldDef>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: fields.into_iter().map(|f| (f.name.clone(), f)).collect(),
        }
    }
}

/// The tagged union of every named type the schema can hold.
#[derive(Clone, Debug)]
pub enum MetaType {
    Scalar(ScalarType),
    Enum(EnumType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    InputObject(InputObjectType),
}

impl MetaType {
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(t) => &t.name,
            Self::Enum(t) => &t.name,
            Self::Object(t) => &t.name,
            Self::Interface(t) => &t.name,
            Self::Union(t) => &t.name,
            Self::InputObject(t) => &t.name,
        }
    }

    /// Input types: scalar, enum, or input-object. Used by `VariablesAreInputTypes`.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_) | Self::InputObject(_))
    }

    /// Output types: everything except input-object.
    pub fn is_output(&self) -> bool {
        !matches!(self, Self::InputObject(_))
    }

    /// Leaf types have no sub-selections. Used by `ScalarLeafs`.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_))
    }

    /// Composite types require sub-selections.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Interface(_) | Self::Union(_))
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceType> {
        match self {
            Self::Interface(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionType> {
        match self {
            Self::Union(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarType> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_input_object(&self) -> Option<&InputObjectType> {
        match self {
            Self::InputObject(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up a field definition by name on object/interface types. Unions and leaf types
    /// have no fields of their own (other than introspection meta-fields, handled separately).
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        match self {
            Self::Object(o) => o.fields.get(name),
            Self::Interface(i) => i.fields.get(name),
            _ => None,
        }
    }

    pub fn fields(&self) -> Option<&IndexMap<String, FieldDef>> {
        match self {
            Self::Object(o) => Some(&o.fields),
            Self::Interface(i) => Some(&i.fields),
            _ => None,
        }
    }
}
