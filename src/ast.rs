//! Immutable typed nodes produced by [`crate::parser`], with source locations attached.
//!
//! Every node that can be the target of a validation diagnostic carries a [`SourcePosition`].
//! The tree is built once per request and borrowed for the remainder of the pipeline
//! (validation, variable coercion, execution).

use std::fmt;

use indexmap::IndexMap;

use crate::executor::Variables;

/// A 1-based line/column position in the original query source.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SourcePosition {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

impl SourcePosition {
    /// Creates a new [`SourcePosition`].
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl<T: fmt::Display> fmt::Display for Spanning<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.item, self.start)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Wraps a node with the source range it was parsed from.
#[derive(Clone, Debug, PartialEq)]
pub struct Spanning<T> {
    pub item: T,
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl<T> Spanning<T> {
    /// Creates a new [`Spanning`] wrapper around `item` spanning `[start, end]`.
    pub fn new(start: SourcePosition, end: SourcePosition, item: T) -> Self {
        Self { item, start, end }
    }

    /// Creates a [`Spanning`] with no real location information, for values constructed
    /// in-process rather than parsed from source (e.g. default values, synthesized literals).
    pub fn unlocated(item: T) -> Self {
        Self {
            item,
            start: SourcePosition::new(0, 0),
            end: SourcePosition::new(0, 0),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanning<U> {
        Spanning {
            item: f(self.item),
            start: self.start,
            end: self.end,
        }
    }

    pub fn as_ref(&self) -> Spanning<&T> {
        Spanning {
            item: &self.item,
            start: self.start,
            end: self.end,
        }
    }
}

/// A single modifier wrapping a named type: either `[T]` or `T!`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TypeModifier {
    NonNull,
    List,
}

/// Type literal as it appears in a query document (variable declarations, nowhere else).
///
/// Carries no semantic information and may name a type that does not exist in the schema;
/// resolving it against a [`crate::schema::Schema`] is the validator's job (`KnownTypeNames`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Type {
    name: String,
    /// Innermost modifier first, e.g. `[String!]` is `[NonNull, List]`.
    modifiers: Vec<TypeModifier>,
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
        }
    }

    #[must_use]
    pub fn wrap_non_null(mut self) -> Self {
        self.modifiers.push(TypeModifier::NonNull);
        self
    }

    #[must_use]
    pub fn wrap_list(mut self) -> Self {
        self.modifiers.push(TypeModifier::List);
        self
    }

    pub fn innermost_name(&self) -> &str {
        &self.name
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self.modifiers.last(), Some(TypeModifier::NonNull))
    }

    pub fn is_list(&self) -> bool {
        match self.modifiers.last() {
            Some(TypeModifier::List) => true,
            Some(TypeModifier::NonNull) => self.modifiers.len() > 1
                && matches!(self.modifiers[self.modifiers.len() - 2], TypeModifier::List),
            None => false,
        }
    }

    pub fn modifiers(&self) -> &[TypeModifier] {
        &self.modifiers
    }

    /// Strips a trailing `NonNull` modifier, if present.
    #[must_use]
    pub fn into_nullable(mut self) -> Self {
        if self.is_non_null() {
            self.modifiers.pop();
        }
        self
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn go(name: &str, modifiers: &[TypeModifier], f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match modifiers.last() {
                Some(TypeModifier::NonNull) => {
                    go(name, &modifiers[..modifiers.len() - 1], f)?;
                    write!(f, "!")
                }
                Some(TypeModifier::List) => {
                    write!(f, "[")?;
                    go(name, &modifiers[..modifiers.len() - 1], f)?;
                    write!(f, "]")
                }
                None => write!(f, "{name}"),
            }
        }
        go(&self.name, &self.modifiers, f)
    }
}

/// A literal value as written in a query document.
///
/// Unlike [`crate::value::Value`], this may contain [`Value::Variable`] references and
/// [`Value::Enum`] names that have not yet been resolved against a schema.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    Variable(String),
    List(Vec<Spanning<Value>>),
    Object(Vec<(Spanning<String>, Spanning<Value>)>),
}

impl Value {
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Recursively collects every variable name referenced by this literal.
    pub fn referenced_variables(&self) -> Vec<&str> {
        match self {
            Self::Variable(name) => vec![name.as_str()],
            Self::List(items) => items
                .iter()
                .flat_map(|v| v.item.referenced_variables())
                .collect(),
            Self::Object(fields) => fields
                .iter()
                .flat_map(|(_, v)| v.item.referenced_variables())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Substitutes every [`Value::Variable`] with its coerced value from `vars`, producing a
    /// variable-free literal. Returns [`None`] if a referenced variable is entirely absent
    /// (distinguishing "use the field/input default" from "explicit null").
    pub fn into_const(self, vars: &Variables) -> Option<crate::value::Value> {
        match self {
            Self::Variable(name) => vars.get(&name).cloned(),
            Self::Null => Some(crate::value::Value::Null),
            Self::Int(i) => Some(crate::value::Value::Int(i)),
            Self::Float(f) => Some(crate::value::Value::Float(f)),
            Self::String(s) => Some(crate::value::Value::String(s)),
            Self::Boolean(b) => Some(crate::value::Value::Boolean(b)),
            Self::Enum(e) => Some(crate::value::Value::Enum(e)),
            Self::List(items) => Some(crate::value::Value::List(
                items
                    .into_iter()
                    .map(|v| {
                        v.item
                            .into_const(vars)
                            .unwrap_or(crate::value::Value::Null)
                    })
                    .collect(),
            )),
            Self::Object(fields) => {
                let mut obj = crate::value::Object::new();
                for (k, v) in fields {
                    if let Some(cv) = v.item.into_const(vars) {
                        obj.insert(k.item, cv);
                    }
                }
                Some(crate::value::Value::Object(obj))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Enum(e) => write!(f, "{e}"),
            Self::Variable(v) => write!(f, "${v}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v.item)?;
                }
                write!(f, "]")
            }
            Self::Object(fields) => {
                write!(f, "{{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k.item, v.item)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    pub name: Spanning<String>,
    pub arguments: Vec<(Spanning<String>, Spanning<Value>)>,
}

impl Directive {
    pub fn argument(&self, name: &str) -> Option<&Spanning<Value>> {
        self.arguments
            .iter()
            .find(|(k, _)| k.item == name)
            .map(|(_, v)| v)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub alias: Option<Spanning<String>>,
    pub name: Spanning<String>,
    pub arguments: Vec<(Spanning<String>, Spanning<Value>)>,
    pub directives: Vec<Spanning<Directive>>,
    pub selection_set: Vec<Selection>,
}

impl Field {
    /// The key this field's result is stored under in the response map: its alias if
    /// present, otherwise its name.
    pub fn response_key(&self) -> &str {
        self.alias.as_ref().map_or(&self.name.item, |a| &a.item)
    }

    pub fn argument(&self, name: &str) -> Option<&Spanning<Value>> {
        self.arguments
            .iter()
            .find(|(k, _)| k.item == name)
            .map(|(_, v)| v)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FragmentSpread {
    pub name: Spanning<String>,
    pub directives: Vec<Spanning<Directive>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InlineFragment {
    pub type_condition: Option<Spanning<String>>,
    pub directives: Vec<Spanning<Directive>>,
    pub selection_set: Vec<Selection>,
}

/// One entry of a selection set: a field, a named fragment spread, or an inline fragment.
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Field(Spanning<Field>),
    FragmentSpread(Spanning<FragmentSpread>),
    InlineFragment(Spanning<InlineFragment>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition {
    pub name: Spanning<String>,
    pub var_type: Spanning<Type>,
    pub default_value: Option<Spanning<Value>>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OperationDefinition {
    pub operation_type: OperationType,
    pub name: Option<Spanning<String>>,
    pub variable_definitions: Vec<VariableDefinition>,
    pub directives: Vec<Spanning<Directive>>,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FragmentDefinition {
    pub name: Spanning<String>,
    pub type_condition: Spanning<String>,
    pub directives: Vec<Spanning<Directive>>,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    Operation(Spanning<OperationDefinition>),
    Fragment(Spanning<FragmentDefinition>),
}

/// A fully parsed query document: an unordered bag of operations and fragments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

impl Document {
    pub fn operations(&self) -> impl Iterator<Item = &Spanning<OperationDefinition>> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Operation(op) => Some(op),
            Definition::Fragment(_) => None,
        })
    }

    pub fn fragments(&self) -> impl Iterator<Item = &Spanning<FragmentDefinition>> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Fragment(f) => Some(f),
            Definition::Operation(_) => None,
        })
    }

    pub fn fragment_by_name(&self, name: &str) -> Option<&FragmentDefinition> {
        self.fragments()
            .map(|f| &f.item)
            .find(|f| f.name.item == name)
    }
}

/// Converts an ordered set of resolved arguments (name, literal) into a lookup map, as produced
/// while coercing a field's arguments during execution.
pub fn arguments_to_map(args: &[(Spanning<String>, Spanning<Value>)]) -> IndexMap<String, &Value> {
    args.iter().map(|(k, v)| (k.item.clone(), &v.item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_display_nests_wrappers_innermost_first() {
        let ty = Type::named("String").wrap_non_null().wrap_list().wrap_non_null();
        assert_eq!(ty.to_string(), "[String!]!");
        assert!(ty.is_non_null());
        assert!(ty.is_list());
    }

    #[test]
    fn into_nullable_strips_only_a_trailing_non_null() {
        let ty = Type::named("Int").wrap_non_null();
        assert!(!ty.clone().into_nullable().is_non_null());
        assert_eq!(ty.into_nullable().to_string(), "Int");
    }

    #[test]
    fn field_response_key_prefers_alias_over_name() {
        let field = Field {
            alias: Some(Spanning::unlocated("n".to_string())),
            name: Spanning::unlocated("name".to_string()),
            arguments: Vec::new(),
            directives: Vec::new(),
            selection_set: Vec::new(),
        };
        assert_eq!(field.response_key(), "n");

        let unaliased = Field { alias: None, ..field };
        assert_eq!(unaliased.response_key(), "name");
    }

    #[test]
    fn referenced_variables_collects_recursively_through_lists_and_objects() {
        let value = Value::Object(vec![(
            Spanning::unlocated("a".to_string()),
            Spanning::unlocated(Value::List(vec![Spanning::unlocated(Value::Variable("x".to_string()))])),
        )]);
        assert_eq!(value.referenced_variables(), vec!["x"]);
    }

    #[test]
    fn into_const_resolves_a_bound_variable_and_drops_an_unbound_one_from_an_object() {
        let mut vars = Variables::new();
        vars.insert("x".to_string(), crate::value::Value::Int(7));

        assert_eq!(Value::Variable("x".to_string()).into_const(&vars), Some(crate::value::Value::Int(7)));
        assert_eq!(Value::Variable("missing".to_string()).into_const(&vars), None);

        let obj = Value::Object(vec![
            (Spanning::unlocated("present".to_string()), Spanning::unlocated(Value::Variable("x".to_string()))),
            (Spanning::unlocated("absent".to_string()), Spanning::unlocated(Value::Variable("missing".to_string()))),
        ]);
        let crate::value::Value::Object(result) = obj.into_const(&vars).unwrap() else { panic!("expected object") };
        assert!(result.contains_key("present"));
        assert!(!result.contains_key("absent"));
    }
}
