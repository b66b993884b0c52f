//! `ArgumentsOfCorrectType`: a literal argument value must be accepted by its declared type's
//! `canParseLiteral`.

use crate::ast::{Directive, Field, Value};
use crate::schema::meta::TypeRef;
use crate::schema::model::Schema;
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

#[derive(Default)]
pub struct ArgumentsOfCorrectType;

impl Visitor for ArgumentsOfCorrectType {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'_>, field: &Field) {
        let Some(def) = ctx.parent_type().and_then(|t| t.field(&field.name.item)) else { return };
        for (name, value) in &field.arguments {
            let Some(arg) = def.arguments.get(&name.item) else { continue };
            check_literal(ctx, &arg.arg_type, &value.item, value.start, &name.item);
        }
    }

    fn enter_directive(&mut self, ctx: &mut ValidatorContext<'_>, directive: &Directive) {
        let Some(def) = ctx.schema.directive_by_name(&directive.name.item) else { return };
        for (name, value) in &directive.arguments {
            let Some(arg) = def.arguments.get(&name.item) else { continue };
            check_literal(ctx, &arg.arg_type, &value.item, value.start, &name.item);
        }
    }
}

fn check_literal(ctx: &mut ValidatorContext<'_>, type_ref: &TypeRef, value: &Value, loc: crate::ast::SourcePosition, arg_name: &str) {
    if value.is_variable() {
        return;
    }
    if !literal_matches(ctx.schema, type_ref, value) {
        ctx.report_error(
            format!("Argument \"{arg_name}\" has invalid value {value}; expected type \"{type_ref}\"."),
            vec![loc],
        );
    }
}

fn literal_matches(schema: &Schema, type_ref: &TypeRef, value: &Value) -> bool {
    match type_ref {
        TypeRef::NonNull(inner) => !matches!(value, Value::Null) && literal_matches(schema, inner, value),
        TypeRef::List(inner) => match value {
            Value::Null => true,
            Value::List(items) => items.iter().all(|v| v.item.is_variable() || literal_matches(schema, inner, &v.item)),
            other => other.is_variable() || literal_matches(schema, inner, other),
        },
        TypeRef::Named(name) => {
            if matches!(value, Value::Null) {
                return true;
            }
            match schema.type_by_name(name) {
                Some(crate::schema::meta::MetaType::Scalar(s)) => s.can_parse_literal(value),
                Some(crate::schema::meta::MetaType::Enum(e)) => {
                    matches!(value, Value::Enum(n) if e.value_by_name(n).is_some())
                }
                Some(crate::schema::meta::MetaType::InputObject(o)) => match value {
                    Value::Object(fields) => fields.iter().all(|(k, v)| {
                        o.fields.get(&k.item).is_some_and(|field| v.item.is_variable() || literal_matches(schema, &field.input_type, &v.item))
                    }),
                    _ => false,
                },
                _ => false,
            }
        }
    }
}
