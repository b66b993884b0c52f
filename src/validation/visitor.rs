//! Drives the single validation pass: every rule runs off one traversal, with a type stack
//! maintained alongside it as it walks the document.

use crate::ast::{Definition, Document, OperationType, Selection, Spanning};
use crate::schema::meta::MetaType;
use crate::validation::context::ValidatorContext;
use crate::validation::traits::Visitor;

pub fn visit(ctx: &mut ValidatorContext<'_>, document: &Document, visitor: &mut dyn Visitor) {
    visitor.enter_document(ctx);
    for definition in &document.definitions {
        if ctx.should_stop() {
            break;
        }
        match definition {
            Definition::Operation(op) => visit_operation(ctx, visitor, &op.item),
            Definition::Fragment(frag) => visit_fragment(ctx, visitor, &frag.item),
        }
    }
    visitor.exit_document(ctx);
}

fn root_type_for<'a>(ctx: &ValidatorContext<'a>, op_type: OperationType) -> Option<&'a MetaType> {
    match op_type {
        OperationType::Query => Some(ctx.schema.query_type()),
        OperationType::Mutation => ctx.schema.mutation_type(),
        OperationType::Subscription => ctx.schema.subscription_type(),
    }
}

fn visit_operation(ctx: &mut ValidatorContext<'_>, visitor: &mut dyn Visitor, op: &crate::ast::OperationDefinition) {
    visitor.enter_operation_definition(ctx, op);

    for var in &op.variable_definitions {
        if ctx.should_stop() {
            break;
        }
        visitor.enter_variable_definition(ctx, var);
        let type_ref = crate::schema::meta::TypeRef::from_ast(&var.var_type.item);
        ctx.push_input_type(Some(type_ref));
        if let Some(default) = &var.default_value {
            visit_value(ctx, visitor, &default.item);
        }
        ctx.pop_input_type();
        visitor.exit_variable_definition(ctx, var);
    }

    for directive in &op.directives {
        visit_directive(ctx, visitor, &directive.item);
    }

    let root = root_type_for(ctx, op.operation_type);
    ctx.push_type(root);
    ctx.push_parent_type(root);
    visit_selection_set(ctx, visitor, &op.selection_set);
    ctx.pop_parent_type();
    ctx.pop_type();

    visitor.exit_operation_definition(ctx, op);
}

fn visit_fragment(ctx: &mut ValidatorContext<'_>, visitor: &mut dyn Visitor, frag: &crate::ast::FragmentDefinition) {
    visitor.enter_fragment_definition(ctx, frag);

    for directive in &frag.directives {
        visit_directive(ctx, visitor, &directive.item);
    }

    let ty = ctx.schema.type_by_name(&frag.type_condition.item);
    ctx.push_type(ty);
    ctx.push_parent_type(ty);
    visit_selection_set(ctx, visitor, &frag.selection_set);
    ctx.pop_parent_type();
    ctx.pop_type();

    visitor.exit_fragment_definition(ctx, frag);
}

fn visit_selection_set(ctx: &mut ValidatorContext<'_>, visitor: &mut dyn Visitor, selections: &[Selection]) {
    visitor.enter_selection_set(ctx);
    for selection in selections {
        if ctx.should_stop() {
            break;
        }
        match selection {
            Selection::Field(field) => visit_field(ctx, visitor, &field.item),
            Selection::FragmentSpread(spread) => {
                visitor.enter_fragment_spread(ctx, &spread.item);
                for directive in &spread.item.directives {
                    visit_directive(ctx, visitor, &directive.item);
                }
                visitor.exit_fragment_spread(ctx, &spread.item);
            }
            Selection::InlineFragment(inline) => {
                visitor.enter_inline_fragment(ctx, &inline.item);
                for directive in &inline.item.directives {
                    visit_directive(ctx, visitor, &directive.item);
                }
                let ty = match &inline.item.type_condition {
                    Some(cond) => ctx.schema.type_by_name(&cond.item),
                    None => ctx.current_type(),
                };
                ctx.push_type(ty);
                ctx.push_parent_type(ty);
                visit_selection_set(ctx, visitor, &inline.item.selection_set);
                ctx.pop_parent_type();
                ctx.pop_type();
                visitor.exit_inline_fragment(ctx, &inline.item);
            }
        }
    }
    visitor.exit_selection_set(ctx);
}

fn visit_field(ctx: &mut ValidatorContext<'_>, visitor: &mut dyn Visitor, field: &crate::ast::Field) {
    visitor.enter_field(ctx, field);

    let field_def = ctx.current_type().and_then(|t| t.field(&field.name.item));
    for (name, value) in &field.arguments {
        let arg_type = field_def.and_then(|f| f.arguments.get(&name.item)).map(|a| a.arg_type.clone());
        ctx.push_input_type(arg_type);
        visit_argument(ctx, visitor, &name.item, value);
        ctx.pop_input_type();
    }
    for directive in &field.directives {
        visit_directive(ctx, visitor, &directive.item);
    }

    let field_type = field_def.map(|f| ctx.schema.resolve(&f.field_type)).and_then(|t| t);
    ctx.push_parent_type(ctx.current_type());
    ctx.push_type(field_type);
    visit_selection_set(ctx, visitor, &field.selection_set);
    ctx.pop_type();
    ctx.pop_parent_type();

    visitor.exit_field(ctx, field);
}

fn visit_directive(ctx: &mut ValidatorContext<'_>, visitor: &mut dyn Visitor, directive: &crate::ast::Directive) {
    visitor.enter_directive(ctx, directive);
    let directive_def = ctx.schema.directive_by_name(&directive.name.item);
    for (name, value) in &directive.arguments {
        let arg_type = directive_def.and_then(|d| d.arguments.get(&name.item)).map(|a| a.arg_type.clone());
        ctx.push_input_type(arg_type);
        visit_argument(ctx, visitor, &name.item, value);
        ctx.pop_input_type();
    }
    visitor.exit_directive(ctx, directive);
}

fn visit_argument(ctx: &mut ValidatorContext<'_>, visitor: &mut dyn Visitor, name: &str, value: &Spanning<crate::ast::Value>) {
    visitor.enter_argument(ctx, name, &value.item, value.start);
    visit_value(ctx, visitor, &value.item);
    visitor.exit_argument(ctx, name, &value.item, value.start);
}

fn visit_value(ctx: &mut ValidatorContext<'_>, visitor: &mut dyn Visitor, value: &crate::ast::Value) {
    match value {
        crate::ast::Value::List(items) => {
            for item in items {
                visit_value(ctx, visitor, &item.item);
            }
        }
        crate::ast::Value::Object(fields) => {
            for (_, v) in fields {
                visit_value(ctx, visitor, &v.item);
            }
        }
        _ => {}
    }
    let _ = ctx;
}
