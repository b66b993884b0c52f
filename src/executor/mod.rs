//! The executor: operation selection, variable coercion, and the
//! `CollectFields` / `ExecuteSelectionSet` / `ExecuteField` / `CompleteValue` mutual recursion.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use indexmap::IndexMap;
use tracing::Instrument;

use crate::ast::{self, Document, OperationDefinition, OperationType, Selection, Spanning, Value as AstValue};
use crate::error::{ErrorKind, ExecutionError, GraphQLError, PathSegment, Response};
use crate::resolve::{ResolveContext, UserContext};
use crate::schema::meta::{FieldDef, MetaType};
use crate::schema::model::Schema;
use crate::value::{Object, Value};

/// Coerced request variables: name -> internal [`Value`].
pub type Variables = IndexMap<String, Value>;

/// Caller-tunable knobs for one [`execute`] call.
#[derive(Clone, Debug, Default)]
pub struct ExecutionConfig {
    /// Stop the validator at the first diagnostic instead of collecting all of them.
    pub fail_on_first_error: bool,
    /// A cooperative cancellation signal, observed at selection-set boundaries. Canceling before
    /// execution starts surfaces as a fatal `Canceled` error; canceling mid-execution aborts
    /// further field scheduling and keeps whatever fields already completed in `data`.
    pub cancellation: Option<CancellationHandle>,
}

/// A shared cancellation flag: cloning a handle yields another reference to the same flag, so
/// a caller holding one outside the future driving [`execute`] can request cancellation from
/// anywhere.
#[derive(Clone, Debug, Default)]
pub struct CancellationHandle(Arc<AtomicBool>);

impl CancellationHandle {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Request-scoped mutable state threaded through the selection-set walk, shared across
/// concurrently executing fields: an append-only, mutex-guarded error list and the read-only
/// inputs every field resolution needs.
struct ExecutionContext<'a> {
    schema: &'a Schema,
    fragments: IndexMap<String, &'a ast::FragmentDefinition>,
    variables: &'a Variables,
    user_context: UserContext,
    errors: Mutex<Vec<ExecutionError>>,
    cancellation: Option<CancellationHandle>,
}

impl ExecutionContext<'_> {
    fn push_error(&self, error: ExecutionError) {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).push(error);
    }

    fn is_canceled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(CancellationHandle::is_canceled)
    }
}

/// Runs a query or mutation document to completion.
pub async fn execute(
    schema: &Schema,
    document: &Document,
    operation_name: Option<&str>,
    raw_variables: &serde_json::Value,
    user_context: UserContext,
    config: ExecutionConfig,
) -> Response {
    match execute_inner(schema, document, operation_name, raw_variables, user_context, config).await {
        Ok(response) => response,
        Err(err) => Response::from(err),
    }
}

async fn execute_inner(
    schema: &Schema,
    document: &Document,
    operation_name: Option<&str>,
    raw_variables: &serde_json::Value,
    user_context: UserContext,
    config: ExecutionConfig,
) -> Result<Response, GraphQLError> {
    let operation = select_operation(document, operation_name)?;
    let variables = coerce_variables(schema, &operation.item, raw_variables)?;

    if config.cancellation.as_ref().is_some_and(CancellationHandle::is_canceled) {
        return Err(GraphQLError::Canceled);
    }

    let root_type_name = match operation.item.operation_type {
        OperationType::Query => schema.query_type_name().to_string(),
        OperationType::Mutation => {
            schema.mutation_type().map(MetaType::name).map(str::to_string).ok_or(GraphQLError::MutationRootMissing)?
        }
        OperationType::Subscription => {
            schema.subscription_type().map(MetaType::name).map(str::to_string).ok_or(GraphQLError::SubscriptionRootMissing)?
        }
    };
    let root_type = schema.type_by_name(&root_type_name).expect("root type registered at build time");

    let fragments = document.fragments().map(|f| (f.item.name.item.clone(), &f.item)).collect();

    let exec_ctx = ExecutionContext {
        schema,
        fragments,
        variables: &variables,
        user_context,
        errors: Mutex::new(Vec::new()),
        cancellation: config.cancellation,
    };

    let span = tracing::info_span!(
        "execute",
        operation_name = operation.item.name.as_ref().map(|n| n.item.as_str()).unwrap_or(""),
        operation_type = %operation.item.operation_type,
    );
    let is_mutation = matches!(operation.item.operation_type, OperationType::Mutation);
    let data = execute_selection_set(
        &exec_ctx,
        root_type,
        &Value::null(),
        &operation.item.selection_set,
        is_mutation,
        &[],
    )
    .instrument(span)
    .await;

    let errors = exec_ctx.errors.into_inner().unwrap_or_default();
    Ok(Response::data_only(data, errors))
}

fn select_operation<'a>(
    document: &'a Document,
    operation_name: Option<&str>,
) -> Result<&'a Spanning<OperationDefinition>, GraphQLError> {
    let operations: Vec<_> = document.operations().collect();
    match operation_name {
        Some(name) => operations
            .into_iter()
            .find(|op| op.item.name.as_ref().is_some_and(|n| n.item == name))
            .ok_or_else(|| GraphQLError::UnknownOperationName(name.to_string())),
        None => match operations.len() {
            1 => Ok(operations[0]),
            0 => Err(GraphQLError::UnknownOperationName(String::new())),
            _ => Err(GraphQLError::AmbiguousOperation),
        },
    }
}

/// Coerces the raw JSON variables payload against each declared variable's type.
fn coerce_variables(
    schema: &Schema,
    operation: &OperationDefinition,
    raw_variables: &serde_json::Value,
) -> Result<Variables, GraphQLError> {
    let mut result = Variables::new();
    let mut errors = Vec::new();
    let empty = serde_json::Map::new();
    let input_bag = raw_variables.as_object().unwrap_or(&empty);

    for var_def in &operation.variable_definitions {
        let name = &var_def.name.item;
        let type_ref = crate::schema::meta::TypeRef::from_ast(&var_def.var_type.item);
        let provided = input_bag.get(name);

        let value = match provided {
            None => match &var_def.default_value {
                Some(default) => match default.item.clone().into_const(&Variables::new()) {
                    Some(v) => Some(v),
                    None => Some(Value::null()),
                },
                None => {
                    if type_ref.is_non_null() {
                        errors.push(
                            ExecutionError::new(
                                ErrorKind::VariableCoercion,
                                format!("Variable \"${name}\" of required type \"{type_ref}\" was not provided."),
                            )
                            .with_location(var_def.name.start),
                        );
                    }
                    None
                }
            },
            Some(json) => {
                let internal = Value::from_json(json);
                match coerce_value_for_type(schema, &type_ref, &internal) {
                    Ok(v) => Some(v),
                    Err(msg) => {
                        errors.push(
                            ExecutionError::new(
                                ErrorKind::VariableCoercion,
                                format!(
                                    "Variable \"${name}\" got invalid value; {msg}"
                                ),
                            )
                            .with_location(var_def.name.start),
                        );
                        None
                    }
                }
            }
        };

        if let Some(v) = value {
            result.insert(name.clone(), v);
        }
    }

    if errors.is_empty() {
        Ok(result)
    } else {
        Err(GraphQLError::VariableCoercion(errors))
    }
}

fn coerce_value_for_type(schema: &Schema, type_ref: &crate::schema::meta::TypeRef, value: &Value) -> Result<Value, String> {
    use crate::schema::meta::TypeRef;
    match type_ref {
        TypeRef::NonNull(inner) => {
            if value.is_null() {
                return Err(format!("Expected \"{type_ref}\", found null."));
            }
            coerce_value_for_type(schema, inner, value)
        }
        TypeRef::List(inner) => {
            if value.is_null() {
                return Ok(Value::null());
            }
            match value.as_list() {
                Some(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for item in items {
                        out.push(coerce_value_for_type(schema, inner, item)?);
                    }
                    Ok(Value::list(out))
                }
                None => Ok(Value::list(vec![coerce_value_for_type(schema, inner, value)?])),
            }
        }
        TypeRef::Named(name) => {
            if value.is_null() {
                return Ok(Value::null());
            }
            match schema.type_by_name(name) {
                Some(MetaType::Scalar(s)) => s.parse_value(value).map_err(|(_, msg)| msg),
                Some(MetaType::Enum(e)) => {
                    let name_str = value.as_str().ok_or_else(|| format!("Enum \"{}\" cannot represent non-string value.", e.name))?;
                    e.value_by_name_ci(name_str)
                        .map(|v| v.value.clone())
                        .ok_or_else(|| format!("Value \"{name_str}\" does not exist in \"{}\" enum.", e.name))
                }
                Some(MetaType::InputObject(o)) => {
                    let obj = value.as_object().ok_or_else(|| format!("Expected \"{}\" to be an object.", o.name))?;
                    let mut out = Object::new();
                    for field in o.fields.values() {
                        match obj.get(&field.name) {
                            Some(v) => {
                                out.insert(field.name.clone(), coerce_value_for_type(schema, &field.input_type, v)?);
                            }
                            None => match &field.default_value {
                                Some(d) => {
                                    out.insert(field.name.clone(), d.clone());
                                }
                                None if field.input_type.is_non_null() => {
                                    return Err(format!("Field \"{}\" of required type \"{}\" was not provided.", field.name, field.input_type));
                                }
                                None => {}
                            },
                        }
                    }
                    Ok(Value::object(out))
                }
                _ => Err(format!("Unknown input type \"{name}\".")),
            }
        }
    }
}

/// `CollectFields`: expands fragment spreads and inline fragments into a flat,
/// response-key-ordered map of same-key field groups, honoring `@skip`/`@include`.
fn collect_fields<'a>(
    ctx: &ExecutionContext<'a>,
    object_type: &MetaType,
    selection_set: &'a [Selection],
    visited_fragments: &mut HashSet<&'a str>,
    out: &mut IndexMap<String, Vec<&'a ast::Field>>,
) {
    for selection in selection_set {
        match selection {
            Selection::Field(field) => {
                if should_skip(ctx, &field.item.directives) {
                    continue;
                }
                out.entry(field.item.response_key().to_string()).or_default().push(&field.item);
            }
            Selection::FragmentSpread(spread) => {
                if should_skip(ctx, &spread.item.directives) {
                    continue;
                }
                let name = spread.item.name.item.as_str();
                if !visited_fragments.insert(name) {
                    continue;
                }
                let Some(fragment) = ctx.fragments.get(name) else { continue };
                if !type_applies(ctx.schema, &fragment.type_condition.item, object_type.name()) {
                    continue;
                }
                collect_fields(ctx, object_type, &fragment.selection_set, visited_fragments, out);
            }
            Selection::InlineFragment(inline) => {
                if should_skip(ctx, &inline.item.directives) {
                    continue;
                }
                if let Some(cond) = &inline.item.type_condition {
                    if !type_applies(ctx.schema, &cond.item, object_type.name()) {
                        continue;
                    }
                }
                collect_fields(ctx, object_type, &inline.item.selection_set, visited_fragments, out);
            }
        }
    }
}

fn type_applies(schema: &Schema, condition: &str, object_type_name: &str) -> bool {
    schema.is_possible_type(condition, object_type_name)
}

/// `@skip(if:)` wins over `@include(if:)` when both are present.
fn should_skip(ctx: &ExecutionContext<'_>, directives: &[Spanning<ast::Directive>]) -> bool {
    let mut include = true;
    for directive in directives {
        let Some(arg) = directive.item.argument("if") else { continue };
        let value = resolve_bool_arg(ctx, &arg.item);
        match directive.item.name.item.as_str() {
            "skip" => {
                if value {
                    return true;
                }
            }
            "include" => include = include && value,
            _ => {}
        }
    }
    !include
}

fn resolve_bool_arg(ctx: &ExecutionContext<'_>, value: &AstValue) -> bool {
    value
        .clone()
        .into_const(ctx.variables)
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// Whether a field's declared return type is `NonNull`, including the synthetic introspection
/// fields that bypass the normal [`FieldDef`] lookup in [`execute_field`].
fn field_type_is_non_null(object_type: &MetaType, field_ast: &ast::Field) -> bool {
    match field_ast.name.item.as_str() {
        "__typename" | "__schema" => true,
        "__type" => false,
        name => object_type.field(name).is_some_and(|f| f.field_type.is_non_null()),
    }
}

/// `ExecuteSelectionSet`. `is_mutation_root` selects sequential vs. concurrent field scheduling.
///
/// Returns `Value::Null`, not a half-built object, when one of this selection set's own fields
/// is `NonNull`-typed and came back null: the violation was already recorded where it occurred,
/// and nulling the whole object here lets it keep propagating to the nearest nullable ancestor
/// if the caller wraps this position in `NonNull` too.
fn execute_selection_set<'a>(
    ctx: &'a ExecutionContext<'a>,
    object_type: &'a MetaType,
    source: &'a Value,
    selection_set: &'a [Selection],
    is_mutation_root: bool,
    path: &'a [PathSegment],
) -> futures::future::BoxFuture<'a, Value> {
    Box::pin(async move {
        if ctx.is_canceled() {
            ctx.push_error(ExecutionError::new(ErrorKind::Canceled, "Execution was canceled").with_path(path.to_vec()));
            return Value::Null;
        }

        let mut grouped = IndexMap::new();
        let mut visited = HashSet::new();
        collect_fields(ctx, object_type, selection_set, &mut visited, &mut grouped);

        let response_keys: Vec<&String> = grouped.keys().collect();

        let mut violated = false;
        let mut result = Object::new();

        if is_mutation_root {
            for key in response_keys {
                if ctx.is_canceled() {
                    ctx.push_error(ExecutionError::new(ErrorKind::Canceled, "Execution was canceled").with_path(path.to_vec()));
                    break;
                }
                let fields = &grouped[key];
                let value = execute_field(ctx, object_type, source, key, fields, path).await;
                if value.is_null() && field_type_is_non_null(object_type, fields[0]) {
                    violated = true;
                }
                result.insert(key.clone(), value);
            }
        } else {
            let futures = response_keys.iter().map(|key| {
                let fields = &grouped[*key];
                execute_field(ctx, object_type, source, key, fields, path)
            });
            let values = join_all(futures).await;
            for (key, value) in response_keys.iter().zip(values) {
                let fields = &grouped[*key];
                if value.is_null() && field_type_is_non_null(object_type, fields[0]) {
                    violated = true;
                }
                result.insert((*key).clone(), value);
            }
        }

        if violated {
            Value::Null
        } else {
            Value::object(result)
        }
    })
}

/// `ExecuteField`: resolves one field group, coercing its arguments and completing its value.
async fn execute_field(
    ctx: &ExecutionContext<'_>,
    object_type: &MetaType,
    source: &Value,
    response_key: &str,
    fields: &[&ast::Field],
    parent_path: &[PathSegment],
) -> Value {
    let field_ast = fields[0];
    let field_name = field_ast.name.item.as_str();

    let mut path = parent_path.to_vec();
    path.push(PathSegment::Field(response_key.to_string()));

    let span = tracing::debug_span!("field", path = %format_path(&path));
    let _enter = span.enter();

    if field_name == "__typename" {
        return Value::String(object_type.name().to_string());
    }
    if field_name == "__schema" {
        let value = crate::introspection::schema_value(ctx.schema);
        return complete_value(ctx, &crate::schema::meta::TypeRef::named("__Schema").non_null(), fields, &value, &path).await;
    }
    if field_name == "__type" {
        let requested = field_ast
            .argument("name")
            .and_then(|v| v.item.clone().into_const(ctx.variables))
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let value = crate::introspection::type_value(ctx.schema, &requested);
        return complete_value(ctx, &crate::schema::meta::TypeRef::named("__Type"), fields, &value, &path).await;
    }

    let Some(field_def) = object_type.field(field_name) else {
        return Value::null();
    };

    let arguments = match coerce_arguments(ctx, field_def, field_ast) {
        Ok(args) => args,
        Err(msg) => {
            ctx.push_error(ExecutionError::new(ErrorKind::Internal, msg).with_path(path.clone()));
            return Value::null();
        }
    };

    let resolved = match &field_def.resolver {
        Some(resolver) => {
            let resolve_ctx = ResolveContext {
                field_name: field_name.to_string(),
                arguments,
                source: source.clone(),
                context: Arc::clone(&ctx.user_context),
            };
            resolver(resolve_ctx).await
        }
        None => Ok(source.get_field(field_name).cloned().unwrap_or(Value::null())),
    };

    match resolved {
        Ok(value) => complete_value(ctx, &field_def.field_type, fields, &value, &path).await,
        Err(field_error) => {
            ctx.push_error(
                ExecutionError::new(ErrorKind::Resolver, field_error.message)
                    .with_path(path.clone())
                    .with_extensions(field_error.extensions),
            );
            Value::null()
        }
    }
}

fn format_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(|seg| match seg {
            PathSegment::Field(f) => f.clone(),
            PathSegment::Index(i) => i.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn coerce_arguments(
    ctx: &ExecutionContext<'_>,
    field_def: &FieldDef,
    field_ast: &ast::Field,
) -> Result<IndexMap<String, Value>, String> {
    let mut result = IndexMap::new();
    for arg_def in field_def.arguments.values() {
        let literal = field_ast.argument(&arg_def.name);
        let value = match literal {
            Some(ast_value) => ast_value.item.clone().into_const(ctx.variables).unwrap_or(Value::null()),
            None => match &arg_def.default_value {
                Some(v) => v.clone(),
                None => continue,
            },
        };
        result.insert(arg_def.name.clone(), value);
    }
    Ok(result)
}

/// `CompleteValue`: boxed because it recurses through `execute_selection_set`.
fn complete_value<'a>(
    ctx: &'a ExecutionContext<'a>,
    type_ref: &'a crate::schema::meta::TypeRef,
    fields: &'a [&'a ast::Field],
    result: &'a Value,
    path: &'a [PathSegment],
) -> futures::future::BoxFuture<'a, Value> {
    use crate::schema::meta::TypeRef;
    Box::pin(async move {
        match type_ref {
            TypeRef::NonNull(inner) => {
                let completed = complete_value(ctx, inner, fields, result, path).await;
                if completed.is_null() {
                    ctx.push_error(
                        ExecutionError::new(
                            ErrorKind::NonNullViolation,
                            format!("Cannot return null for non-nullable field \"{}\".", fields[0].response_key()),
                        )
                        .with_path(path.to_vec()),
                    );
                }
                completed
            }
            _ if result.is_null() => Value::null(),
            TypeRef::List(inner) => {
                let Some(items) = result.as_list() else {
                    ctx.push_error(ExecutionError::new(ErrorKind::ListExpected, "Expected iterable value.").with_path(path.to_vec()));
                    return Value::null();
                };
                let mut out = Vec::with_capacity(items.len());
                let mut saw_null_violation = false;
                for (i, item) in items.iter().enumerate() {
                    let mut elem_path = path.to_vec();
                    elem_path.push(PathSegment::Index(i));
                    let completed = complete_value(ctx, inner, fields, item, &elem_path).await;
                    if inner.is_non_null() && completed.is_null() {
                        saw_null_violation = true;
                    }
                    out.push(completed);
                }
                if saw_null_violation {
                    Value::null()
                } else {
                    Value::list(out)
                }
            }
            TypeRef::Named(name) => {
                let Some(meta) = ctx.schema.type_by_name(name) else {
                    ctx.push_error(ExecutionError::new(ErrorKind::Internal, format!("Unknown type \"{name}\".")).with_path(path.to_vec()));
                    return Value::null();
                };
                match meta {
                    MetaType::Scalar(s) => match s.serialize(result) {
                        Ok(v) => v,
                        Err((kind, msg)) => {
                            ctx.push_error(ExecutionError::new(kind, msg).with_path(path.to_vec()));
                            Value::null()
                        }
                    },
                    MetaType::Enum(e) => match e.value_by_underlying(result) {
                        Some(member) => Value::String(member.name.clone()),
                        None => {
                            ctx.push_error(
                                ExecutionError::new(ErrorKind::Serialization, format!("Value is not a valid member of enum \"{}\".", e.name))
                                    .with_path(path.to_vec()),
                            );
                            Value::null()
                        }
                    },
                    MetaType::Interface(_) | MetaType::Union(_) => {
                        let Some(concrete_name) = resolve_abstract_type(ctx.schema, meta, result) else {
                            ctx.push_error(
                                ExecutionError::new(ErrorKind::AbstractResolution, format!("Could not resolve concrete type for \"{name}\"."))
                                    .with_path(path.to_vec()),
                            );
                            return Value::null();
                        };
                        let Some(concrete) = ctx.schema.type_by_name(&concrete_name) else {
                            ctx.push_error(
                                ExecutionError::new(ErrorKind::AbstractResolution, format!("Unknown concrete type \"{concrete_name}\"."))
                                    .with_path(path.to_vec()),
                            );
                            return Value::null();
                        };
                        let merged = merge_selection_sets(fields);
                        execute_selection_set(ctx, concrete, result, &merged, false, path).await
                    }
                    MetaType::Object(_) => {
                        let merged = merge_selection_sets(fields);
                        execute_selection_set(ctx, meta, result, &merged, false, path).await
                    }
                    MetaType::InputObject(_) => {
                        ctx.push_error(ExecutionError::new(ErrorKind::Internal, "Input object used as output type.").with_path(path.to_vec()));
                        Value::null()
                    }
                }
            }
        }
    })
}

fn resolve_abstract_type(schema: &Schema, meta: &MetaType, value: &Value) -> Option<String> {
    let resolver = match meta {
        MetaType::Interface(i) => i.type_resolver.as_ref(),
        MetaType::Union(u) => u.type_resolver.as_ref(),
        _ => None,
    }?;
    let name = resolver(value)?;
    let _ = schema;
    Some(name)
}

/// Merges the sub-selection sets of every field node sharing a response key, so fields with
/// the same key contribute to the same object completion.
fn merge_selection_sets(fields: &[&ast::Field]) -> Vec<Selection> {
    fields.iter().flat_map(|f| f.selection_set.clone()).collect()
}
