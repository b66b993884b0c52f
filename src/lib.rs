//! A GraphQL schema, validator, and executor: parse a document, run it through the rule set in
//! [`validation`], then execute it against a [`schema::Schema`].

pub mod ast;
pub mod error;
pub mod executor;
mod introspection;
pub mod parser;
pub mod resolve;
pub mod schema;
pub mod validation;
pub mod value;

pub use error::{ErrorKind, ExecutionError, GraphQLError, Response};
pub use executor::{CancellationHandle, ExecutionConfig, Variables};
pub use resolve::{FieldError, FieldResult, ResolveContext, Resolver, UserContext};
pub use schema::{Schema, SchemaBuilder};
pub use validation::RuleError;
pub use value::Value;

/// Runs the full pipeline: parse, validate, execute. A parse or validation failure
/// short-circuits with no `data` key; everything past that point reaches the executor, whose
/// field-level failures instead surface as partial results alongside whatever data could still
/// be produced.
pub async fn execute(
    schema: &Schema,
    query: &str,
    operation_name: Option<&str>,
    variables: &serde_json::Value,
    user_context: UserContext,
    config: ExecutionConfig,
) -> Response {
    let document = match parser::parse_document(query) {
        Ok(doc) => doc,
        Err(e) => return Response::from(GraphQLError::from(e)),
    };

    let rule_errors = validation::validate(schema, &document, config.fail_on_first_error);
    if !rule_errors.is_empty() {
        return Response::from(GraphQLError::from(rule_errors));
    }

    executor::execute(schema, &document, operation_name, variables, user_context, config).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::resolve::sync_resolver;
    use crate::schema::meta::{FieldDef, ObjectType, TypeRef};
    use crate::schema::{MetaType, Schema, SchemaBuilder};
    use crate::value::Value;
    use crate::{ExecutionConfig, execute};

    fn test_schema() -> Schema {
        let query = ObjectType {
            fields: [FieldDef::new("greeting", TypeRef::named("String").non_null())
                .resolver(sync_resolver(|_ctx| Ok(Value::String("hi".to_string()))))]
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect(),
            ..ObjectType::new("Query")
        };
        SchemaBuilder::new().register(MetaType::Object(query)).query("Query").build().unwrap()
    }

    #[tokio::test]
    async fn a_parse_failure_short_circuits_with_no_data_key() {
        let schema = test_schema();
        let response = execute(
            &schema,
            "{ greeting",
            None,
            &json!({}),
            Arc::new(()),
            ExecutionConfig::default(),
        )
        .await;

        assert!(response.data.is_none());
        assert_eq!(response.errors.len(), 1);
    }

    #[tokio::test]
    async fn a_validation_failure_short_circuits_with_no_data_key() {
        let schema = test_schema();
        let response = execute(
            &schema,
            "{ nonexistentField }",
            None,
            &json!({}),
            Arc::new(()),
            ExecutionConfig::default(),
        )
        .await;

        assert!(response.data.is_none());
        assert_eq!(response.errors.len(), 1);
    }

    #[tokio::test]
    async fn a_valid_query_executes_and_returns_data() {
        let schema = test_schema();
        let response = execute(
            &schema,
            "{ greeting }",
            None,
            &json!({}),
            Arc::new(()),
            ExecutionConfig::default(),
        )
        .await;

        assert!(response.errors.is_empty());
        assert_eq!(response.data.unwrap().get_field("greeting"), Some(&Value::String("hi".to_string())));
    }
}
