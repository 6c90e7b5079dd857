//! async-graphql adapters
//!
//! Translates [`ExecutionRequest`] into `async_graphql::Request` and the
//! engine's `Response` back into an [`ExecutionOutcome`], classifying each
//! error on the way.

use async_graphql::dynamic;
use async_graphql::{ObjectType, Request, Response, Schema, ServerError, SubscriptionType, Variables};
use async_trait::async_trait;
use serde_json::{Map, Value};

use super::ExecutionEngine;
use crate::core::{
    EngineError, ErrorType, ExecutionError, ExecutionOutcome, ExecutionRequest, PathSegment,
    SourceLocation,
};

/// Extension key carrying an explicit error classification
pub const CLASSIFICATION_KEY: &str = "classification";

#[async_trait]
impl<Query, Mutation, Subscription> ExecutionEngine for Schema<Query, Mutation, Subscription>
where
    Query: ObjectType + 'static,
    Mutation: ObjectType + 'static,
    Subscription: SubscriptionType + 'static,
{
    async fn run(&self, request: &ExecutionRequest) -> Result<ExecutionOutcome, EngineError> {
        let response = self.execute(to_graphql_request(request)?).await;
        from_graphql_response(response)
    }
}

#[async_trait]
impl ExecutionEngine for dynamic::Schema {
    async fn run(&self, request: &ExecutionRequest) -> Result<ExecutionOutcome, EngineError> {
        let response = self.execute(to_graphql_request(request)?).await;
        from_graphql_response(response)
    }
}

/// Build the engine request: document, operation, variables, extensions and
/// the request context as request data
pub fn to_graphql_request(request: &ExecutionRequest) -> Result<Request, EngineError> {
    let mut graphql_request = Request::new(request.query());

    if let Some(operation_name) = request.operation_name() {
        graphql_request = graphql_request.operation_name(operation_name);
    }

    if !request.variables().is_empty() {
        graphql_request = graphql_request.variables(Variables::from_json(Value::Object(
            request.variables().clone(),
        )));
    }

    for (name, value) in request.extensions() {
        let value = async_graphql::Value::from_json(value.clone()).map_err(|e| {
            EngineError::InvalidRequest {
                message: format!("extension '{}' is not a GraphQL value: {}", name, e),
            }
        })?;
        graphql_request.extensions.insert(name.clone(), value);
    }

    if let Some(context) = request.context() {
        graphql_request = graphql_request.data(context.clone());
    }

    Ok(graphql_request)
}

/// Convert an engine response into an outcome
///
/// Data is dropped (reported as absent) only when the engine returned `null`
/// because the request never reached execution.
pub fn from_graphql_response(response: Response) -> Result<ExecutionOutcome, EngineError> {
    let data = response
        .data
        .into_json()
        .map_err(|e| EngineError::InvalidResponse {
            message: format!("data is not representable as JSON: {}", e),
        })?;
    let data_is_null = data.is_null();

    let errors: Vec<ExecutionError> = response
        .errors
        .into_iter()
        .map(|error| convert_error(error, data_is_null))
        .collect();

    let rejected = data_is_null
        && errors
            .iter()
            .any(|e| e.error_type == ErrorType::ValidationError);

    let mut extensions = Map::new();
    for (name, value) in response.extensions {
        let value = value.into_json().map_err(|e| EngineError::InvalidResponse {
            message: format!("extension '{}' is not representable as JSON: {}", name, e),
        })?;
        extensions.insert(name, value);
    }

    Ok(ExecutionOutcome {
        data: (!rejected).then_some(data),
        errors,
        extensions: (!extensions.is_empty()).then_some(extensions),
    })
}

fn convert_error(error: ServerError, data_is_null: bool) -> ExecutionError {
    let extensions = error
        .extensions
        .as_ref()
        .and_then(|ext| serde_json::to_value(ext).ok())
        .and_then(|value| match value {
            Value::Object(map) if !map.is_empty() => Some(map),
            _ => None,
        });

    let path: Vec<PathSegment> = error
        .path
        .into_iter()
        .map(|segment| match segment {
            async_graphql::PathSegment::Field(name) => PathSegment::Field(name),
            async_graphql::PathSegment::Index(index) => PathSegment::Index(index),
        })
        .collect();

    let error_type = classify(extensions.as_ref(), !path.is_empty(), data_is_null);

    ExecutionError {
        message: error.message,
        locations: error
            .locations
            .into_iter()
            .map(|pos| SourceLocation {
                line: pos.line,
                column: pos.column,
            })
            .collect(),
        path: (!path.is_empty()).then_some(path),
        error_type,
        extensions,
    }
}

/// Decide the error type, first match wins:
/// explicit classification, path-less error with null data (rejected before
/// execution), error with a path (raised while resolving), anything else.
fn classify(extensions: Option<&Map<String, Value>>, has_path: bool, data_is_null: bool) -> ErrorType {
    if let Some(name) = extensions
        .and_then(|ext| ext.get(CLASSIFICATION_KEY))
        .and_then(Value::as_str)
    {
        return ErrorType::from_classification(name);
    }

    match (has_path, data_is_null) {
        (false, true) => ErrorType::ValidationError,
        (true, _) => ErrorType::DataFetchingException,
        (false, false) => ErrorType::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RequestContext;
    use async_graphql::{Context, EmptyMutation, EmptySubscription, Error, ErrorExtensions, Object};
    use axum::http::{HeaderMap, HeaderValue};
    use serde_json::json;

    struct Query;

    #[Object]
    impl Query {
        async fn hello(&self, name: Option<String>) -> String {
            match name {
                Some(name) => format!("Hello, {}!", name),
                None => "Hello!".to_string(),
            }
        }

        async fn tenant(&self, ctx: &Context<'_>) -> Option<String> {
            ctx.data_opt::<RequestContext>()
                .and_then(|c| c.header("x-tenant"))
                .map(str::to_owned)
        }

        async fn aborted(&self) -> async_graphql::Result<String> {
            Err(Error::new("stopped").extend_with(|_, e| e.set(CLASSIFICATION_KEY, "ExecutionAborted")))
        }

        async fn maybe_fail(&self) -> async_graphql::Result<Option<String>> {
            Err(Error::new("resolver blew up"))
        }
    }

    fn schema() -> Schema<Query, EmptyMutation, EmptySubscription> {
        Schema::new(Query, EmptyMutation, EmptySubscription)
    }

    #[tokio::test]
    async fn test_derived_schema_runs_query() {
        let outcome = schema()
            .run(&ExecutionRequest::new("{ hello }"))
            .await
            .expect("engine should run");

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.data, Some(json!({"hello": "Hello!"})));
    }

    #[tokio::test]
    async fn test_variables_and_operation_name_are_forwarded() {
        let request = ExecutionRequest::new(
            "query A { hello } query B($name: String) { hello(name: $name) }",
        )
        .with_operation_name("B")
        .with_variable("name", "Rust");

        let outcome = schema().run(&request).await.expect("engine should run");
        assert_eq!(outcome.data, Some(json!({"hello": "Hello, Rust!"})));
    }

    #[tokio::test]
    async fn test_context_reaches_resolvers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-tenant", HeaderValue::from_static("acme"));
        let request =
            ExecutionRequest::new("{ tenant }").with_context(RequestContext::from_headers(headers));

        let outcome = schema().run(&request).await.expect("engine should run");
        assert_eq!(outcome.data, Some(json!({"tenant": "acme"})));
    }

    #[tokio::test]
    async fn test_unknown_field_is_validation_error_without_data() {
        let outcome = schema()
            .run(&ExecutionRequest::new("{ unknown }"))
            .await
            .expect("engine should run");

        assert!(!outcome.is_data_present());
        assert_eq!(outcome.errors.len(), 1);
        let error = &outcome.errors[0];
        assert_eq!(error.error_type, ErrorType::ValidationError);
        assert!(
            error
                .message
                .starts_with("Unknown field \"unknown\" on type \"Query\"."),
            "unexpected message: {}",
            error.message
        );
        assert!(!error.locations.is_empty());
        assert!(error.path.is_none());
    }

    #[tokio::test]
    async fn test_syntax_error_is_validation_error() {
        let outcome = schema()
            .run(&ExecutionRequest::new("{ hello"))
            .await
            .expect("engine should run");

        assert!(!outcome.is_data_present());
        assert_eq!(outcome.errors[0].error_type, ErrorType::ValidationError);
    }

    #[tokio::test]
    async fn test_resolver_failure_keeps_partial_data() {
        let outcome = schema()
            .run(&ExecutionRequest::new("{ hello maybeFail }"))
            .await
            .expect("engine should run");

        // async-graphql leaves a failed nullable field out of `data`
        assert_eq!(outcome.data, Some(json!({"hello": "Hello!"})));
        assert!(outcome.field("maybeFail").is_none());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].error_type, ErrorType::DataFetchingException);
        assert_eq!(outcome.errors[0].path_string().as_deref(), Some("maybeFail"));
    }

    #[tokio::test]
    async fn test_explicit_classification_wins() {
        let outcome = schema()
            .run(&ExecutionRequest::new("{ aborted }"))
            .await
            .expect("engine should run");

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].error_type, ErrorType::ExecutionAborted);
        assert!(outcome.is_data_present());
    }

    #[test]
    fn test_classify_rules() {
        assert_eq!(classify(None, false, true), ErrorType::ValidationError);
        assert_eq!(classify(None, true, true), ErrorType::DataFetchingException);
        assert_eq!(classify(None, false, false), ErrorType::Other);

        let mut ext = Map::new();
        ext.insert(CLASSIFICATION_KEY.to_string(), json!("DataFetchingException"));
        assert_eq!(classify(Some(&ext), false, true), ErrorType::DataFetchingException);
    }

    #[test]
    fn test_extensions_are_forwarded() {
        let mut ext = Map::new();
        ext.insert("persistedQuery".to_string(), json!({"version": 1}));
        let request = ExecutionRequest::new("{ hello }").with_extensions(ext);
        let graphql_request = to_graphql_request(&request).expect("extensions convert");
        assert!(graphql_request.extensions.contains_key("persistedQuery"));
    }
}
