//! Execution requests and their request-scoped context

use axum::http::HeaderMap;
use serde_json::{Map, Value};

/// Request-scoped value handed to resolvers
///
/// Engines make it available to field resolvers for the duration of one
/// request (the async-graphql adapter inserts it as request data, so a
/// resolver reads it with `ctx.data::<RequestContext>()`).
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    headers: HeaderMap,
    attributes: Map<String, Value>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context carrying the headers of an incoming HTTP request
    pub fn from_headers(headers: HeaderMap) -> Self {
        Self {
            headers,
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, `None` when absent or not valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

/// A GraphQL request: document, operation name, variables and context
///
/// Built once per invocation with the `with_*` methods and read-only after
/// that.
///
/// # Example
///
/// ```rust,ignore
/// let request = ExecutionRequest::new("query($name: String) { hello(name: $name) }")
///     .with_variable("name", "DGS");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExecutionRequest {
    query: String,
    operation_name: Option<String>,
    variables: Map<String, Value>,
    extensions: Map<String, Value>,
    context: Option<RequestContext>,
}

impl ExecutionRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    /// Replace all variables
    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_extensions(mut self, extensions: Map<String, Value>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }

    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }

    pub fn extensions(&self) -> &Map<String, Value> {
        &self.extensions
    }

    pub fn context(&self) -> Option<&RequestContext> {
        self.context.as_ref()
    }
}

impl From<&str> for ExecutionRequest {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

impl From<String> for ExecutionRequest {
    fn from(query: String) -> Self {
        Self::new(query)
    }
}

impl From<&String> for ExecutionRequest {
    fn from(query: &String) -> Self {
        Self::new(query.as_str())
    }
}
