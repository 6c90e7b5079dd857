//! Execution results as reported by an engine
//!
//! An [`ExecutionOutcome`] is produced once per request and is read-only
//! afterwards. It follows GraphQL's partial-result semantics: `data` may be
//! populated even when `errors` is not empty.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Classification of a GraphQL error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    /// Rejected before execution (syntax or schema validation)
    ValidationError,
    /// Execution stopped before all fields were resolved
    ExecutionAborted,
    /// A resolver failed, or a non-null field resolved to null
    DataFetchingException,
    #[default]
    Other,
}

impl ErrorType {
    /// Parse a classification name as carried in error extensions
    ///
    /// Unknown names map to [`ErrorType::Other`].
    pub fn from_classification(name: &str) -> Self {
        match name {
            "ValidationError" => ErrorType::ValidationError,
            "ExecutionAborted" => ErrorType::ExecutionAborted,
            "DataFetchingException" => ErrorType::DataFetchingException,
            _ => ErrorType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::ValidationError => "ValidationError",
            ErrorType::ExecutionAborted => "ExecutionAborted",
            ErrorType::DataFetchingException => "DataFetchingException",
            ErrorType::Other => "Other",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of an error in the query document (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

/// One step of a response path: a field name or a list index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Field(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A single GraphQL error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionError {
    pub message: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<SourceLocation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,

    #[serde(skip)]
    pub error_type: ErrorType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>, error_type: ErrorType) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: None,
            error_type,
            extensions: None,
        }
    }

    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.locations.push(SourceLocation { line, column });
        self
    }

    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = (!path.is_empty()).then_some(path);
        self
    }

    pub fn with_extensions(mut self, extensions: Map<String, Value>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Response path rendered as `a.b.0.c`
    pub fn path_string(&self) -> Option<String> {
        self.path.as_ref().map(|segments| {
            segments
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(".")
        })
    }

    /// GraphQL response form, with the classification folded into extensions
    pub fn to_specification(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(obj) = &mut value {
            let extensions = obj
                .entry("extensions")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(ext) = extensions {
                ext.entry("classification")
                    .or_insert_with(|| Value::String(self.error_type.as_str().to_string()));
            }
        }
        value
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path_string() {
            Some(path) => write!(f, "{} ({}) at {}", self.message, self.error_type, path),
            None => write!(f, "{} ({})", self.message, self.error_type),
        }
    }
}

/// Result of running one request through an engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionOutcome {
    /// `None` when execution never started (the request failed validation)
    pub data: Option<Value>,
    /// Errors in the order the engine reported them
    pub errors: Vec<ExecutionError>,
    pub extensions: Option<Map<String, Value>>,
}

impl ExecutionOutcome {
    /// Successful outcome carrying `data`
    pub fn from_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
            extensions: None,
        }
    }

    /// Outcome of a request that never reached execution
    pub fn from_errors(errors: Vec<ExecutionError>) -> Self {
        Self {
            data: None,
            errors,
            extensions: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<ExecutionError>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_extensions(mut self, extensions: Map<String, Value>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    pub fn is_data_present(&self) -> bool {
        self.data.is_some()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Field of the top-level data object, `None` when data or field is absent
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|data| data.get(name))
    }

    /// GraphQL-over-HTTP response body
    ///
    /// `data` is omitted when absent, `errors` when empty and `extensions`
    /// when absent.
    pub fn to_specification(&self) -> Value {
        let mut body = Map::new();
        if !self.errors.is_empty() {
            body.insert(
                "errors".to_string(),
                Value::Array(
                    self.errors
                        .iter()
                        .map(ExecutionError::to_specification)
                        .collect(),
                ),
            );
        }
        if let Some(data) = &self.data {
            body.insert("data".to_string(), data.clone());
        }
        if let Some(extensions) = &self.extensions {
            body.insert("extensions".to_string(), Value::Object(extensions.clone()));
        }
        Value::Object(body)
    }
}

impl Serialize for ExecutionOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_specification().serialize(serializer)
    }
}
