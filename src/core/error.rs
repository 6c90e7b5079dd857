//! Typed error handling for the query executor
//!
//! Every failure the executor can report is one variant of [`ExecutorError`],
//! so callers can branch on *what* went wrong instead of parsing messages.
//!
//! # Error Categories
//!
//! - [`QueryError`]: the GraphQL engine rejected or flagged the query
//!   (validation or execution errors, always aggregated)
//! - [`PathError`]: the query succeeded but a path expression was malformed
//!   or addressed a node that does not exist
//! - [`TypeCoercionError`]: an extracted value could not be converted to the
//!   requested Rust type
//! - [`EngineError`]: infrastructure faults in the execution engine
//! - [`ConfigError`]: configuration loading and executor assembly
//!
//! # Example
//!
//! ```rust,ignore
//! use qexec::prelude::*;
//!
//! match executor.execute_and_extract_json_path::<String>("{ hello }", "data.hello").await {
//!     Ok(greeting) => println!("{greeting}"),
//!     Err(ExecutorError::Query(err)) => {
//!         for e in &err.errors {
//!             eprintln!("query rejected: {}", e.message);
//!         }
//!     }
//!     Err(ExecutorError::Path(PathError::NotFound { path })) => {
//!         eprintln!("nothing at {path}");
//!     }
//!     Err(e) => eprintln!("other error: {e}"),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use super::outcome::ExecutionError;

/// The main error type of the executor
///
/// Each variant wraps the more specific error type for its category.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// GraphQL-level failure (validation or execution)
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Path expression errors against a successful result
    #[error(transparent)]
    Path(#[from] PathError),

    /// Extracted value has the wrong shape for the requested type
    #[error(transparent)]
    Coercion(#[from] TypeCoercionError),

    /// Execution engine faults
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Configuration and assembly errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ExecutorError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExecutorError::Query(e) => e.status_code(),
            ExecutorError::Path(e) => e.status_code(),
            ExecutorError::Coercion(e) => e.status_code(),
            ExecutorError::Engine(e) => e.status_code(),
            ExecutorError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ExecutorError::Query(e) => e.error_code(),
            ExecutorError::Path(e) => e.error_code(),
            ExecutorError::Coercion(e) => e.error_code(),
            ExecutorError::Engine(e) => e.error_code(),
            ExecutorError::Config(e) => e.error_code(),
        }
    }

    /// True when the failure came from the GraphQL engine judging the query,
    /// as opposed to navigation, coercion or infrastructure
    pub fn is_query_error(&self) -> bool {
        matches!(self, ExecutorError::Query(_))
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ExecutorError::Query(QueryError { errors }) => {
                let errors: Vec<_> = errors.iter().map(ExecutionError::to_specification).collect();
                Some(serde_json::json!({ "errors": errors }))
            }
            ExecutorError::Path(PathError::NotFound { path })
            | ExecutorError::Path(PathError::Invalid { path, .. }) => {
                Some(serde_json::json!({ "path": path }))
            }
            ExecutorError::Coercion(TypeCoercionError {
                path, target_type, ..
            }) => Some(serde_json::json!({
                "path": path,
                "target_type": target_type
            })),
            _ => None,
        }
    }
}

impl IntoResponse for ExecutorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Aggregate of every GraphQL error reported for one request
///
/// The list keeps the order in which the engine reported the errors and is
/// never empty when produced by the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryError {
    pub errors: Vec<ExecutionError>,
}

impl QueryError {
    pub fn new(errors: Vec<ExecutionError>) -> Self {
        Self { errors }
    }

    /// Messages of all errors, in engine order
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn error_code(&self) -> &'static str {
        "GRAPHQL_QUERY_FAILED"
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GraphQL query failed with {} error(s): {}",
            self.errors.len(),
            self.messages().join("; ")
        )
    }
}

impl std::error::Error for QueryError {}

// =============================================================================
// Path Errors
// =============================================================================

/// Errors raised while navigating a result document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path is well-formed but addresses nothing in the document
    #[error("No results for path: {path}")]
    NotFound { path: String },

    /// The path expression could not be parsed
    #[error("Invalid path expression '{path}': {message}")]
    Invalid { path: String, message: String },
}

impl PathError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PathError::NotFound { .. } => StatusCode::NOT_FOUND,
            PathError::Invalid { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PathError::NotFound { .. } => "PATH_NOT_FOUND",
            PathError::Invalid { .. } => "INVALID_PATH",
        }
    }

    /// The path expression this error refers to
    pub fn path(&self) -> &str {
        match self {
            PathError::NotFound { path } | PathError::Invalid { path, .. } => path,
        }
    }
}

// =============================================================================
// Coercion Errors
// =============================================================================

/// The value found at a path cannot be deserialized into the requested type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot convert value at '{path}' to {target_type}: {message}")]
pub struct TypeCoercionError {
    pub path: String,
    pub target_type: &'static str,
    pub message: String,
}

impl TypeCoercionError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }

    pub fn error_code(&self) -> &'static str {
        "TYPE_COERCION_FAILED"
    }
}

// =============================================================================
// Engine Errors
// =============================================================================

/// Infrastructure faults raised by an execution engine
///
/// These are never GraphQL errors: an engine that could run the query reports
/// problems inside the outcome instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine cannot be reached or is shut down
    #[error("Execution engine unavailable: {message}")]
    Unavailable { message: String },

    /// The request could not be handed to the engine
    #[error("Invalid execution request: {message}")]
    InvalidRequest { message: String },

    /// The engine produced a result that cannot be represented as JSON
    #[error("Invalid engine response: {message}")]
    InvalidResponse { message: String },

    /// Anything else that went wrong inside the engine
    #[error("Execution engine error: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EngineError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            EngineError::InvalidResponse { .. } | EngineError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EngineError::Unavailable { .. } => "ENGINE_UNAVAILABLE",
            EngineError::InvalidRequest { .. } => "ENGINE_INVALID_REQUEST",
            EngineError::InvalidResponse { .. } => "ENGINE_INVALID_RESPONSE",
            EngineError::Internal(_) => "ENGINE_ERROR",
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors related to configuration and executor assembly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Configuration could not be parsed
    #[error("Failed to parse configuration{}: {message}", .file.as_ref().map(|f| format!(" in '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// The executor was built without an engine
    #[error("An execution engine is required. Call .with_engine()")]
    MissingEngine,
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND",
            ConfigError::ParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::MissingEngine => "CONFIG_MISSING_ENGINE",
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

// =============================================================================
// Tests
// =============================================================================
