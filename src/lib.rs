//! # qexec
//!
//! A GraphQL query-execution facade for Rust services.
//!
//! ## Features
//!
//! - **Engine-Agnostic**: Any [`ExecutionEngine`](engine::ExecutionEngine) can be wrapped; async-graphql schemas work out of the box
//! - **Typed Extraction**: Read one value of the result by JSONPath and deserialize it with serde
//! - **Result Documents**: Navigate the whole response lazily through a [`DocumentView`](document::DocumentView)
//! - **Uniform Errors**: GraphQL errors, path errors and coercion errors are distinct, with HTTP status mappings
//! - **Configuration-Based**: Path options, logging and the HTTP endpoint via YAML
//! - **HTTP Exposure**: Optional Axum router speaking GraphQL over HTTP
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qexec::prelude::*;
//!
//! let executor = QueryExecutor::new(schema);
//!
//! // Raw outcome, GraphQL errors included
//! let outcome = executor.execute("{ hello }").await?;
//!
//! // One typed value; any GraphQL error fails with QueryError
//! let greeting: String = executor
//!     .execute_and_extract_json_path("{ hello }", "data.hello")
//!     .await?;
//!
//! // The whole document
//! let document = executor.execute_and_get_document("{ hello }").await?;
//! let greeting: String = document.read("data.hello")?;
//! ```

pub mod config;
pub mod core;
pub mod document;
pub mod engine;
pub mod executor;
pub mod server;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        ErrorType, ExecutionError, ExecutionOutcome, ExecutionRequest, PathSegment,
        RequestContext, SourceLocation,
    };

    // === Errors ===
    pub use crate::core::{
        ConfigError, EngineError, ExecutorError, ExecutorResult, PathError, QueryError,
        TypeCoercionError,
    };

    // === Engine ===
    pub use crate::engine::ExecutionEngine;

    // === Executor ===
    pub use crate::executor::{QueryExecutor, QueryExecutorBuilder};

    // === Documents ===
    pub use crate::document::{DocumentView, PathExpression, PathOptions};

    // === Config ===
    pub use crate::config::{ExecutorConfig, HttpConfig, LoggingConfig};

    // === Server ===
    pub use crate::server::GraphQLExposure;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
}
