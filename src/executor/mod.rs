//! Query execution facade
//!
//! [`QueryExecutor`] is the single entry point for running GraphQL requests.
//! It delegates to an injected [`ExecutionEngine`] and offers two ways to get
//! at the result besides the raw outcome:
//!
//! - extracting one value at a path, deserialized into the caller's type
//! - a [`DocumentView`] over the whole response document
//!
//! Both helpers turn any GraphQL error into a single [`QueryError`] carrying
//! the complete error list, and report navigation problems as [`PathError`],
//! so a caller can tell "my query was wrong" from "my path was wrong".

mod builder;

pub use builder::QueryExecutorBuilder;

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::core::{ExecutionOutcome, ExecutionRequest, ExecutorError, ExecutorResult, QueryError};
use crate::document::{DocumentView, PathExpression, PathOptions};
use crate::engine::ExecutionEngine;

/// Facade in front of a GraphQL execution engine
///
/// Holds nothing but a shared engine reference and immutable options, so it
/// can be cloned freely and called concurrently.
///
/// # Example
///
/// ```rust,ignore
/// let executor = QueryExecutor::new(schema);
///
/// let greeting: String = executor
///     .execute_and_extract_json_path("{ hello }", "data.hello")
///     .await?;
/// ```
#[derive(Clone)]
pub struct QueryExecutor {
    engine: Arc<dyn ExecutionEngine>,
    path_options: PathOptions,
    log_query_errors: bool,
}

impl std::fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("path_options", &self.path_options)
            .field("log_query_errors", &self.log_query_errors)
            .finish_non_exhaustive()
    }
}

impl QueryExecutor {
    /// Executor with default options
    pub fn new(engine: impl ExecutionEngine + 'static) -> Self {
        Self::from_shared(Arc::new(engine))
    }

    /// Executor over an engine shared with other components
    pub fn from_shared(engine: Arc<dyn ExecutionEngine>) -> Self {
        Self {
            engine,
            path_options: PathOptions::default(),
            log_query_errors: true,
        }
    }

    pub fn builder() -> QueryExecutorBuilder {
        QueryExecutorBuilder::new()
    }

    pub fn path_options(&self) -> PathOptions {
        self.path_options
    }

    /// Run a request and return the engine's outcome untouched
    ///
    /// GraphQL errors are reported in [`ExecutionOutcome::errors`]; this only
    /// fails for engine faults.
    pub async fn execute(
        &self,
        request: impl Into<ExecutionRequest>,
    ) -> ExecutorResult<ExecutionOutcome> {
        let request = request.into();
        let execution_id = Uuid::new_v4();
        let span = tracing::debug_span!(
            "graphql.execute",
            execution_id = %execution_id,
            operation = request.operation_name().unwrap_or("<anonymous>"),
        );

        async {
            let outcome = self.engine.run(&request).await.map_err(|e| {
                tracing::error!(error = %e, "GraphQL execution engine failed");
                e
            })?;

            if self.log_query_errors && outcome.has_errors() {
                let messages: Vec<&str> = outcome.errors.iter().map(|e| e.message.as_str()).collect();
                tracing::debug!(
                    error_count = outcome.errors.len(),
                    errors = %messages.join("; "),
                    "GraphQL execution completed with errors"
                );
            }

            Ok::<_, ExecutorError>(outcome)
        }
        .instrument(span)
        .await
    }

    /// Run several independent requests concurrently
    ///
    /// Results come back in request order; one failing request does not
    /// affect the others.
    pub async fn execute_batch(
        &self,
        requests: Vec<ExecutionRequest>,
    ) -> Vec<ExecutorResult<ExecutionOutcome>> {
        join_all(requests.into_iter().map(|request| self.execute(request))).await
    }

    /// Run a request and read one value at `path`
    ///
    /// Fails with [`QueryError`] when the outcome has any error (even if the
    /// requested path holds data), with [`PathError::NotFound`] when the path
    /// addresses nothing and with a coercion error when the value does not
    /// fit `T`.
    ///
    /// [`PathError::NotFound`]: crate::core::PathError::NotFound
    pub async fn execute_and_extract_path<T: DeserializeOwned>(
        &self,
        request: impl Into<ExecutionRequest>,
        path: &PathExpression,
    ) -> ExecutorResult<T> {
        let document = self.execute_and_get_document(request).await?;
        document.read_path(path)
    }

    /// [`execute_and_extract_path`](Self::execute_and_extract_path) with the
    /// path given in JSONPath syntax (`data.hello`, `$.data.items[0].name`)
    ///
    /// A malformed path fails before the engine is called.
    pub async fn execute_and_extract_json_path<T: DeserializeOwned>(
        &self,
        request: impl Into<ExecutionRequest>,
        json_path: &str,
    ) -> ExecutorResult<T> {
        let path = PathExpression::parse(json_path)?;
        self.execute_and_extract_path(request, &path).await
    }

    /// Untyped variant of
    /// [`execute_and_extract_json_path`](Self::execute_and_extract_json_path)
    pub async fn execute_and_extract_json_path_as_value(
        &self,
        request: impl Into<ExecutionRequest>,
        json_path: &str,
    ) -> ExecutorResult<Value> {
        self.execute_and_extract_json_path(request, json_path).await
    }

    /// Run a request and return a navigable view of its response document
    ///
    /// A document is only returned for an outcome without errors.
    pub async fn execute_and_get_document(
        &self,
        request: impl Into<ExecutionRequest>,
    ) -> ExecutorResult<DocumentView> {
        let outcome = self.execute(request).await?;
        if outcome.has_errors() {
            return Err(QueryError::new(outcome.errors).into());
        }
        Ok(DocumentView::from_outcome(outcome, self.path_options))
    }
}
