//! QueryExecutorBuilder for explicit executor assembly

use std::sync::Arc;

use super::QueryExecutor;
use crate::config::ExecutorConfig;
use crate::core::{ConfigError, ExecutorResult};
use crate::document::PathOptions;
use crate::engine::ExecutionEngine;

/// Builder for [`QueryExecutor`]
///
/// The hosting application assembles one engine and passes it in; there is no
/// runtime lookup.
///
/// # Example
///
/// ```ignore
/// let executor = QueryExecutor::builder()
///     .with_engine(schema)
///     .with_config(ExecutorConfig::from_yaml_file("qexec.yaml")?)
///     .build()?;
/// ```
#[derive(Default)]
pub struct QueryExecutorBuilder {
    engine: Option<Arc<dyn ExecutionEngine>>,
    config: ExecutorConfig,
}

impl QueryExecutorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution engine (required)
    pub fn with_engine(mut self, engine: impl ExecutionEngine + 'static) -> Self {
        self.engine = Some(Arc::new(engine));
        self
    }

    /// Set an engine that is shared with other components
    pub fn with_shared_engine(mut self, engine: Arc<dyn ExecutionEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the path options of the current configuration
    pub fn with_path_options(mut self, options: PathOptions) -> Self {
        self.config.paths = options;
        self
    }

    /// Build the executor
    ///
    /// Fails with [`ConfigError::MissingEngine`] when no engine was set.
    pub fn build(self) -> ExecutorResult<QueryExecutor> {
        let engine = self.engine.ok_or(ConfigError::MissingEngine)?;

        Ok(QueryExecutor {
            engine,
            path_options: self.config.paths,
            log_query_errors: self.config.log_query_errors,
        })
    }
}
