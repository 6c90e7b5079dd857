//! Execution engine contract
//!
//! The executor never parses, validates or resolves anything itself. It hands
//! each [`ExecutionRequest`] to an [`ExecutionEngine`] built against a fixed
//! schema and resolver set, and post-processes what comes back.
//!
//! Adapters for async-graphql schemas (both derived `Schema<Q, M, S>` and the
//! runtime-built `dynamic::Schema`) live in [`adapter`].

pub mod adapter;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::{EngineError, ExecutionOutcome, ExecutionRequest};

/// Something that can run a GraphQL request against a pre-built schema
///
/// Implementations perform parse, validate and execute. GraphQL-level
/// problems (unknown fields, resolver failures, null in a non-null position)
/// must be reported inside the returned [`ExecutionOutcome`]; `Err` is
/// reserved for infrastructure faults such as an engine that cannot be
/// reached.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn run(&self, request: &ExecutionRequest) -> Result<ExecutionOutcome, EngineError>;
}

#[async_trait]
impl<E> ExecutionEngine for Arc<E>
where
    E: ExecutionEngine + ?Sized,
{
    async fn run(&self, request: &ExecutionRequest) -> Result<ExecutionOutcome, EngineError> {
        (**self).run(request).await
    }
}
