//! Core module containing the request, outcome and error types

pub mod error;
pub mod outcome;
pub mod request;

pub use error::{
    ConfigError, EngineError, ErrorResponse, ExecutorError, ExecutorResult, PathError,
    QueryError, TypeCoercionError,
};
pub use outcome::{ErrorType, ExecutionError, ExecutionOutcome, PathSegment, SourceLocation};
pub use request::{ExecutionRequest, RequestContext};
