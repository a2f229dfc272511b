//! Error types for routed execution.

use shardline_router::RouteError;
use thiserror::Error;

use crate::dialect::BackendError;

/// Errors surfaced by the query executor. Backend failures pass through
/// unmodified; this layer adds no retry, backoff, or reinterpretation.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("union federation supports select only, got {0}")]
    UnsupportedOperation(&'static str),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
