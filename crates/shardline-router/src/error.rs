//! Error types for routing and federation.

use shardline_core::{EntityType, UnknownPartitionValue};
use thiserror::Error;

/// Errors that can occur while resolving tables or building federated
/// queries. All fatal to the call; never retried here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error(transparent)]
    UnknownPartitionValue(#[from] UnknownPartitionValue),

    #[error("entity {} has no partition dimension to federate over", .0.as_str())]
    UnsupportedFederation(EntityType),
}
