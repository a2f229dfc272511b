//! shardline-router — partition-aware table routing and query federation.
//!
//! A pure function layer over the namespace: given an entity and optional
//! partition metadata, resolve the physical table name; when an operation
//! must see every partition of a dimension, synthesize one UNION ALL
//! statement that behaves as a single logical table.

pub mod error;
pub mod federation;
pub mod router;

pub use error::RouteError;
pub use federation::{SelectSpec, union_select};
pub use router::{PartitionRouter, RouteMeta};
