//! shardline-exec — routed query execution over interchangeable SQL
//! dialects.
//!
//! The [`QueryExecutor`] is the orchestration entry point: it decides
//! single-table vs. federated vs. default routing, dispatches to the
//! active dialect adapter, normalizes results, and records best-effort
//! performance telemetry around every execution.
//!
//! # Architecture
//!
//! ```text
//! QueryExecutor::execute()
//!   ├── PartitionRouter     ← physical table resolution
//!   ├── union_select()      ← cross-partition federation (select only)
//!   ├── SqlDialect adapter  ← ClientServerDialect | EmbeddedDialect
//!   └── metrics::record()   ← fire-and-forget, never propagates
//! ```

pub mod dialect;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod statement;

pub use dialect::{
    BackendError, ClientServerBackend, ClientServerDialect, EmbeddedBackend, EmbeddedDialect,
    InsertOutcome, QueryOutput, Row, SqlDialect,
};
pub use error::ExecError;
pub use executor::{ExecOutcome, Operation, QueryExecutor, RouteOptions};
pub use metrics::QueryMetric;
