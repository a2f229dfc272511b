//! Performance metrics sink — one row per routed execution.
//!
//! Writes are best-effort: a failure here is logged and discarded, never
//! allowed to mask or replace the outcome of the primary operation.
//! The stats table's `timestamp` column auto-defaults in the schema
//! (table creation is a migration concern, not ours).

use serde_json::json;
use shardline_core::NamespaceStore;
use tracing::{debug, warn};

use crate::dialect::{BackendError, Row, SqlDialect};
use crate::statement::build_insert;

/// Base name of the dimension-agnostic stats table; the physical table
/// is `<prefix>_performance_stats`.
pub const PERFORMANCE_TABLE: &str = "performance_stats";

/// One performance record, created after a successfully executed routed
/// operation. Never updated, never deleted by this layer.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryMetric {
    pub table_name: String,
    pub query_type: &'static str,
    pub execution_time_ms: f64,
    pub rows_affected: u64,
}

/// Persist one metric row. Errors are caught, logged, and discarded.
pub async fn record<D: SqlDialect>(dialect: &D, namespace: &NamespaceStore, metric: &QueryMetric) {
    let table = namespace.table_name(PERFORMANCE_TABLE);
    let row = vec![
        ("table_name".to_string(), json!(metric.table_name)),
        ("query_type".to_string(), json!(metric.query_type)),
        ("execution_time_ms".to_string(), json!(metric.execution_time_ms)),
        ("rows_affected".to_string(), json!(metric.rows_affected)),
    ];
    let (sql, params) = build_insert(dialect, &table, &row);
    match dialect.execute(&sql, &params).await {
        Ok(_) => debug!(
            table = %metric.table_name,
            query_type = metric.query_type,
            elapsed_ms = metric.execution_time_ms,
            "performance metric recorded"
        ),
        Err(e) => warn!(error = %e, stats_table = %table, "performance metric write failed"),
    }
}

/// Read the most recent metric rows, newest first.
pub async fn recent<D: SqlDialect>(
    dialect: &D,
    namespace: &NamespaceStore,
    limit: u64,
) -> Result<Vec<Row>, BackendError> {
    let table = namespace.table_name(PERFORMANCE_TABLE);
    let sql = format!("SELECT * FROM {table} ORDER BY timestamp DESC LIMIT {limit}");
    dialect.select(&sql, &[]).await
}
