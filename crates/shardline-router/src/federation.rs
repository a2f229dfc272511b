//! Query federation — one UNION ALL statement over every partition of a
//! dimension, presented as a single logical table.
//!
//! Branches use `UNION ALL`, not `UNION`: partitions are disjoint by
//! construction, so deduplication would be pointless work and an implicit
//! sort/dedup pass. `ORDER BY`/`LIMIT` apply exactly once, after the last
//! branch, scoped to the combined result.
//!
//! Known limitation: the same WHERE text is applied verbatim to every
//! branch; there is no hook for partition-specific predicates.

use shardline_core::EntityType;

use crate::error::RouteError;
use crate::router::PartitionRouter;

/// Shape of a routed or federated SELECT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectSpec {
    /// Column list, verbatim. Defaults to `*`.
    pub columns: String,
    /// WHERE clause text without the keyword, verbatim.
    pub where_clause: Option<String>,
    /// ORDER BY text without the keyword, verbatim.
    pub order_by: Option<String>,
    pub limit: Option<u64>,
}

impl Default for SelectSpec {
    fn default() -> Self {
        Self {
            columns: "*".to_string(),
            where_clause: None,
            order_by: None,
            limit: None,
        }
    }
}

impl SelectSpec {
    /// `SELECT *` with no filters.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn filter(mut self, where_clause: impl Into<String>) -> Self {
        self.where_clause = Some(where_clause.into());
        self
    }

    pub fn order(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn take(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Build one SELECT branch for a single table.
fn branch(table: &str, spec: &SelectSpec) -> String {
    let mut sql = format!("SELECT {} FROM {table}", spec.columns);
    if let Some(where_clause) = &spec.where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(where_clause);
    }
    sql
}

/// Synthesize a UNION ALL statement across every partition table of the
/// entity's dimension, in declared order.
///
/// Fails with [`RouteError::UnsupportedFederation`] for entities without
/// a partition dimension. Built fresh on every call — the table list is
/// itself a pure function of the current namespace, so caching would
/// only risk staleness across renames.
pub fn union_select(
    router: &PartitionRouter,
    entity: EntityType,
    spec: &SelectSpec,
) -> Result<String, RouteError> {
    let tables = router.entity_tables(entity)?;

    let branches: Vec<String> = tables.iter().map(|table| branch(table, spec)).collect();
    let mut sql = branches.join(" UNION ALL ");

    // A single suffix scoped to the combined result, never per branch:
    // LIMIT 50 means the 50 globally-best rows, not 50 per partition.
    if let Some(order_by) = &spec.order_by {
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);
    }
    if let Some(limit) = spec.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    Ok(sql)
}
