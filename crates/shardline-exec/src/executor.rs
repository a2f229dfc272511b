//! Query orchestration — the entry point callers use for routed
//! operations.
//!
//! Routing decision order, per call:
//! 1. explicit partition metadata in the options → single partitioned
//!    table;
//! 2. `use_union` → federated UNION ALL statement (select only);
//! 3. otherwise → the entity's default table.
//!
//! Every dispatch is wrapped in a wall-clock timer; with performance
//! tracking enabled, one metric row is recorded after a successful
//! execution. Steps within a call are strictly sequential; nothing is
//! serialized across independent calls.

use std::time::Instant;

use shardline_core::EntityType;
use shardline_router::{PartitionRouter, RouteMeta, SelectSpec, union_select};

use crate::dialect::{InsertOutcome, Row, SqlDialect};
use crate::error::ExecError;
use crate::metrics::{self, QueryMetric};
use crate::statement::{ColumnValues, build_delete, build_insert, build_select, build_update};

/// A routed operation. Each variant carries exactly the payload it
/// needs; there is no way to smuggle an unsupported operation string
/// past this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Select(SelectSpec),
    Insert { row: ColumnValues },
    Update { set: ColumnValues, where_clause: String },
    Delete { where_clause: String },
}

impl Operation {
    /// Lowercase operation label, used for metric rows.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Select(_) => "select",
            Operation::Insert { .. } => "insert",
            Operation::Update { .. } => "update",
            Operation::Delete { .. } => "delete",
        }
    }
}

/// Per-call routing options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteOptions {
    pub indication: Option<shardline_core::IndicationType>,
    pub strategy: Option<shardline_core::StrategyType>,
    /// Federate a select across every partition of the entity's
    /// dimension.
    pub use_union: bool,
    /// Record a performance metric row for this call.
    pub track_performance: bool,
}

/// Normalized result of a routed operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// Rows from a select, or from an insert under a dialect with
    /// `RETURNING`.
    Rows(Vec<Row>),
    /// Acknowledgement of a write.
    Ack { rows_affected: u64 },
    /// Insert acknowledged, but the active dialect cannot return the
    /// inserted row.
    InsertedNoReturn { rows_affected: u64 },
}

impl ExecOutcome {
    /// Row count for telemetry: result length for row sets, rows
    /// affected otherwise.
    pub fn row_count(&self) -> u64 {
        match self {
            ExecOutcome::Rows(rows) => rows.len() as u64,
            ExecOutcome::Ack { rows_affected }
            | ExecOutcome::InsertedNoReturn { rows_affected } => *rows_affected,
        }
    }
}

/// Orchestrates routing, dialect dispatch, and telemetry for one
/// namespace and one backend dialect.
pub struct QueryExecutor<D: SqlDialect> {
    router: PartitionRouter,
    dialect: D,
}

impl<D: SqlDialect> QueryExecutor<D> {
    pub fn new(router: PartitionRouter, dialect: D) -> Self {
        Self { router, dialect }
    }

    pub fn router(&self) -> &PartitionRouter {
        &self.router
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Execute a routed operation. See the module docs for the decision
    /// order. Telemetry failures never change the returned value.
    pub async fn execute(
        &self,
        entity: EntityType,
        op: Operation,
        options: &RouteOptions,
    ) -> Result<ExecOutcome, ExecError> {
        let started = Instant::now();

        let (table_label, outcome) = if options.indication.is_some() || options.strategy.is_some()
        {
            let meta = RouteMeta {
                indication: options.indication,
                strategy: options.strategy,
            };
            let table = self.router.table_for(entity, &meta);
            let outcome = self.run_single(&table, &op).await?;
            (table, outcome)
        } else if options.use_union {
            let Operation::Select(spec) = &op else {
                return Err(ExecError::UnsupportedOperation(op.kind()));
            };
            let sql = union_select(&self.router, entity, spec)?;
            let rows = self.dialect.select(&sql, &[]).await?;
            // Metric rows for federated reads carry the logical
            // (unpartitioned) table name.
            let label = self.router.namespace().table_name(entity.base_table());
            (label, ExecOutcome::Rows(rows))
        } else {
            let table = self.router.table_for(entity, &RouteMeta::NONE);
            let outcome = self.run_single(&table, &op).await?;
            (table, outcome)
        };

        if options.track_performance {
            let metric = QueryMetric {
                table_name: table_label,
                query_type: op.kind(),
                execution_time_ms: started.elapsed().as_secs_f64() * 1000.0,
                rows_affected: outcome.row_count(),
            };
            // Best-effort: record() swallows and logs its own failures.
            metrics::record(&self.dialect, self.router.namespace(), &metric).await;
        }

        Ok(outcome)
    }

    /// Dispatch one operation against one resolved physical table.
    async fn run_single(&self, table: &str, op: &Operation) -> Result<ExecOutcome, ExecError> {
        match op {
            Operation::Select(spec) => {
                let sql = build_select(table, spec);
                let rows = self.dialect.select(&sql, &[]).await?;
                Ok(ExecOutcome::Rows(rows))
            }
            Operation::Insert { row } => {
                let (sql, params) = build_insert(&self.dialect, table, row);
                match self.dialect.insert(&sql, &params).await? {
                    InsertOutcome::Returned(rows) => Ok(ExecOutcome::Rows(rows)),
                    InsertOutcome::NotSupported { rows_affected } => {
                        Ok(ExecOutcome::InsertedNoReturn { rows_affected })
                    }
                }
            }
            Operation::Update { set, where_clause } => {
                let (sql, params) = build_update(&self.dialect, table, set, where_clause);
                let rows_affected = self.dialect.execute(&sql, &params).await?;
                Ok(ExecOutcome::Ack { rows_affected })
            }
            Operation::Delete { where_clause } => {
                let sql = build_delete(table, where_clause);
                let rows_affected = self.dialect.execute(&sql, &[]).await?;
                Ok(ExecOutcome::Ack { rows_affected })
            }
        }
    }
}
