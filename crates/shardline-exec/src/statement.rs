//! Dialect-neutral SQL text builders.
//!
//! Column lists and placeholder/value lists are derived from the same
//! ordered pair list in a single pass, so zipping them can never bind a
//! value to the wrong column. WHERE/ORDER BY text is carried verbatim
//! from the caller, matching the routing layer's contract of shaping —
//! not validating — SQL.

use serde_json::Value;
use shardline_router::SelectSpec;

use crate::dialect::SqlDialect;

/// A column/value pair list in caller insertion order.
pub type ColumnValues = Vec<(String, Value)>;

/// `SELECT <cols> FROM <table> [WHERE ..] [ORDER BY ..] [LIMIT n]`.
pub fn build_select(table: &str, spec: &SelectSpec) -> String {
    let mut sql = format!("SELECT {} FROM {table}", spec.columns);
    if let Some(where_clause) = &spec.where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(where_clause);
    }
    if let Some(order_by) = &spec.order_by {
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);
    }
    if let Some(limit) = spec.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    sql
}

/// `INSERT INTO <table> (a, b) VALUES (<p1>, <p2>)` plus the parameter
/// vector, in the same order as the column list.
pub fn build_insert<D: SqlDialect>(
    dialect: &D,
    table: &str,
    row: &ColumnValues,
) -> (String, Vec<Value>) {
    let mut columns = Vec::with_capacity(row.len());
    let mut params = Vec::with_capacity(row.len());
    for (column, value) in row {
        columns.push(column.as_str());
        params.push(value.clone());
    }
    let placeholders: Vec<String> = (1..=params.len())
        .map(|index| dialect.placeholder(index))
        .collect();
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );
    (sql, params)
}

/// `UPDATE <table> SET a = <p1>, b = <p2> WHERE <where>` plus params.
pub fn build_update<D: SqlDialect>(
    dialect: &D,
    table: &str,
    set: &ColumnValues,
    where_clause: &str,
) -> (String, Vec<Value>) {
    let mut assignments = Vec::with_capacity(set.len());
    let mut params = Vec::with_capacity(set.len());
    for (index, (column, value)) in set.iter().enumerate() {
        assignments.push(format!("{column} = {}", dialect.placeholder(index + 1)));
        params.push(value.clone());
    }
    let mut sql = format!("UPDATE {table} SET {}", assignments.join(", "));
    if !where_clause.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(where_clause);
    }
    (sql, params)
}

/// `DELETE FROM <table> [WHERE <where>]`.
pub fn build_delete(table: &str, where_clause: &str) -> String {
    let mut sql = format!("DELETE FROM {table}");
    if !where_clause.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(where_clause);
    }
    sql
}
