//! SQL dialect adapters — one call shape over two backend flavors.
//!
//! The backend client is injected and opaque: this layer only needs a
//! way to execute parameterized text and read result rows. The two
//! adapters own everything dialect-specific — placeholder syntax,
//! result shapes, and the `RETURNING` asymmetry on insert.

use serde_json::Value;
use thiserror::Error;

/// A result row, as a JSON object.
pub type Row = serde_json::Map<String, Value>;

/// Failure surfaced by the underlying backend client. Propagated
/// unmodified; never retried here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend execution failed: {0}")]
pub struct BackendError(pub String);

/// Result of one client-server round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    pub rows: Vec<Row>,
    pub rows_affected: u64,
}

/// Opaque handle for a pooled client-server backend. Placeholders in
/// the text are positional `$1, $2, …`.
#[allow(async_fn_in_trait)]
pub trait ClientServerBackend: Send + Sync {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryOutput, BackendError>;
}

/// Opaque handle for an embedded single-connection backend exposing
/// prepared-statement `all`/`run` calls. Placeholders are `?`. Calls
/// complete synchronously.
pub trait EmbeddedBackend: Send + Sync {
    /// Read rows.
    fn all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, BackendError>;
    /// Execute a write; returns rows affected.
    fn run(&self, sql: &str, params: &[Value]) -> Result<u64, BackendError>;
}

/// Outcome of an insert, which differs by dialect: the client-server
/// flavor hands back the inserted row(s), the embedded flavor cannot.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// Inserted row(s), via `RETURNING *`.
    Returned(Vec<Row>),
    /// The dialect has no `RETURNING` equivalent. An explicit signal so
    /// callers never mistake a missing row for an empty one.
    NotSupported { rows_affected: u64 },
}

/// The seam the executor depends on. Two concrete adapters, one per
/// backend flavor.
#[allow(async_fn_in_trait)]
pub trait SqlDialect: Send + Sync {
    /// Positional placeholder for a 1-based parameter index.
    fn placeholder(&self, index: usize) -> String;

    /// Execute a read; returns normalized rows.
    async fn select(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, BackendError>;

    /// Execute a write; returns rows affected.
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, BackendError>;

    /// Execute an insert, yielding the inserted row(s) where the dialect
    /// can express it. `sql` carries no `RETURNING` suffix; the adapter
    /// appends one if its flavor supports it.
    async fn insert(&self, sql: &str, params: &[Value]) -> Result<InsertOutcome, BackendError>;
}

/// Adapter for the pooled client-server flavor (`$n` placeholders,
/// `RETURNING *` on insert).
pub struct ClientServerDialect<C> {
    client: C,
}

impl<C> ClientServerDialect<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: ClientServerBackend> SqlDialect for ClientServerDialect<C> {
    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    async fn select(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, BackendError> {
        Ok(self.client.query(sql, params).await?.rows)
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, BackendError> {
        Ok(self.client.query(sql, params).await?.rows_affected)
    }

    async fn insert(&self, sql: &str, params: &[Value]) -> Result<InsertOutcome, BackendError> {
        let sql = format!("{sql} RETURNING *");
        let output = self.client.query(&sql, params).await?;
        Ok(InsertOutcome::Returned(output.rows))
    }
}

/// Adapter for the embedded single-connection flavor (`?` placeholders,
/// synchronous prepared statements, no `RETURNING`).
pub struct EmbeddedDialect<C> {
    client: C,
}

impl<C> EmbeddedDialect<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: EmbeddedBackend> SqlDialect for EmbeddedDialect<C> {
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    async fn select(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, BackendError> {
        self.client.all(sql, params)
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, BackendError> {
        self.client.run(sql, params)
    }

    async fn insert(&self, sql: &str, params: &[Value]) -> Result<InsertOutcome, BackendError> {
        let rows_affected = self.client.run(sql, params)?;
        Ok(InsertOutcome::NotSupported { rows_affected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every statement it is asked to run.
    struct RecordingClient {
        calls: Mutex<Vec<(String, Vec<Value>)>>,
    }

    impl RecordingClient {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, Vec<Value>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ClientServerBackend for &RecordingClient {
        async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryOutput, BackendError> {
            self.calls
                .lock()
                .unwrap()
                .push((sql.to_string(), params.to_vec()));
            Ok(QueryOutput {
                rows: vec![Row::new()],
                rows_affected: 1,
            })
        }
    }

    impl EmbeddedBackend for &RecordingClient {
        fn all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, BackendError> {
            self.calls
                .lock()
                .unwrap()
                .push((sql.to_string(), params.to_vec()));
            Ok(vec![Row::new()])
        }

        fn run(&self, sql: &str, params: &[Value]) -> Result<u64, BackendError> {
            self.calls
                .lock()
                .unwrap()
                .push((sql.to_string(), params.to_vec()));
            Ok(1)
        }
    }

    #[test]
    fn placeholder_syntax_differs_by_dialect() {
        let client = RecordingClient::new();
        let pg = ClientServerDialect::new(&client);
        assert_eq!(pg.placeholder(1), "$1");
        assert_eq!(pg.placeholder(3), "$3");

        let embedded = EmbeddedDialect::new(&client);
        assert_eq!(embedded.placeholder(1), "?");
        assert_eq!(embedded.placeholder(3), "?");
    }

    #[tokio::test]
    async fn client_server_insert_appends_returning() {
        let client = RecordingClient::new();
        let dialect = ClientServerDialect::new(&client);

        let outcome = dialect
            .insert("INSERT INTO t (a) VALUES ($1)", &[Value::from(1)])
            .await
            .unwrap();

        assert!(matches!(outcome, InsertOutcome::Returned(rows) if rows.len() == 1));
        let calls = client.calls();
        assert_eq!(calls[0].0, "INSERT INTO t (a) VALUES ($1) RETURNING *");
    }

    #[tokio::test]
    async fn embedded_insert_signals_no_returning() {
        let client = RecordingClient::new();
        let dialect = EmbeddedDialect::new(&client);

        let outcome = dialect
            .insert("INSERT INTO t (a) VALUES (?)", &[Value::from(1)])
            .await
            .unwrap();

        assert_eq!(outcome, InsertOutcome::NotSupported { rows_affected: 1 });
        // The statement goes through run() untouched — no RETURNING.
        let calls = client.calls();
        assert_eq!(calls[0].0, "INSERT INTO t (a) VALUES (?)");
    }
}
