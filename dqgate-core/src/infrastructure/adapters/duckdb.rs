// dqgate-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::types::Value as DuckValue;
use duckdb::{Config, Connection, InterruptHandle};
use serde_json::{Number, Value};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

// Hexagonal imports
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::executor::{QueryExecutor, Row};

pub struct DuckDbExecutor {
    conn: Arc<Mutex<Connection>>,
    interrupt: Arc<InterruptHandle>,
}

impl DuckDbExecutor {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        let interrupt = conn.interrupt_handle();
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            interrupt,
        })
    }

    pub fn in_memory() -> Result<Self, InfrastructureError> {
        Self::new(":memory:")
    }

    /// Runs statements that return no rows (DDL, seed inserts).
    pub fn execute_batch(&self, sql: &str) -> Result<(), InfrastructureError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::Poisoned)?;
        conn.execute_batch(sql)?;
        Ok(())
    }
}

// Lifecycle of one query on the blocking pool.
const PENDING: u8 = 0;
const RUNNING: u8 = 1;
const FINISHED: u8 = 2;
const ABANDONED: u8 = 3;

/// Armed for the lifetime of one `execute` call. If the caller drops the
/// future before the query finished, the blocking task is told not to start,
/// or the running statement is interrupted so the connection is released.
struct AbandonGuard {
    state: Arc<AtomicU8>,
    interrupt: Arc<InterruptHandle>,
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        if self.state.swap(ABANDONED, Ordering::SeqCst) == RUNNING {
            warn!("Interrupting abandoned DuckDB query");
            self.interrupt.interrupt();
        }
    }
}

fn fetch_rows(conn: &Connection, query: &str) -> Result<Vec<Row>, InfrastructureError> {
    let mut stmt = conn.prepare(query)?;
    let mut rows = stmt.query([])?;

    // Column names are only known once the statement has been executed
    let columns: Vec<String> = rows
        .as_ref()
        .map(|s| s.column_names())
        .unwrap_or_default();

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut mapped = Row::new();
        for (i, name) in columns.iter().enumerate() {
            let value: DuckValue = row.get(i)?;
            mapped.set(name, to_json(value));
        }
        out.push(mapped);
    }
    Ok(out)
}

fn float(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

fn to_json(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(i) => i.into(),
        DuckValue::SmallInt(i) => i.into(),
        DuckValue::Int(i) => i.into(),
        DuckValue::BigInt(i) => i.into(),
        DuckValue::UTinyInt(i) => i.into(),
        DuckValue::USmallInt(i) => i.into(),
        DuckValue::UInt(i) => i.into(),
        DuckValue::UBigInt(i) => i.into(),
        DuckValue::HugeInt(i) => Value::String(i.to_string()),
        DuckValue::Float(f) => float(f64::from(f)),
        DuckValue::Double(f) => float(f),
        // Decimals keep their exact text; Row accessors parse numeric strings
        DuckValue::Decimal(d) => Value::String(d.to_string()),
        DuckValue::Text(s) => Value::String(s),
        other => Value::String(format!("{:?}", other)),
    }
}

#[async_trait]
impl QueryExecutor for DuckDbExecutor {
    async fn execute(&self, query: &str) -> Result<Vec<Row>, InfrastructureError> {
        let conn = Arc::clone(&self.conn);
        let sql = query.to_string();
        let state = Arc::new(AtomicU8::new(PENDING));
        let _guard = AbandonGuard {
            state: Arc::clone(&state),
            interrupt: Arc::clone(&self.interrupt),
        };

        // Off the async workers: a cancelled run can drop this future
        // without waiting for DuckDB to finish.
        let rows = tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| DatabaseError::Poisoned)?;
            if state
                .compare_exchange(PENDING, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return Err(InfrastructureError::QueryFailed(
                    "query abandoned before it started".into(),
                ));
            }
            let rows = fetch_rows(&conn, &sql);
            // Still under the lock: a late interrupt cannot hit the next query
            let _ = state.compare_exchange(RUNNING, FINISHED, Ordering::SeqCst, Ordering::SeqCst);
            rows
        })
        .await
        .map_err(|e| InfrastructureError::QueryFailed(format!("query task aborted: {}", e)))??;

        debug!(rows = rows.len(), "DuckDB query returned");
        Ok(rows)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}
