// dqgate-core/src/ports/executor.rs

// What the engine needs from the warehouse, without knowing which one it is:
// run a query, get back ordered rows of column -> value.
// Any backend with continuous percentiles, grouped avg/stddev_samp and
// left-join anti-joins satisfies it.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;

/// One result row. Column names are stored lowercase so `ORDER_ID` and
/// `order_id` resolve to the same cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Map<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: &str, value: impl Into<Value>) {
        self.cells.insert(column.to_lowercase(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(&column.to_lowercase())
    }

    /// Scalar cell rendered as text (ids may come back as integers).
    pub fn text(&self, column: &str) -> Result<String, DomainError> {
        match self.require(column)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Err(malformed(column, "is NULL")),
            other => Err(malformed(column, &format!("is not a scalar ({})", other))),
        }
    }

    /// Absent column or NULL cell both map to `None`.
    pub fn opt_text(&self, column: &str) -> Result<Option<String>, DomainError> {
        match self.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.text(column).map(Some),
        }
    }

    /// The column must be projected, but its cell may be NULL.
    pub fn nullable_text(&self, column: &str) -> Result<Option<String>, DomainError> {
        self.require(column)?;
        self.opt_text(column)
    }

    /// Numeric cell; NULL is an error.
    pub fn f64(&self, column: &str) -> Result<f64, DomainError> {
        self.opt_f64(column)?
            .ok_or_else(|| malformed(column, "is NULL"))
    }

    /// Numeric cell; NULL maps to `None`. Numeric strings are accepted since
    /// some drivers hand decimals back as text.
    pub fn opt_f64(&self, column: &str) -> Result<Option<f64>, DomainError> {
        match self.require(column)? {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| malformed(column, "is out of f64 range")),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| malformed(column, &format!("is not numeric ('{}')", s))),
            other => Err(malformed(column, &format!("is not numeric ({})", other))),
        }
    }

    fn require(&self, column: &str) -> Result<&Value, DomainError> {
        self.get(column)
            .ok_or_else(|| malformed(column, "is missing from the result set"))
    }
}

fn malformed(column: &str, problem: &str) -> DomainError {
    DomainError::MalformedRow {
        column: column.to_lowercase(),
        problem: problem.to_string(),
    }
}

#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Runs `query` and returns its rows in result order.
    async fn execute(&self, query: &str) -> Result<Vec<Row>, InfrastructureError>;

    fn engine_name(&self) -> &str;
}
