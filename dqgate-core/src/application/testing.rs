// dqgate-core/src/application/testing.rs

// In-memory stand-in for the warehouse: canned rows per query fragment.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::infrastructure::error::InfrastructureError;
use crate::ports::executor::{QueryExecutor, Row};

#[derive(Clone)]
enum Script {
    Rows(Vec<Row>),
    Fail(String),
}

#[derive(Clone, Default)]
pub struct ScriptedExecutor {
    scripts: Vec<(String, Script)>,
    executed: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queries containing `fragment` return `rows`.
    pub fn on(mut self, fragment: &str, rows: Vec<Row>) -> Self {
        self.scripts.push((fragment.to_string(), Script::Rows(rows)));
        self
    }

    /// Queries containing `fragment` fail with `message`.
    pub fn failing_on(mut self, fragment: &str, message: &str) -> Self {
        self.scripts
            .push((fragment.to_string(), Script::Fail(message.to_string())));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn execute(&self, query: &str) -> Result<Vec<Row>, InfrastructureError> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(query.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let script = self
            .scripts
            .iter()
            .find(|(fragment, _)| query.contains(fragment.as_str()))
            .map(|(_, script)| script.clone());

        match script {
            Some(Script::Rows(rows)) => Ok(rows),
            Some(Script::Fail(msg)) => Err(InfrastructureError::QueryFailed(msg)),
            None => Ok(Vec::new()),
        }
    }

    fn engine_name(&self) -> &str {
        "scripted"
    }
}
