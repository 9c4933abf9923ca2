// dqgate-core/src/infrastructure/sinks/file.rs

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::DqError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::sink::{IssuePayload, ReportSink};

/// Writes the latest issue payload as pretty JSON (default `target/dq_report.json`).
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_target_dir(project_dir: &Path) -> Self {
        Self::new(project_dir.join("target").join("dq_report.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for JsonFileSink {
    fn emit(&self, payload: &IssuePayload<'_>) -> Result<(), DqError> {
        let content = serde_json::to_string_pretty(payload)
            .map_err(|e| DqError::InternalError(format!("Serialization: {}", e)))?;
        atomic_write(&self.path, content)?;
        info!(path = ?self.path, "📄 DQ report written");
        Ok(())
    }
}
