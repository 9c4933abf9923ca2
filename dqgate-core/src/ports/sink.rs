// dqgate-core/src/ports/sink.rs

use serde::Serialize;

use crate::domain::quality::{IssueReport, Suggestion};
use crate::error::DqError;

/// Structured payload emitted whenever a run finds issues.
#[derive(Debug, Clone, Serialize)]
pub struct IssuePayload<'a> {
    pub generated_at: String,
    pub fail_on_issue: bool,
    pub total_findings: usize,
    pub issues: &'a IssueReport,
    pub suggestions: &'a [Suggestion],
}

impl<'a> IssuePayload<'a> {
    pub fn new(report: &'a IssueReport, suggestions: &'a [Suggestion], fail_on_issue: bool) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            fail_on_issue,
            total_findings: report.total(),
            issues: report,
            suggestions,
        }
    }
}

/// Where issue reports go: logs, files, telemetry.
pub trait ReportSink: Send + Sync {
    fn emit(&self, payload: &IssuePayload<'_>) -> Result<(), DqError>;
}
