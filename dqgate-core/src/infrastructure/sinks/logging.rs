// dqgate-core/src/infrastructure/sinks/logging.rs

use tracing::warn;

use crate::error::DqError;
use crate::ports::sink::{IssuePayload, ReportSink};

/// Emits the payload as one structured `warn!` event; the full report is a
/// JSON field so log shippers can parse it back.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&self, payload: &IssuePayload<'_>) -> Result<(), DqError> {
        let issues = serde_json::to_string_pretty(payload.issues)
            .map_err(|e| DqError::InternalError(format!("Serialization: {}", e)))?;
        let suggestions = serde_json::to_string_pretty(payload.suggestions)
            .map_err(|e| DqError::InternalError(format!("Serialization: {}", e)))?;

        warn!(
            total_findings = payload.total_findings,
            fail_on_issue = payload.fail_on_issue,
            generated_at = %payload.generated_at,
            issues = %issues,
            "DQ Issues Detected"
        );
        warn!(suggestions = %suggestions, "Remediation Suggestions");
        Ok(())
    }
}
