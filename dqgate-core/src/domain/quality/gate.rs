// dqgate-core/src/domain/quality/gate.rs

use tracing::{info, warn};

use super::advisor::Suggestion;
use super::outcome::{Outcome, Verdict};
use super::report::IssueReport;

/// Evaluating -> {Pass, Fail}. Both states are terminal.
pub struct PolicyGate;

impl PolicyGate {
    pub fn decide(has_issues: bool, fail_on_issue: bool) -> Verdict {
        match (has_issues, fail_on_issue) {
            (false, _) => Verdict::Pass,
            (true, true) => Verdict::Fail,
            (true, false) => Verdict::Pass,
        }
    }

    pub fn evaluate(
        report: IssueReport,
        suggestions: Vec<Suggestion>,
        fail_on_issue: bool,
    ) -> Outcome {
        let status = Self::decide(report.has_issues(), fail_on_issue);

        match status {
            Verdict::Fail => warn!(
                findings = report.total(),
                "❌ Gate closed: data quality issues detected (fail_on_issue = true)"
            ),
            Verdict::Pass if report.has_issues() => warn!(
                findings = report.total(),
                "⚠️  Gate open despite data quality issues (fail_on_issue = false)"
            ),
            Verdict::Pass => info!("✅ Gate open: no data quality issues"),
        }

        Outcome {
            status,
            report,
            suggestions,
        }
    }
}
