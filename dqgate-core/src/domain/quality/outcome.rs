// dqgate-core/src/domain/quality/outcome.rs

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::advisor::Suggestion;
use super::report::IssueReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
}

/// Terminal result of one engine run, handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub status: Verdict,
    pub report: IssueReport,
    pub suggestions: Vec<Suggestion>,
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        self.status == Verdict::Pass
    }

    /// Converts a failing outcome into an error the host can raise,
    /// carrying the full report.
    pub fn into_result(self) -> Result<Outcome, ValidationFailure> {
        match self.status {
            Verdict::Pass => Ok(self),
            Verdict::Fail => Err(ValidationFailure {
                report: self.report,
                suggestions: self.suggestions,
            }),
        }
    }
}

/// Business-level failure: the data is bad and policy says stop.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic, Serialize, Deserialize)]
#[error("Advanced DQ checks failed: {} finding(s) across {} order(s)", .report.total(), .report.affected_orders())]
#[diagnostic(
    code(dqgate::validation_failure),
    help("See the emitted issue report and remediation suggestions for details.")
)]
pub struct ValidationFailure {
    pub report: IssueReport,
    pub suggestions: Vec<Suggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quality::finding::{Category, Finding, FindingDetail, FkIssue};

    fn failing_outcome() -> Outcome {
        let mut report = IssueReport::new();
        report.insert(Finding::new(
            "referential_integrity",
            "11",
            Category::FkBreaks,
            FindingDetail::FkBreak {
                issue: FkIssue::MissingProduct,
                key: None,
            },
        ));
        Outcome {
            status: Verdict::Fail,
            report,
            suggestions: vec![],
        }
    }

    #[test]
    fn test_fail_converts_into_validation_failure() {
        let res = failing_outcome().into_result();
        match res {
            Err(failure) => {
                assert_eq!(failure.report.total(), 1);
                assert!(failure.to_string().contains("1 finding(s) across 1 order(s)"));
            }
            Ok(_) => panic!("Expected a validation failure"),
        }
    }

    #[test]
    fn test_pass_converts_into_ok() {
        let outcome = Outcome {
            status: Verdict::Pass,
            report: IssueReport::new(),
            suggestions: vec![],
        };
        assert!(outcome.clone().into_result().is_ok());
        assert!(outcome.is_pass());
    }
}
