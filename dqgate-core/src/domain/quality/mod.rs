// dqgate-core/src/domain/quality/mod.rs

pub mod advisor;
pub mod finding;
pub mod gate;
pub mod outcome;
pub mod policy;
pub mod report;
pub mod stats;

pub use advisor::{RemediationAdvisor, SUGGESTION_ORDER, Suggestion};
pub use finding::{AGGREGATION_ORDER, Category, FindingDetail, FkIssue, Finding, NULL_ORDER_LABEL};
pub use gate::PolicyGate;
pub use outcome::{Outcome, ValidationFailure, Verdict};
pub use policy::{PolicyConfig, TableConfig, parse_flag};
pub use report::IssueReport;
pub use stats::{IQR_MULTIPLIER, IqrBounds, ZSCORE_THRESHOLD};
