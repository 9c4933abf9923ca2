// dqgate-core/src/domain/quality/advisor.rs

use serde::{Deserialize, Serialize};

use super::finding::Category;
use super::report::IssueReport;

/// Suggestions are generated z-score first, then IQR, then FK. This differs
/// from the aggregation order on purpose and must stay fixed for reproducible
/// output.
pub const SUGGESTION_ORDER: [Category; 3] = [
    Category::ZscoreAmount,
    Category::IqrQuantity,
    Category::FkBreaks,
];

/// Advisory remediation for one finding. Nothing is repaired automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub order_id: Option<String>,
    pub category: Category,
    pub text: String,
}

impl Category {
    pub fn remediation(&self) -> &'static str {
        match self {
            Category::ZscoreAmount => {
                "Recompute total amount as quantity × unit price, or replace with the product's median amount."
            }
            Category::IqrQuantity => {
                "Clamp quantity to the computed IQR bounds, or route to manual review."
            }
            Category::FkBreaks => {
                "Verify the upstream dimension load; quarantine the row until the reference is resolved."
            }
        }
    }
}

pub struct RemediationAdvisor;

impl RemediationAdvisor {
    /// Exactly one suggestion per finding, categories in `SUGGESTION_ORDER`,
    /// findings in report order within a category.
    pub fn advise(report: &IssueReport) -> Vec<Suggestion> {
        let mut suggestions = Vec::with_capacity(report.total());
        for category in SUGGESTION_ORDER {
            suggestions.extend(report.findings(category).iter().map(|f| Suggestion {
                order_id: f.order_id.clone(),
                category,
                text: category.remediation().to_string(),
            }));
        }
        suggestions
    }
}
