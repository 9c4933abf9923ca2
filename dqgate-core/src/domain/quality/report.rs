// dqgate-core/src/domain/quality/report.rs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::finding::{AGGREGATION_ORDER, Category, Finding};

/// Findings grouped by category. Every category is present (possibly empty),
/// iterated in aggregation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueReport {
    issues: BTreeMap<Category, Vec<Finding>>,
}

impl Default for IssueReport {
    fn default() -> Self {
        Self::new()
    }
}

impl IssueReport {
    pub fn new() -> Self {
        Self {
            issues: AGGREGATION_ORDER.iter().map(|c| (*c, Vec::new())).collect(),
        }
    }

    /// Files the findings under their own category, keeping arrival order.
    /// A second flag for the same row and check is dropped; returns how many
    /// findings were kept.
    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) -> usize {
        let mut kept = 0;
        for finding in findings {
            if self.insert(finding) {
                kept += 1;
            }
        }
        kept
    }

    pub fn insert(&mut self, finding: Finding) -> bool {
        let bucket = self.issues.entry(finding.category).or_default();
        let key = finding.flag_key();
        if key.is_some() && bucket.iter().any(|f| f.flag_key() == key) {
            return false;
        }
        bucket.push(finding);
        true
    }

    pub fn findings(&self, category: Category) -> &[Finding] {
        self.issues.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = (Category, &[Finding])> {
        self.issues.iter().map(|(c, f)| (*c, f.as_slice()))
    }

    pub fn has_issues(&self) -> bool {
        self.issues.values().any(|f| !f.is_empty())
    }

    pub fn total(&self) -> usize {
        self.issues.values().map(Vec::len).sum()
    }

    /// Number of rows flagged by at least one check. Orders are counted once
    /// across categories; each finding on a NULL `order_id` counts on its own.
    pub fn affected_orders(&self) -> usize {
        let findings = self.issues.values().flatten();
        let unidentified = findings.clone().filter(|f| f.order_id.is_none()).count();
        let identified: HashSet<&str> = findings.filter_map(|f| f.order_id.as_deref()).collect();
        identified.len() + unidentified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quality::finding::{FindingDetail, FkIssue};

    fn fk(order_id: &str, issue: FkIssue) -> Finding {
        Finding::new(
            "referential_integrity",
            order_id,
            Category::FkBreaks,
            FindingDetail::FkBreak { issue, key: None },
        )
    }

    fn iqr(order_id: &str, quantity: f64) -> Finding {
        Finding::new(
            "iqr_quantity",
            order_id,
            Category::IqrQuantity,
            FindingDetail::IqrQuantity {
                quantity,
                q1: 2.0,
                q3: 3.0,
                lower_bound: 0.5,
                upper_bound: 4.5,
            },
        )
    }

    #[test]
    fn test_empty_report_lists_every_category() {
        let report = IssueReport::new();
        assert!(!report.has_issues());
        assert_eq!(report.total(), 0);
        let cats: Vec<Category> = report.categories().map(|(c, _)| c).collect();
        assert_eq!(cats, AGGREGATION_ORDER.to_vec());
    }

    #[test]
    fn test_same_row_flagged_once_per_category() {
        let mut report = IssueReport::new();
        assert!(report.insert(iqr("7", 100.0)));
        assert!(!report.insert(iqr("7", 100.0)));
        assert_eq!(report.findings(Category::IqrQuantity).len(), 1);
    }

    #[test]
    fn test_row_missing_both_keys_keeps_two_findings() {
        let mut report = IssueReport::new();
        let kept = report.extend([
            fk("9", FkIssue::MissingCustomer),
            fk("9", FkIssue::MissingProduct),
        ]);
        assert_eq!(kept, 2);
        assert_eq!(report.findings(Category::FkBreaks).len(), 2);
        assert_eq!(report.affected_orders(), 1);
    }

    #[test]
    fn test_rows_without_order_id_are_never_merged() {
        let unidentified = |issue| {
            Finding::for_row(
                "referential_integrity",
                None,
                Category::FkBreaks,
                FindingDetail::FkBreak { issue, key: None },
            )
        };
        let mut report = IssueReport::new();
        let kept = report.extend([
            unidentified(FkIssue::MissingCustomer),
            unidentified(FkIssue::MissingCustomer),
            fk("4", FkIssue::MissingCustomer),
        ]);
        assert_eq!(kept, 3);
        assert_eq!(report.affected_orders(), 3);
    }

    #[test]
    fn test_order_may_appear_in_several_categories() {
        let mut report = IssueReport::new();
        report.extend([iqr("3", 50.0), fk("3", FkIssue::MissingProduct)]);
        assert_eq!(report.total(), 2);
        assert!(report.has_issues());
    }

    #[test]
    fn test_serializes_as_category_map() -> anyhow::Result<()> {
        let mut report = IssueReport::new();
        report.insert(iqr("1", 100.0));
        let json = serde_json::to_value(&report)?;
        assert_eq!(json["iqr_quantity"][0]["order_id"], "1");
        assert_eq!(json["iqr_quantity"][0]["detail"]["kind"], "iqr_quantity");
        assert_eq!(json["fk_breaks"], serde_json::json!([]));
        Ok(())
    }
}
