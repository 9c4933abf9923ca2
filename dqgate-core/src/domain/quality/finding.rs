// dqgate-core/src/domain/quality/finding.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue categories, declared in aggregation order (IQR, z-score, FK).
/// `Ord` follows declaration order, which keeps report maps in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    IqrQuantity,
    ZscoreAmount,
    FkBreaks,
}

/// Order in which rules are run and categories appear in the report.
pub const AGGREGATION_ORDER: [Category; 3] = [
    Category::IqrQuantity,
    Category::ZscoreAmount,
    Category::FkBreaks,
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::IqrQuantity => "iqr_quantity",
            Category::ZscoreAmount => "zscore_amount",
            Category::FkBreaks => "fk_breaks",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which dimension a fact row failed to reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FkIssue {
    MissingCustomer,
    MissingProduct,
}

impl FkIssue {
    pub fn as_str(&self) -> &'static str {
        match self {
            FkIssue::MissingCustomer => "missing_customer",
            FkIssue::MissingProduct => "missing_product",
        }
    }

    /// Parses the tag projected by the referential-integrity query.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "missing_customer" => Some(FkIssue::MissingCustomer),
            "missing_product" => Some(FkIssue::MissingProduct),
            _ => None,
        }
    }
}

/// Rule-specific evidence attached to a finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingDetail {
    IqrQuantity {
        quantity: f64,
        q1: f64,
        q3: f64,
        lower_bound: f64,
        upper_bound: f64,
    },
    ZscoreAmount {
        product_id: String,
        total_amount: f64,
        mean_amt: f64,
        std_amt: Option<f64>,
        zscore: f64,
    },
    FkBreak {
        issue: FkIssue,
        /// The dangling key value, when the query projects it.
        key: Option<String>,
    },
}

/// How a NULL `order_id` is shown to humans.
pub const NULL_ORDER_LABEL: &str = "<null>";

/// One detected anomaly on one fact row. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    /// `None` when the fact row itself has a NULL `order_id`.
    pub order_id: Option<String>,
    pub category: Category,
    pub detail: FindingDetail,
}

impl Finding {
    pub fn new(
        rule_id: impl Into<String>,
        order_id: impl Into<String>,
        category: Category,
        detail: FindingDetail,
    ) -> Self {
        Self::for_row(rule_id, Some(order_id.into()), category, detail)
    }

    /// Same as [`Finding::new`] for a row whose `order_id` may be NULL.
    pub fn for_row(
        rule_id: impl Into<String>,
        order_id: Option<String>,
        category: Category,
        detail: FindingDetail,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            order_id,
            category,
            detail,
        }
    }

    /// Identity of the flag within its category: one flag per row per check.
    /// Referential breaks are keyed by their sub-tag too, so a row missing both
    /// dimensions keeps its two findings. Rows without an `order_id` cannot be
    /// told apart and have no key.
    pub fn flag_key(&self) -> Option<(&str, Option<FkIssue>)> {
        let sub_tag = match &self.detail {
            FindingDetail::FkBreak { issue, .. } => Some(*issue),
            _ => None,
        };
        self.order_id.as_deref().map(|id| (id, sub_tag))
    }

    /// Display form of the order id.
    pub fn order_label(&self) -> &str {
        self.order_id.as_deref().unwrap_or(NULL_ORDER_LABEL)
    }
}
