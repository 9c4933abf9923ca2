// dqgate-core/src/application/rules/iqr.rs

use async_trait::async_trait;
use tracing::warn;

use super::DetectionRule;
use crate::domain::error::DomainError;
use crate::domain::quality::{Category, Finding, FindingDetail, IqrBounds};
use crate::ports::executor::Row;

/// Quantity outliers over the whole fact table (no grouping), using Tukey
/// fences on continuous (linear) percentiles.
pub struct IqrRule;

impl IqrRule {
    pub const ID: &'static str = "iqr_quantity";

    const QUERY: &'static str = r#"
with q as (
  select cast(quantity as double) as q
  from {{ fact_table }}
),
stats as (
  select percentile_cont(0.25) within group (order by q) as q1,
         percentile_cont(0.75) within group (order by q) as q3
  from q
)
select f.order_id,
       cast(f.quantity as double) as quantity,
       s.q1,
       s.q3
from {{ fact_table }} f, stats s
where f.quantity < (s.q1 - {{ iqr_multiplier }} * (s.q3 - s.q1))
   or f.quantity > (s.q3 + {{ iqr_multiplier }} * (s.q3 - s.q1))
order by f.order_id
"#;
}

#[async_trait]
impl DetectionRule for IqrRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> Category {
        Category::IqrQuantity
    }

    fn query_template(&self) -> &'static str {
        Self::QUERY
    }

    fn map_row(&self, row: &Row) -> Result<Option<Finding>, DomainError> {
        let quantity = row.f64("quantity")?;
        let bounds = IqrBounds::from_quartiles(row.f64("q1")?, row.f64("q3")?);

        if !bounds.is_outlier(quantity) {
            return Ok(None);
        }

        Ok(Some(Finding::for_row(
            Self::ID,
            row.nullable_text("order_id")?,
            self.category(),
            FindingDetail::IqrQuantity {
                quantity,
                q1: bounds.q1,
                q3: bounds.q3,
                lower_bound: bounds.lower,
                upper_bound: bounds.upper,
            },
        )))
    }

    fn inspect(&self, findings: &[Finding]) {
        if let Some(bounds) = degenerate_bounds(findings) {
            warn!(
                rule = Self::ID,
                q1 = bounds.q1,
                flagged = findings.len(),
                "⚠️  IQR is zero: fences collapse to [Q1, Q3] and every deviating quantity is flagged"
            );
        }
    }
}

/// Whole-table quartiles as carried by the findings, when they collapsed.
/// Rows only come back when something was flagged, so a zero IQR with no
/// deviating quantity goes unreported (nothing was affected by it).
fn degenerate_bounds(findings: &[Finding]) -> Option<IqrBounds> {
    findings
        .iter()
        .find_map(|f| match f.detail {
            FindingDetail::IqrQuantity { q1, q3, .. } => Some(IqrBounds::from_quartiles(q1, q3)),
            _ => None,
        })
        .filter(IqrBounds::is_degenerate)
}
