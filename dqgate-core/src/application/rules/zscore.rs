// dqgate-core/src/application/rules/zscore.rs

use async_trait::async_trait;

use super::DetectionRule;
use crate::domain::error::DomainError;
use crate::domain::quality::stats::{exceeds_threshold, standardize};
use crate::domain::quality::{Category, Finding, FindingDetail};
use crate::ports::executor::Row;

/// `total_amount` deviations within each product, in units of the product's
/// sample standard deviation. Products without variance are exempt.
pub struct ZScoreRule;

impl ZScoreRule {
    pub const ID: &'static str = "zscore_amount";

    const QUERY: &'static str = r#"
with stats as (
  select product_id,
         cast(avg(total_amount) as double) as mean_amt,
         cast(stddev_samp(total_amount) as double) as std_amt
  from {{ fact_table }}
  group by product_id
)
select f.order_id,
       f.product_id,
       cast(f.total_amount as double) as total_amount,
       s.mean_amt,
       s.std_amt,
       case when s.std_amt is null or s.std_amt = 0 then 0
            else (f.total_amount - s.mean_amt) / s.std_amt end as zscore
from {{ fact_table }} f
join stats s on f.product_id = s.product_id
where abs(coalesce(
  case when s.std_amt is null or s.std_amt = 0 then 0
       else (f.total_amount - s.mean_amt) / s.std_amt end, 0)) >= {{ zscore_threshold }}
order by f.order_id
"#;
}

#[async_trait]
impl DetectionRule for ZScoreRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> Category {
        Category::ZscoreAmount
    }

    fn query_template(&self) -> &'static str {
        Self::QUERY
    }

    fn map_row(&self, row: &Row) -> Result<Option<Finding>, DomainError> {
        let total_amount = row.f64("total_amount")?;
        let mean_amt = row.f64("mean_amt")?;
        let std_amt = row.opt_f64("std_amt")?;

        // Recomputed here so the exemption and the inclusive cut-off hold
        // whatever the backend's float handling.
        let zscore = standardize(total_amount, mean_amt, std_amt);
        if !exceeds_threshold(zscore) {
            return Ok(None);
        }

        Ok(Some(Finding::for_row(
            Self::ID,
            row.nullable_text("order_id")?,
            self.category(),
            FindingDetail::ZscoreAmount {
                product_id: row.text("product_id")?,
                total_amount,
                mean_amt,
                std_amt,
                zscore,
            },
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn row(order_id: &str, amount: f64, mean: f64, std: Value) -> Row {
        Row::new()
            .with("order_id", order_id)
            .with("product_id", "P-1")
            .with("total_amount", amount)
            .with("mean_amt", mean)
            .with("std_amt", std)
    }

    #[test]
    fn test_threshold_boundary() -> anyhow::Result<()> {
        let flagged = ZScoreRule.map_row(&row("A", 131.0, 100.0, 10.0_f64.into()))?;
        let kept = ZScoreRule.map_row(&row("B", 129.0, 100.0, 10.0_f64.into()))?;

        let flagged = flagged.unwrap();
        assert_eq!(flagged.order_id.as_deref(), Some("A"));
        match flagged.detail {
            FindingDetail::ZscoreAmount { zscore, .. } => assert!((zscore - 3.1).abs() < 1e-9),
            other => panic!("unexpected detail {:?}", other),
        }
        assert!(kept.is_none());
        Ok(())
    }

    #[test]
    fn test_negative_deviation_is_flagged() -> anyhow::Result<()> {
        assert!(ZScoreRule.map_row(&row("C", 60.0, 100.0, 10.0_f64.into()))?.is_some());
        Ok(())
    }

    #[test]
    fn test_groups_without_variance_are_exempt() -> anyhow::Result<()> {
        // single observation: stddev_samp is NULL
        assert!(ZScoreRule.map_row(&row("D", 1e9, 10.0, Value::Null))?.is_none());
        // identical amounts: stddev_samp is 0
        assert!(ZScoreRule.map_row(&row("E", 1e9, 10.0, 0.0_f64.into()))?.is_none());
        Ok(())
    }
}
