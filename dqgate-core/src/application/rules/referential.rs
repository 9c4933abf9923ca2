// dqgate-core/src/application/rules/referential.rs

use async_trait::async_trait;

use super::DetectionRule;
use crate::domain::error::DomainError;
use crate::domain::quality::{Category, Finding, FindingDetail, FkIssue};
use crate::ports::executor::Row;

/// Fact rows whose customer or product key has no dimension row. A row
/// missing both yields two findings.
pub struct ReferentialIntegrityRule;

impl ReferentialIntegrityRule {
    pub const ID: &'static str = "referential_integrity";

    const QUERY: &'static str = r#"
with c as (
  select f.order_id, f.customer_id as ref_key
  from {{ fact_table }} f
  left join {{ dim_customers }} dc on f.customer_id = dc.customer_id
  where dc.customer_id is null
),
p as (
  select f.order_id, f.product_id as ref_key
  from {{ fact_table }} f
  left join {{ dim_products }} dp on f.product_id = dp.product_id
  where dp.product_id is null
)
select issue, order_id, ref_key
from (
  select 'missing_customer' as issue, order_id, cast(ref_key as varchar) as ref_key from c
  union all
  select 'missing_product' as issue, order_id, cast(ref_key as varchar) as ref_key from p
) breaks
order by issue, order_id
"#;
}

#[async_trait]
impl DetectionRule for ReferentialIntegrityRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> Category {
        Category::FkBreaks
    }

    fn query_template(&self) -> &'static str {
        Self::QUERY
    }

    fn map_row(&self, row: &Row) -> Result<Option<Finding>, DomainError> {
        let tag = row.text("issue")?;
        let issue = FkIssue::from_tag(&tag).ok_or_else(|| DomainError::MalformedRow {
            column: "issue".into(),
            problem: format!("holds unknown tag '{}'", tag),
        })?;

        let key = row.opt_text("ref_key")?;

        Ok(Some(Finding::for_row(
            Self::ID,
            row.nullable_text("order_id")?,
            self.category(),
            FindingDetail::FkBreak { issue, key },
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_tags_map_to_fk_issues() -> anyhow::Result<()> {
        let customer = Row::new()
            .with("ISSUE", "missing_customer")
            .with("ORDER_ID", 3)
            .with("REF_KEY", "C-404");
        let finding = ReferentialIntegrityRule.map_row(&customer)?.unwrap();
        assert_eq!(finding.category, Category::FkBreaks);
        assert_eq!(
            finding.detail,
            FindingDetail::FkBreak {
                issue: FkIssue::MissingCustomer,
                key: Some("C-404".into()),
            }
        );
        Ok(())
    }

    #[test]
    fn test_null_or_absent_key_is_tolerated() -> anyhow::Result<()> {
        let null_key = Row::new()
            .with("issue", "missing_product")
            .with("order_id", 8)
            .with("ref_key", Value::Null);
        let no_key = Row::new().with("issue", "missing_product").with("order_id", 8);

        for row in [null_key, no_key] {
            let finding = ReferentialIntegrityRule.map_row(&row)?.unwrap();
            assert_eq!(
                finding.detail,
                FindingDetail::FkBreak {
                    issue: FkIssue::MissingProduct,
                    key: None,
                }
            );
        }
        Ok(())
    }

    #[test]
    fn test_null_order_id_still_yields_a_finding() -> anyhow::Result<()> {
        let row = Row::new()
            .with("issue", "missing_customer")
            .with("order_id", Value::Null)
            .with("ref_key", "C9");
        let finding = ReferentialIntegrityRule.map_row(&row)?.unwrap();
        assert_eq!(finding.order_id, None);
        assert_eq!(finding.rule_id, ReferentialIntegrityRule::ID);
        Ok(())
    }

    #[test]
    fn test_unknown_tag_is_malformed() {
        let row = Row::new().with("issue", "missing_store").with("order_id", 1);
        assert!(matches!(
            ReferentialIntegrityRule.map_row(&row),
            Err(DomainError::MalformedRow { .. })
        ));
    }
}
