// dqgate-core/src/application/rules/mod.rs

// Each detection rule is an independent unit: it owns its SQL, runs it
// through the QueryExecutor port and maps rows into findings.

pub mod iqr;
pub mod referential;
pub mod zscore;

pub use iqr::IqrRule;
pub use referential::ReferentialIntegrityRule;
pub use zscore::ZScoreRule;

use async_trait::async_trait;
use serde_json::json;
use std::time::Instant;
use tracing::{debug, error};

use crate::application::ports::TemplateEngine;
use crate::domain::error::DomainError;
use crate::domain::quality::{Category, Finding, IQR_MULTIPLIER, TableConfig, ZSCORE_THRESHOLD};
use crate::error::DqError;
use crate::ports::executor::{QueryExecutor, Row};

/// Everything a rule needs for one run. Borrowed, read-only, shared by all rules.
pub struct RuleContext<'a> {
    pub executor: &'a dyn QueryExecutor,
    pub renderer: &'a dyn TemplateEngine,
    pub tables: &'a TableConfig,
}

/// Variables every rule template can use.
pub fn template_vars(tables: &TableConfig) -> serde_json::Value {
    json!({
        "fact_table": tables.fact_table,
        "dim_customers": tables.dim_customers,
        "dim_products": tables.dim_products,
        "iqr_multiplier": IQR_MULTIPLIER,
        "zscore_threshold": ZSCORE_THRESHOLD,
    })
}

#[async_trait]
pub trait DetectionRule: Send + Sync {
    fn id(&self) -> &'static str;

    fn category(&self) -> Category;

    fn query_template(&self) -> &'static str;

    /// `Ok(None)` when the row does not satisfy the rule's predicate.
    fn map_row(&self, row: &Row) -> Result<Option<Finding>, DomainError>;

    /// Hook for rule-specific diagnostics once all rows are mapped.
    fn inspect(&self, _findings: &[Finding]) {}

    fn render(&self, renderer: &dyn TemplateEngine, tables: &TableConfig) -> Result<String, DqError> {
        renderer.render(self.query_template(), &template_vars(tables))
    }

    async fn detect(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, DqError> {
        let sql = self.render(ctx.renderer, ctx.tables)?;
        let start = Instant::now();
        debug!(rule = self.id(), "⚡ Executing rule query:\n{}", sql);

        let rows = ctx.executor.execute(&sql).await.map_err(|source| {
            error!(rule = self.id(), "❌ Rule query failed after {:.2?}: {}", start.elapsed(), source);
            DqError::QueryExecution {
                rule: self.id().to_string(),
                source,
            }
        })?;

        let mut findings = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(finding) = self.map_row(row)? {
                findings.push(finding);
            }
        }
        self.inspect(&findings);

        debug!(
            rule = self.id(),
            rows = rows.len(),
            findings = findings.len(),
            "✅ Rule finished in {:.2?}",
            start.elapsed()
        );
        Ok(findings)
    }
}
