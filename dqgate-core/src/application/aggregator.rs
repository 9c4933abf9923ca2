// dqgate-core/src/application/aggregator.rs

use futures::future::try_join_all;
use tracing::{info, warn};

use crate::application::ports::TemplateEngine;
use crate::application::rules::{
    DetectionRule, IqrRule, ReferentialIntegrityRule, RuleContext, ZScoreRule,
};
use crate::domain::quality::{IssueReport, TableConfig};
use crate::error::DqError;

/// Runs every registered rule and files the findings by category.
pub struct IssueAggregator {
    rules: Vec<Box<dyn DetectionRule>>,
}

impl Default for IssueAggregator {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl IssueAggregator {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The three built-in checks, registered in aggregation order.
    pub fn with_default_rules() -> Self {
        let mut aggregator = Self::new();
        aggregator.register(Box::new(IqrRule));
        aggregator.register(Box::new(ZScoreRule));
        aggregator.register(Box::new(ReferentialIntegrityRule));
        aggregator
    }

    pub fn register(&mut self, rule: Box<dyn DetectionRule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Box<dyn DetectionRule>] {
        &self.rules
    }

    /// Rendered SQL per rule, in registration order. Nothing is executed.
    pub fn explain(
        &self,
        renderer: &dyn TemplateEngine,
        tables: &TableConfig,
    ) -> Result<Vec<(&'static str, String)>, DqError> {
        self.rules
            .iter()
            .map(|rule| rule.render(renderer, tables).map(|sql| (rule.id(), sql)))
            .collect()
    }

    /// Barrier over all rules. They run concurrently against the same
    /// snapshot; the first error aborts the others and no report is built.
    /// Results are merged in registration order, so the report does not
    /// depend on which query finished first.
    pub async fn collect(&self, ctx: &RuleContext<'_>) -> Result<IssueReport, DqError> {
        let results = try_join_all(self.rules.iter().map(|rule| rule.detect(ctx))).await?;

        let mut report = IssueReport::new();
        for (rule, findings) in self.rules.iter().zip(results) {
            let produced = findings.len();
            let kept = report.extend(findings);
            if kept < produced {
                warn!(
                    rule = rule.id(),
                    dropped = produced - kept,
                    "Duplicate flags for the same row dropped"
                );
            }
            info!(rule = rule.id(), category = %rule.category(), findings = kept, "Rule collected");
        }

        Ok(report)
    }
}
