// dqgate-core/src/application/engine.rs

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::application::aggregator::IssueAggregator;
use crate::application::control::RunControl;
use crate::application::ports::TemplateEngine;
use crate::application::rules::RuleContext;
use crate::domain::quality::{
    IssueReport, Outcome, PolicyConfig, PolicyGate, RemediationAdvisor, Suggestion,
};
use crate::error::DqError;
use crate::infrastructure::compiler::jinja::SqlRenderer;
use crate::infrastructure::sinks::TracingSink;
use crate::ports::executor::QueryExecutor;
use crate::ports::sink::{IssuePayload, ReportSink};

/// Rules -> aggregation -> advice -> sinks -> gate.
///
/// Stateless between runs: every call to [`DqEngine::run`] starts from an
/// empty report and takes its policy as an argument.
pub struct DqEngine {
    executor: Arc<dyn QueryExecutor>,
    renderer: Arc<dyn TemplateEngine>,
    aggregator: IssueAggregator,
    sinks: Vec<Arc<dyn ReportSink>>,
}

impl DqEngine {
    /// Built-in rules, minijinja rendering, reports logged through tracing.
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            renderer: Arc::new(SqlRenderer::new()),
            aggregator: IssueAggregator::with_default_rules(),
            sinks: vec![Arc::new(TracingSink)],
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn TemplateEngine>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_aggregator(mut self, aggregator: IssueAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// Adds a sink next to the existing ones.
    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Replaces every sink, including the default tracing one.
    pub fn with_sinks(mut self, sinks: Vec<Arc<dyn ReportSink>>) -> Self {
        self.sinks = sinks;
        self
    }

    #[instrument(
        skip_all,
        fields(engine = self.executor.engine_name(), fail_on_issue = config.fail_on_issue)
    )]
    pub async fn run(&self, config: &PolicyConfig, control: RunControl) -> Result<Outcome, DqError> {
        config.check()?;
        let start = Instant::now();
        let ctx = self.context(config);

        info!(
            "🔎 Running {} data quality rules on {}",
            self.aggregator.rules().len(),
            config.tables.fact_table
        );

        // Barrier: the gate only runs once every rule has answered.
        let report = tokio::select! {
            biased;
            reason = control.interrupted() => {
                warn!("🛑 DQ run abandoned after {:.2?}: {}", start.elapsed(), reason);
                return Err(DqError::Cancelled(reason));
            }
            collected = self.aggregator.collect(&ctx) => collected?,
        };

        let suggestions = if report.has_issues() {
            let suggestions = RemediationAdvisor::advise(&report);
            self.publish(&report, &suggestions, config.fail_on_issue)?;
            suggestions
        } else {
            info!("✅ Advanced DQ checks passed.");
            Vec::new()
        };

        let outcome = PolicyGate::evaluate(report, suggestions, config.fail_on_issue);
        info!(
            status = ?outcome.status,
            findings = outcome.report.total(),
            "✨ DQ run finished in {:.2?}",
            start.elapsed()
        );
        Ok(outcome)
    }

    fn context<'a>(&'a self, config: &'a PolicyConfig) -> RuleContext<'a> {
        RuleContext {
            executor: self.executor.as_ref(),
            renderer: self.renderer.as_ref(),
            tables: &config.tables,
        }
    }

    fn publish(
        &self,
        report: &IssueReport,
        suggestions: &[Suggestion],
        fail_on_issue: bool,
    ) -> Result<(), DqError> {
        let payload = IssuePayload::new(report, suggestions, fail_on_issue);
        for sink in &self.sinks {
            sink.emit(&payload)?;
        }
        Ok(())
    }
}
