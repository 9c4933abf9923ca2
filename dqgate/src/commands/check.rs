// dqgate/src/commands/check.rs
//
// USE CASE: Run the advanced DQ checks and turn the verdict into an exit code.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use comfy_table::Table;
use dqgate_core::application::{CancellationToken, DqEngine, RunControl};
use dqgate_core::domain::DomainError;
use dqgate_core::domain::quality::{FindingDetail, NULL_ORDER_LABEL, Outcome};
use dqgate_core::infrastructure::adapters::duckdb::DuckDbExecutor;
use dqgate_core::infrastructure::config::load_policy_config;
use dqgate_core::infrastructure::sinks::JsonFileSink;
use dqgate_core::{DqError, PolicyConfig};

use crate::cli::OutputFormat;

pub const EXIT_PASS: i32 = 0;
pub const EXIT_VALIDATION_FAILED: i32 = 1;
pub const EXIT_EXECUTION_ERROR: i32 = 2;
pub const EXIT_CANCELLED: i32 = 3;

pub struct CheckArgs {
    pub db_path: String,
    pub project_dir: PathBuf,
    pub warn_only: bool,
    pub timeout_secs: Option<u64>,
    pub report_out: Option<PathBuf>,
    pub format: OutputFormat,
}

pub async fn execute(args: CheckArgs) -> anyhow::Result<i32> {
    // A + B. Policy and warehouse. Setup failures are execution errors, not DQ failures.
    let (config, engine, report_path) = match prepare(&args) {
        Ok(prepared) => prepared,
        Err(e) => {
            eprintln!("\n💥 DQ SETUP ERROR: {:#}", e);
            return Ok(EXIT_EXECUTION_ERROR);
        }
    };

    // C. Run control: Ctrl-C and optional deadline
    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling DQ run");
            on_interrupt.cancel();
        }
    });
    let mut control = RunControl::default().with_cancel(token);
    if let Some(secs) = args.timeout_secs {
        control = control.with_deadline(Duration::from_secs(secs));
    }

    let status = Status(args.format);
    status.say(format!(
        "🛡️  Running advanced DQ checks on {} (fail_on_issue: {})",
        config.tables.fact_table, config.fail_on_issue
    ));

    // D. Verdict -> exit code
    let outcome = match engine.run(&config, control).await {
        Ok(outcome) => outcome,
        Err(e) => return Ok(report_error(e)),
    };

    render(&outcome, args.format)?;
    if outcome.report.has_issues() {
        status.say(format!("📄 Issue report written to {}", report_path.display()));
    }

    let findings = outcome.report.total();
    match outcome.into_result() {
        Ok(passed) if passed.report.has_issues() => {
            status.say(format!(
                "\n⚠️  {} issue(s) detected, continuing (fail_on_issue = false).",
                findings
            ));
            Ok(EXIT_PASS)
        }
        Ok(_) => {
            status.say("\n✨ Advanced DQ checks passed.".to_string());
            Ok(EXIT_PASS)
        }
        Err(failure) => Ok(report_error(DomainError::from(failure).into())),
    }
}

/// Human-readable progress lines. Kept off stdout when stdout carries JSON.
struct Status(OutputFormat);

impl Status {
    fn say(&self, line: String) {
        match self.0 {
            OutputFormat::Table => println!("{}", line),
            OutputFormat::Json => eprintln!("{}", line),
        }
    }
}

/// Prints the diagnostic and maps it to the process exit code.
fn report_error(err: DqError) -> i32 {
    let (code, headline) = exit_code(&err);
    eprintln!("\n{}", headline);
    eprintln!("{:?}", miette::Report::new(err));
    code
}

fn exit_code(err: &DqError) -> (i32, &'static str) {
    if err.is_validation_failure() {
        (EXIT_VALIDATION_FAILED, "❌ DQ GATE CLOSED")
    } else if matches!(err, DqError::Cancelled(_)) {
        (EXIT_CANCELLED, "🛑 DQ RUN ABORTED")
    } else {
        (EXIT_EXECUTION_ERROR, "💥 DQ EXECUTION ERROR")
    }
}

fn prepare(args: &CheckArgs) -> anyhow::Result<(PolicyConfig, DqEngine, PathBuf)> {
    let mut config: PolicyConfig = load_policy_config(&args.project_dir).with_context(|| {
        format!("Failed to load DQ policy from {:?}", args.project_dir)
    })?;
    if args.warn_only {
        config.fail_on_issue = false;
    }

    // Opening a missing file would silently create an empty database.
    if args.db_path != ":memory:" && !Path::new(&args.db_path).exists() {
        anyhow::bail!("❌ Database not found at: {}", args.db_path);
    }
    let executor = DuckDbExecutor::new(&args.db_path)
        .with_context(|| format!("Failed to open DuckDB at {}", args.db_path))?;

    let report_sink = match &args.report_out {
        Some(path) => JsonFileSink::new(path),
        None => JsonFileSink::in_target_dir(&args.project_dir),
    };
    let report_path = report_sink.path().to_path_buf();
    tracing::debug!(db = %args.db_path, report = %report_path.display(), "DQ run prepared");
    let engine = DqEngine::new(Arc::new(executor)).with_sink(Arc::new(report_sink));

    Ok((config, engine, report_path))
}

fn render(outcome: &Outcome, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
        OutputFormat::Table => {
            if !outcome.report.has_issues() {
                return Ok(());
            }

            let mut findings = Table::new();
            findings.set_header(vec!["Category", "Order", "Rule", "Detail"]);
            for (category, items) in outcome.report.categories() {
                for f in items {
                    findings.add_row(vec![
                        category.to_string(),
                        f.order_label().to_string(),
                        f.rule_id.clone(),
                        describe(&f.detail),
                    ]);
                }
            }
            println!("\n🔎 DQ Issues Detected:\n{}", findings);

            let mut advice = Table::new();
            advice.set_header(vec!["Order", "Suggestion"]);
            for s in &outcome.suggestions {
                advice.add_row(vec![
                    s.order_id.as_deref().unwrap_or(NULL_ORDER_LABEL).to_string(),
                    s.text.clone(),
                ]);
            }
            println!("\n🩹 Remediation Suggestions:\n{}", advice);
        }
    }
    Ok(())
}

fn describe(detail: &FindingDetail) -> String {
    match detail {
        FindingDetail::IqrQuantity {
            quantity,
            lower_bound,
            upper_bound,
            ..
        } => format!(
            "quantity {} outside [{:.2}, {:.2}]",
            quantity, lower_bound, upper_bound
        ),
        FindingDetail::ZscoreAmount {
            product_id,
            total_amount,
            zscore,
            ..
        } => format!(
            "total_amount {:.2} on {} (z = {:.2})",
            total_amount, product_id, zscore
        ),
        FindingDetail::FkBreak { issue, key } => match key {
            Some(k) => format!("{} ({})", issue.as_str(), k),
            None => issue.as_str().to_string(),
        },
    }
}
