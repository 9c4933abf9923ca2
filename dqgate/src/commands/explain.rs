// dqgate/src/commands/explain.rs
//
// USE CASE: Dry run. Show the SQL each rule would send to the warehouse.

use std::path::PathBuf;

use anyhow::Context;
use dqgate_core::application::IssueAggregator;
use dqgate_core::infrastructure::compiler::jinja::SqlRenderer;
use dqgate_core::infrastructure::config::load_policy_config;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let config = load_policy_config(&project_dir).with_context(|| {
        format!("Failed to load DQ policy from {:?}", project_dir)
    })?;

    let plans = IssueAggregator::with_default_rules()
        .explain(&SqlRenderer::new(), &config.tables)
        .context("Failed to render rule queries")?;

    println!("📜 Fact table: {}", config.tables.fact_table);
    println!("   fail_on_issue: {}", config.fail_on_issue);
    for (rule, sql) in plans {
        println!("\n-- rule: {}", rule);
        println!("{}", sql.trim());
    }

    Ok(())
}
