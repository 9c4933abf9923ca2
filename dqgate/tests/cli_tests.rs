use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const SCHEMA: &str = "
CREATE TABLE dim_customers (customer_id VARCHAR PRIMARY KEY, name VARCHAR);
CREATE TABLE dim_products (product_id VARCHAR PRIMARY KEY, name VARCHAR);
CREATE TABLE fact_orders (
    order_id INTEGER,
    customer_id VARCHAR,
    product_id VARCHAR,
    quantity INTEGER,
    unit_price DECIMAL(10, 2),
    total_amount DECIMAL(12, 2)
);
INSERT INTO dim_customers VALUES ('C1', 'Ada'), ('C2', 'Grace');
INSERT INTO dim_products VALUES ('P1', 'Widget'), ('P2', 'Gadget');
INSERT INTO fact_orders VALUES
    (1, 'C1', 'P1', 2, 5.00, 10.00),
    (2, 'C2', 'P1', 2, 5.00, 10.00),
    (3, 'C1', 'P2', 2, 7.50, 15.00),
    (4, 'C2', 'P2', 2, 7.50, 15.00);
";

/// Temporary project: a DuckDB file plus a dqgate.yaml pointing at plain table names.
struct DqTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl DqTestEnv {
    fn new(extra_sql: &str) -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();

        {
            let conn = duckdb::Connection::open(root.join("warehouse.duckdb"))?;
            conn.execute_batch(SCHEMA)?;
            conn.execute_batch(extra_sql)?;
        }

        std::fs::write(
            root.join("dqgate.yaml"),
            "fail_on_issue: true\ntables:\n  fact_table: fact_orders\n  dim_customers: dim_customers\n  dim_products: dim_products\n",
        )?;

        Ok(Self { _tmp: tmp, root })
    }

    fn dqgate(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dqgate"));
        cmd.current_dir(&self.root)
            .env_remove("DQ_FAIL_ON_ISSUE")
            .env_remove("DQ_FACT_TABLE")
            .env_remove("DQ_DIM_CUSTOMERS")
            .env_remove("DQ_DIM_PRODUCTS");
        cmd
    }

    fn report(&self) -> PathBuf {
        self.root.join("target").join("dq_report.json")
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

const DANGLING_CUSTOMER: &str = "INSERT INTO fact_orders VALUES (5, 'C9', 'P1', 2, 5.00, 10.00);";

#[test]
fn test_clean_warehouse_passes() -> Result<()> {
    let env = DqTestEnv::new("")?;

    env.dqgate()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Advanced DQ checks passed."));

    assert!(!env.report().exists(), "no report is written for a clean run");
    Ok(())
}

#[test]
fn test_dangling_customer_fails_with_validation_code() -> Result<()> {
    let env = DqTestEnv::new(DANGLING_CUSTOMER)?;

    env.dqgate()
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DQ GATE CLOSED"))
        .stderr(predicate::str::contains("Advanced DQ checks failed"));

    let report = read_json(&env.report())?;
    let fk = &report["issues"]["fk_breaks"];
    assert_eq!(fk.as_array().map(|a| a.len()), Some(1));
    assert_eq!(fk[0]["order_id"], "5");
    assert_eq!(fk[0]["detail"]["issue"], "missing_customer");
    Ok(())
}

#[test]
fn test_warn_only_flag_reports_but_passes() -> Result<()> {
    let env = DqTestEnv::new(DANGLING_CUSTOMER)?;

    env.dqgate()
        .args(["check", "--warn-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("continuing"));

    assert!(env.report().exists());
    Ok(())
}

#[test]
fn test_env_flag_disables_failure() -> Result<()> {
    let env = DqTestEnv::new(DANGLING_CUSTOMER)?;

    env.dqgate()
        .env("DQ_FAIL_ON_ISSUE", "false")
        .arg("check")
        .assert()
        .success();
    Ok(())
}

#[test]
fn test_json_format_prints_outcome() -> Result<()> {
    let env = DqTestEnv::new(DANGLING_CUSTOMER)?;
    let out = env.root.join("out").join("issues.json");

    let output = env
        .dqgate()
        .args(["check", "--warn-only", "--format", "json", "--report-out"])
        .arg(&out)
        .output()?;
    assert!(output.status.success());

    // stdout carries nothing but the outcome document
    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(outcome["status"], "pass");
    assert_eq!(outcome["report"]["fk_breaks"][0]["order_id"], "5");
    assert!(
        outcome["suggestions"][0]["text"]
            .as_str()
            .is_some_and(|t| t.starts_with("Verify the upstream dimension load"))
    );

    let report = read_json(&out)?;
    assert_eq!(report["total_findings"], 1);
    assert_eq!(report["fail_on_issue"], false);
    Ok(())
}

#[test]
fn test_null_order_id_is_a_dq_failure() -> Result<()> {
    let env = DqTestEnv::new("INSERT INTO fact_orders VALUES (NULL, 'C9', 'P1', 2, 5.00, 10.00);")?;

    env.dqgate()
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("<null>"));

    let report = read_json(&env.report())?;
    assert_eq!(report["issues"]["fk_breaks"][0]["order_id"], serde_json::Value::Null);
    Ok(())
}

#[test]
fn test_timeout_exits_with_cancelled_code() -> Result<()> {
    // The fact view never finishes scanning, so only the deadline can end the run
    let env = DqTestEnv::new(
        "CREATE VIEW endless_orders AS
         SELECT a.x * 1000000 + b.y AS order_id, 'C1' AS customer_id, 'P1' AS product_id,
                (b.y % 7) AS quantity, 1.0 AS unit_price, CAST(b.y AS DOUBLE) AS total_amount
         FROM range(1000000) a(x), range(1000000) b(y);",
    )?;

    env.dqgate()
        .env("DQ_FACT_TABLE", "endless_orders")
        .args(["check", "--timeout-secs", "1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("DQ RUN ABORTED"));
    Ok(())
}

#[test]
fn test_rust_log_controls_verbosity() -> Result<()> {
    let env = DqTestEnv::new("")?;

    env.dqgate()
        .env("RUST_LOG", "debug")
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("Executing rule query"));

    env.dqgate()
        .env_remove("RUST_LOG")
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("Executing rule query").not());
    Ok(())
}

#[test]
fn test_missing_database_is_execution_error() -> Result<()> {
    let env = DqTestEnv::new("")?;

    env.dqgate()
        .args(["check", "--db-path", "nope.duckdb"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Database not found"));

    assert!(!env.root.join("nope.duckdb").exists());
    Ok(())
}

#[test]
fn test_missing_table_is_execution_error() -> Result<()> {
    let env = DqTestEnv::new("")?;

    env.dqgate()
        .env("DQ_DIM_PRODUCTS", "dim_missing")
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("DQ EXECUTION ERROR"));
    Ok(())
}

#[test]
fn test_explain_prints_rule_sql() -> Result<()> {
    let env = DqTestEnv::new("")?;

    env.dqgate()
        .arg("explain")
        .assert()
        .success()
        .stdout(predicate::str::contains("-- rule: iqr_quantity"))
        .stdout(predicate::str::contains("-- rule: zscore_amount"))
        .stdout(predicate::str::contains("-- rule: referential_integrity"))
        .stdout(predicate::str::contains("dim_customers"));
    Ok(())
}
