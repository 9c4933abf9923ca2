// dqgate/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dqgate")]
#[command(about = "Statistical data-quality gate for order fact tables", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🛡️  Runs the DQ checks (IQR, z-score, referential integrity) and applies the gate
    Check {
        /// Path to the DuckDB database holding the fact/dimension tables
        #[arg(long, default_value = "warehouse.duckdb")]
        db_path: String,

        /// Project directory (where dqgate.yaml lives)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Report issues but never fail (overrides DQ_FAIL_ON_ISSUE)
        #[arg(long)]
        warn_only: bool,

        /// Abort the run after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Where to write the JSON issue report (default: <project_dir>/target/dq_report.json)
        #[arg(long)]
        report_out: Option<PathBuf>,

        /// Output format for the findings
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// 📜 Prints the SQL each rule would run, without executing it
    Explain {
        /// Project directory (where dqgate.yaml lives)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}
