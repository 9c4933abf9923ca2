// dqgate/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug dqgate check ... shows the rendered SQL and rule timings.
    // Logs go to stderr: stdout carries the findings (and JSON with --format json).
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            db_path,
            project_dir,
            warn_only,
            timeout_secs,
            report_out,
            format,
        } => {
            let args = commands::check::CheckArgs {
                db_path,
                project_dir,
                warn_only,
                timeout_secs,
                report_out,
                format,
            };
            let code = commands::check::execute(args).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Explain { project_dir } => commands::explain::execute(project_dir)?,
    }

    Ok(())
}
