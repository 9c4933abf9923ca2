// dqgate-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(dqgate::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("DuckDB connection lock poisoned")]
    #[diagnostic(code(dqgate::infra::database::poisoned))]
    Poisoned,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    #[error("Query failed: {0}")]
    #[diagnostic(
        code(dqgate::infra::query),
        help("Check warehouse connectivity, permissions and the table identifiers.")
    )]
    QueryFailed(String),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(dqgate::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(dqgate::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(dqgate::infra::config))]
    ConfigError(String),

    // --- TEMPLATING ---
    #[error("Query Template Error: {0}")]
    #[diagnostic(
        code(dqgate::infra::template),
        help("Check the Jinja syntax ({{ ... }}) of the rule query.")
    )]
    TemplateError(#[from] minijinja::Error),
}

// Shortcut so `?` works directly on duckdb calls
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
