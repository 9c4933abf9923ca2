// dqgate-core/src/domain/quality/policy.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

use crate::domain::error::DomainError;

// One to three dot-separated identifiers: table, schema.table, db.schema.table.
#[allow(clippy::expect_used)]
static TABLE_IDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*){0,2}$")
        .expect("table identifier pattern is valid")
});

/// Values accepted as "on" for boolean environment flags.
const TRUTHY: [&str; 3] = ["1", "true", "yes"];

/// Case-insensitive truthy parse. Anything outside `1/true/yes` is false.
pub fn parse_flag(raw: &str) -> bool {
    let value = raw.trim().to_lowercase();
    TRUTHY.contains(&value.as_str())
}

/// Policy for one engine run. Passed in explicitly, never read from globals.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct PolicyConfig {
    #[serde(default = "default_fail_on_issue")]
    pub fail_on_issue: bool,

    #[validate(nested)]
    #[serde(default)]
    pub tables: TableConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            fail_on_issue: default_fail_on_issue(),
            tables: TableConfig::default(),
        }
    }
}

impl PolicyConfig {
    /// Rejects identifiers that would be unsafe to interpolate into SQL.
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::InvalidConfig(e.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct TableConfig {
    #[validate(custom(function = "validate_table_ident"))]
    #[serde(default = "default_fact_table")]
    pub fact_table: String,

    #[validate(custom(function = "validate_table_ident"))]
    #[serde(default = "default_dim_customers")]
    pub dim_customers: String,

    #[validate(custom(function = "validate_table_ident"))]
    #[serde(default = "default_dim_products")]
    pub dim_products: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            fact_table: default_fact_table(),
            dim_customers: default_dim_customers(),
            dim_products: default_dim_products(),
        }
    }
}

fn validate_table_ident(value: &str) -> Result<(), ValidationError> {
    if TABLE_IDENT.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("table_identifier");
        err.message = Some(format!("'{}' is not a valid table identifier", value).into());
        Err(err)
    }
}

fn default_fail_on_issue() -> bool {
    true
}
fn default_fact_table() -> String {
    "ANALYTICS.PUBLIC.FACT_ORDERS".to_string()
}
fn default_dim_customers() -> String {
    "ANALYTICS.PUBLIC.DIM_CUSTOMERS".to_string()
}
fn default_dim_products() -> String {
    "ANALYTICS.PUBLIC.DIM_PRODUCTS".to_string()
}
