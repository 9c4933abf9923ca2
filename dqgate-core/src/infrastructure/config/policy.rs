// dqgate-core/src/infrastructure/config/policy.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::quality::policy::{PolicyConfig, parse_flag};
use crate::infrastructure::error::InfrastructureError;

pub const ENV_FAIL_ON_ISSUE: &str = "DQ_FAIL_ON_ISSUE";
pub const ENV_FACT_TABLE: &str = "DQ_FACT_TABLE";
pub const ENV_DIM_CUSTOMERS: &str = "DQ_DIM_CUSTOMERS";
pub const ENV_DIM_PRODUCTS: &str = "DQ_DIM_PRODUCTS";

const CANDIDATES: [&str; 2] = ["dqgate.yaml", "dqgate.yml"];

/// Loads the policy from `project_dir` and the process environment.
pub fn load_policy_config(project_dir: &Path) -> Result<PolicyConfig, InfrastructureError> {
    load_policy_config_with(project_dir, |key| std::env::var(key).ok())
}

/// Same as [`load_policy_config`] with an injected environment lookup.
///
/// Layering: defaults < `dqgate.yaml` < environment variables.
/// The config file is optional; the defaults describe the standard warehouse layout.
#[instrument(skip(project_dir, env))]
pub fn load_policy_config_with<F>(
    project_dir: &Path,
    env: F,
) -> Result<PolicyConfig, InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    // 1. Base YAML (optional)
    let mut config = match find_policy_file(project_dir) {
        Some(path) => {
            info!(path = ?path, "Loading DQ policy file");
            let content = fs::read_to_string(&path)?;
            // An empty file is a valid "all defaults" policy
            if content.trim().is_empty() {
                PolicyConfig::default()
            } else {
                serde_yaml::from_str(&content)?
            }
        }
        None => {
            info!(dir = ?project_dir, "No DQ policy file, using defaults");
            PolicyConfig::default()
        }
    };

    // 2. Environment overrides
    apply_env_overrides(&mut config, &env);

    // 3. Identifiers end up inside SQL: validate before anything runs
    config
        .check()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;

    Ok(config)
}

fn find_policy_file(root: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

fn apply_env_overrides<F>(config: &mut PolicyConfig, env: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = env(ENV_FAIL_ON_ISSUE) {
        let val = parse_flag(&raw);
        info!(old = config.fail_on_issue, new = val, "Overriding fail_on_issue via ENV");
        config.fail_on_issue = val;
    }

    let tables = [
        (ENV_FACT_TABLE, &mut config.tables.fact_table),
        (ENV_DIM_CUSTOMERS, &mut config.tables.dim_customers),
        (ENV_DIM_PRODUCTS, &mut config.tables.dim_products),
    ];
    for (key, slot) in tables {
        if let Some(val) = env(key) {
            info!(var = key, old = %slot, new = %val, "Overriding table via ENV");
            *slot = val;
        }
    }
}
