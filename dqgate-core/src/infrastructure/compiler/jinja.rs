// dqgate-core/src/infrastructure/compiler/jinja.rs

// Turns rule query templates ({{ fact_table }}, {{ iqr_multiplier }}...) into
// SQL the warehouse can execute. Table names are injected here, never
// hard-coded in the rules.

use crate::application::ports::TemplateEngine;
use crate::error::DqError;
use crate::infrastructure::error::InfrastructureError;
use minijinja::{Environment, UndefinedBehavior};

pub struct SqlRenderer<'a> {
    env: Environment<'a>,
}

impl<'a> SqlRenderer<'a> {
    pub fn new() -> Self {
        let mut env = Environment::new();

        // A typo in a template variable must not silently produce `FROM ` with nothing after it
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        Self { env }
    }
}

impl<'a> Default for SqlRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TemplateEngine for SqlRenderer<'a> {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, DqError> {
        let sql = self
            .env
            .render_str(template, context)
            .map_err(InfrastructureError::TemplateError)?;
        Ok(sql)
    }
}
