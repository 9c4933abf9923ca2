// dqgate-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::quality::outcome::ValidationFailure;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error(transparent)]
    #[diagnostic(
        code(dqgate::domain::validation),
        help("Inspect the emitted issue report; set DQ_FAIL_ON_ISSUE=false to only warn.")
    )]
    ValidationFailure(#[from] Box<ValidationFailure>),

    #[error("Malformed result row: column '{column}' {problem}")]
    #[diagnostic(
        code(dqgate::domain::malformed_row),
        help("The rule query must project this column; check the rendered SQL with `dqgate explain`.")
    )]
    MalformedRow { column: String, problem: String },

    #[error("Invalid policy configuration: {0}")]
    #[diagnostic(code(dqgate::domain::config))]
    InvalidConfig(String),
}

impl From<ValidationFailure> for DomainError {
    fn from(failure: ValidationFailure) -> Self {
        DomainError::ValidationFailure(Box::new(failure))
    }
}
