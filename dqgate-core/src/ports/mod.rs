// dqgate-core/src/ports/mod.rs

pub mod executor;
pub mod sink;

pub use executor::{QueryExecutor, Row};
pub use sink::{IssuePayload, ReportSink};
