// dqgate-core/src/lib.rs

// 1. Documentation is welcome but not enforced yet
#![allow(missing_docs)]
// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts the engine consumes: query execution, report sinks.
pub mod ports;

// 2. Domain (business core)
// Findings, statistics, remediation advice, pass/fail policy.
// Depends on NOTHING else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB executor, SQL templating, config files, report sinks.
pub mod infrastructure;

// 4. Application (Use Cases)
// Detection rules, aggregation, engine orchestration.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// `use dqgate_core::{DqEngine, DqError, Outcome};`
pub use application::{DqEngine, RunControl};
pub use domain::quality::{Outcome, PolicyConfig, Verdict};
pub use error::{CancelReason, DqError};
