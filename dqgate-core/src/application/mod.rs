// dqgate-core/src/application/mod.rs

pub mod aggregator;
pub mod control;
pub mod engine;
pub mod ports;
pub mod rules;

#[cfg(test)]
pub(crate) mod testing;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI write `use dqgate_core::application::{DqEngine, RunControl};`
// without knowing the file layout.

pub use aggregator::IssueAggregator;
pub use control::{CancellationToken, RunControl};
pub use engine::DqEngine;
pub use rules::{DetectionRule, IqrRule, ReferentialIntegrityRule, RuleContext, ZScoreRule};
