// dqgate-core/src/infrastructure/sinks/mod.rs

pub mod file;
pub mod logging;

pub use file::JsonFileSink;
pub use logging::TracingSink;
