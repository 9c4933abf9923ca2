pub mod error;
pub mod quality;

// Handy re-exports to simplify imports elsewhere
pub use error::DomainError;
