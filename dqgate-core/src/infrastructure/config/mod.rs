pub mod policy;

pub use policy::{load_policy_config, load_policy_config_with};
