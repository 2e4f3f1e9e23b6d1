pub mod config;

pub use self::config::{load_config, DisplayConfig, FailurePolicy, ServiceConfig};
