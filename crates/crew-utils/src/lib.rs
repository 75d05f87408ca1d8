//! Configuration and logging shared by the crew crates

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError};
pub use logging::init_tracing;
