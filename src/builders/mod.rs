//! Builders
//!
//! Fluent builders for configuration.

pub mod config;

pub use config::{b2c_config, B2cConfigBuilder};
