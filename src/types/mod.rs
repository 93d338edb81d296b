//! Data Types
//!
//! Wire and configuration types for the token cache.

pub mod config;
pub mod token;

pub use config::{B2cConfig, ClientCredentials, ScopeMatching, DEFAULT_TIMEOUT_SECS};
pub use token::TokenRecord;
