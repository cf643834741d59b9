//! Token Gateway Library
//!
//! Password login against a fixed user table, issuing signed bearer tokens
//! that resolve back to the user. Exposed for the binary and tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;

pub use api::create_router;
pub use config::{Config, ConfigError};
