//! Shared infrastructure for the change observer Lambda functions:
//! environment configuration, tracing setup, cold-start state and the
//! per-endpoint entry points every binary wraps.

pub mod config;
pub mod handlers;
pub mod request;
pub mod state;
mod tracing_init;

pub use config::{Config, ConfigError};
pub use state::AppState;
pub use tracing_init::init_tracing;
