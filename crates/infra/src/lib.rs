//! # agentprobe Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client plumbing (`reqwest`)
//! - Identity adapters (cloud IAM API key, Db2 user/password)
//! - The Db2 SQL job adapter and the agent chat adapter
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Implements traits defined in `agentprobe-core`
//! - Contains all "impure" code (network, environment, files)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::*;
pub use observability::{init_logging, LogFormat};
