//! # agentprobe domain
//!
//! Business domain types for agentprobe.
//!
//! This crate contains:
//! - Credentials, tokens, SQL job snapshots and batch result records
//! - The error taxonomy and `Result` alias
//! - Configuration structures
//! - Wire-level constants shared by the adapters and exporters
//!
//! ## Architecture
//! - No dependencies on other agentprobe crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
