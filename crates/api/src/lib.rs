//! # agentprobe application
//!
//! Command-line and HTTP entry points.
//!
//! This crate contains:
//! - The `agentprobe` CLI (clap)
//! - Application context (dependency injection)
//! - The axum server exposing the function boundary
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the infra adapters into the core functions

pub mod cli;
pub mod commands;
pub mod context;
pub mod server;
pub mod utils;

// Re-export for convenience
pub use cli::{run, Cli};
pub use context::AppContext;
