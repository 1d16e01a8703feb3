//! Configuration loading and management
//!
//! This module provides utilities for loading application configuration
//! from environment variables, a `.env` file and an optional config file.

pub mod loader;

// Re-export commonly used items
pub use loader::{apply_env_overrides, load, load_from_env, load_from_file, CONFIG_PATH_VAR};
