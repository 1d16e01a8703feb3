//! Shared helpers for commands

pub mod logging;
