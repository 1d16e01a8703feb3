//! Bearer token acquisition
//!
//! One token per run: acquire it once with [`TokenProvider::acquire`] and
//! hand the same [`AccessToken`](agentprobe_domain::AccessToken) to every
//! request of that run.

pub mod token_provider;

pub use token_provider::TokenProvider;
