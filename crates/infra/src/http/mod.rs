//! Outbound HTTP plumbing shared by every integration.

pub mod client;
pub mod endpoint;

pub use client::{HttpClient, HttpClientBuilder};
pub use endpoint::service_url;
