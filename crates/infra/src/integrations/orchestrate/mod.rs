//! Agent chat integration
//!
//! One synchronous chat-completions call per question:
//! `POST https://{api_host}/instances/{instance_id}/v1/orchestrate/{agent_id}/chat/completions`
//! with a single user message and streaming disabled. The raw response
//! envelope is returned; answer extraction happens in the batch runner.

pub mod client;
pub mod types;

pub use client::OrchestrateAgentService;
