//! # agentprobe core
//!
//! Pure orchestration logic - no HTTP code.
//!
//! This crate contains:
//! - Port interfaces (traits) for the identity, SQL job and agent services
//! - `TokenProvider`, `JobPoller` and `BatchRunner`
//! - The CSV codec and result exporter
//! - Function handlers that turn a request into a `{statusCode, headers, body}` response
//!
//! ## Architecture Principles
//! - Only depends on `agentprobe-domain`
//! - All remote services reached through the traits in [`ports`]
//! - Every remote call is awaited before the next one starts unless a caller
//!   opts into bounded batch concurrency

pub mod auth;
pub mod batch;
pub mod csv_codec;
pub mod export;
pub mod functions;
pub mod jobs;
pub mod logbook;
pub mod ports;

// Re-export specific items to avoid ambiguity
pub use auth::TokenProvider;
pub use batch::{extract_answer, BatchRunner};
pub use csv_codec::{CsvCodec, CsvRecord, CsvTable, QuestionSelection, QuotePolicy};
pub use export::{ExportArtifact, ResultExporter};
pub use functions::{
    BatchFunction, LogExportFunction, RecordInteractionFunction, RecordedInteraction,
};
pub use jobs::{Accumulator, JobPoller, PollObserver, PollProgress};
pub use logbook::{insert_sql, select_recent_sql};
pub use ports::{AgentService, AgentTarget, IdentityService, SqlJobService};
