//! Domain types and models

pub mod batch;
pub mod function;
pub mod job;
pub mod logbook;
pub mod token;

pub use batch::{BatchItem, RecordStatus, ResultRecord};
pub use function::{BatchRequest, FunctionResponse};
pub use job::{
    JobCompletion, JobHandle, JobOutcome, JobSnapshot, JobStatus, ResultChunk, SqlJobRequest,
};
pub use logbook::InteractionLog;
pub use token::{AccessToken, Credential};
