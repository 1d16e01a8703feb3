//! Per-item isolated batch pipeline
//!
//! Every input item yields exactly one [`ResultRecord`](agentprobe_domain::ResultRecord),
//! in input order. Only token acquisition, which happens before the batch,
//! can fail a whole run.

pub mod answer;
pub mod runner;

pub use answer::extract_answer;
pub use runner::BatchRunner;
