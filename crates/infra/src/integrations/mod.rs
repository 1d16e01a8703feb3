//! External service integrations

pub mod db2;
pub mod iam;
pub mod orchestrate;

pub use db2::{Db2IdentityService, Db2SqlJobService};
pub use iam::IamIdentityService;
pub use orchestrate::OrchestrateAgentService;
