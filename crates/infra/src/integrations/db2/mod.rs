//! SQL job service integration (Db2 REST API)
//!
//! Two adapters share one host:
//! - [`Db2IdentityService`] exchanges user id and password for a token at
//!   `/dbapi/v4/auth/tokens`
//! - [`Db2SqlJobService`] submits statements to `/dbapi/v4/sql_jobs` and polls
//!   `/dbapi/v4/sql_jobs/{id}`
//!
//! Every request carries `x-deployment-id` when a deployment is configured.

pub mod identity;
pub mod sql_jobs;
pub mod types;

pub use identity::Db2IdentityService;
pub use sql_jobs::Db2SqlJobService;
