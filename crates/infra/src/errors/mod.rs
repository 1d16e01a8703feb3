//! Infrastructure-side error conversions.

mod conversions;

pub use conversions::{remote_error, InfraError};
