//! Macro for implementing Display and FromStr for status enums
//!
//! Remote services report states as lowercase strings (`"running"`,
//! `"completed"`). This macro keeps the wire spelling next to the enum and
//! gives both directions of the conversion.
//!
//! # Example
//!
//! ```rust
//! use agentprobe_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ExportState {
//!     Queued,
//!     Done,
//! }
//!
//! impl_domain_status_conversions!(ExportState {
//!     Queued => "queued",
//!     Done => "done",
//! });
//!
//! assert_eq!(ExportState::Done.to_string(), "done");
//! assert_eq!("QUEUED".parse::<ExportState>(), Ok(ExportState::Queued));
//! ```

/// Implements Display and FromStr traits for status enums
///
/// This macro generates:
/// - Display trait: converts enum variants to their wire strings
/// - FromStr trait: parses case-insensitive strings to enum variants
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
