use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures raised while registering or resolving fields
///
/// Only [`FieldError::UnknownField`] and [`FieldError::DuplicateField`] ever reach a caller
/// of the registry. Everything else is produced by an individual resolver and is downgraded
/// to an absent value at the registry boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("unknown field function '{name}'")]
    UnknownField { name: String },

    #[error("field '{name}' is registered more than once")]
    DuplicateField { name: &'static str },

    #[error("{what} is not a number: '{value}'")]
    InvalidNumber { what: &'static str, value: String },

    #[error("invalid cost format '{format}': {reason}")]
    InvalidCostFormat { format: String, reason: String },

    #[error("reading window ends at {stop} before it starts at {start}")]
    InvalidTimeRange { start: DateTime<Utc>, stop: DateTime<Utc> },
}
