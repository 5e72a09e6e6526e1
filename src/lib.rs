//! usage-fields crate
//!
//! Resolves the columns of a billing report from metered cloud usage readings. A report
//! column is named by a field, and each field is backed by a small resolver function that
//! looks at the report definition, the per-row item overrides, and the reading itself.
//!
//! # Module Organization
//!
//! - [`usage`]: The data a resolver reads: readings, their metadata, mappings, volume types
//! - [`fields`]: The field registry, the resolvers, and metadata normalization
//! - [`config`]: Report configuration loading and validation
//! - [`commands`]: The command-line front end
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use usage_fields::fields::FieldRegistry;
//! use usage_fields::usage::{Definition, Item, Metadata, Reading};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let stop = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
//! let metadata = Metadata::new().with("metadata", "[{'key': 'test', 'value': 'cinder'}]");
//! let reading = Reading::new("vol-1", "proj-1", start, stop, 1_i64, metadata).unwrap();
//!
//! let registry = FieldRegistry::default();
//! let value = registry
//!     .field_function("metadata:test", &Definition::new(), &Item::new(), &reading)
//!     .unwrap();
//! assert_eq!(value.map(|v| v.to_string()), Some("cinder".to_string()));
//! ```

/// Result type alias using `ohno::AppError` as the default error type.
pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod commands;

pub mod config;

pub mod fields;

pub mod usage;
