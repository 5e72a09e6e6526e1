//! Billing field extraction
//!
//! This module turns a usage [`Reading`](crate::usage::Reading), the report definition and the
//! per-row item into the named column values of a billing report.
//!
//! # Implementation Model
//!
//! Every built-in column is a [`FieldDef`] that pairs a name and description with a plain
//! resolver function. Definitions are statically registered per [`FieldGroup`] in `item.rs`,
//! `reading.rs` and `report.rs`, and collected into a [`FieldRegistry`] at startup. Besides the
//! fixed names the registry understands two open-ended families:
//! - `metadata:<name>` looks the name up in the reading's metadata, trying every convention
//!   the metering sources use (see [`metadata_field`])
//! - `image_metadata:<name>` does the same for `image_meta.<name>`
//!
//! Resolvers are pure. They report problems by returning a [`FieldError`], which the registry
//! logs and turns into an absent value so one bad cell never aborts a report. Asking for a
//! name the registry does not know is the one failure surfaced to the caller.

mod cost_format;
mod field_def;
mod field_error;
mod field_group;
mod item;
mod literal;
mod metadata_field;
mod reading;
mod registry;
mod report;

pub use cost_format::{CostFormat, CostFormatter, DEFAULT_COST_FORMAT};
pub use field_def::{FieldContext, FieldDef, Resolved};
pub use field_error::FieldError;
pub use field_group::FieldGroup;
pub use item::ITEM_FIELDS;
pub use literal::{Literal, parse as parse_literal};
pub use metadata_field::{MetadataKey, MetadataNamespace, image_metadata_field, metadata_field};
pub use reading::READING_FIELDS;
pub use registry::{FieldRegistry, STANDARD_GROUPS, field_function};
pub use report::REPORT_FIELDS;
