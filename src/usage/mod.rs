//! Usage data consumed by the field resolvers
//!
//! Everything in here is produced by the metering pipeline upstream of this crate and is only
//! ever read by the resolvers. A [`Reading`] is one metered sample for one resource over one
//! time window, and carries the raw [`Metadata`] of the subsystem that produced it. Report
//! definitions and items are plain [`Mapping`]s.

mod field_value;
mod mapping;
mod metadata;
mod reading;
mod volume_types;

pub use field_value::FieldValue;
pub use mapping::{Definition, Item, Mapping};
pub use metadata::Metadata;
pub use reading::{Reading, isoformat};
pub use volume_types::{DEFAULT_VOLUME_TYPE_NAME, VolumeTypeCatalog, VolumeTypeNames};
