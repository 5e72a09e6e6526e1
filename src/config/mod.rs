//! Report configuration
//!
//! A configuration file describes one report: the ordered list of columns, the report
//! definition shared by every row, the per-meter items, and the volume type names used to
//! label block storage. Files may be TOML, YAML or JSON, picked by extension. When no file
//! is found the embedded `default_config.yml` is used.
//!
//! Loading never rejects a file for naming fields the registry does not know. Such
//! problems come back as warnings so that a report can still be produced for the columns
//! that do resolve.

mod report_config;

pub use report_config::{Config, DEFAULT_CONFIG_YAML};
