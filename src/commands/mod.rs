//! Command-line interface for usage-fields
//!
//! # Implementation Model
//!
//! The module is organized around four commands:
//!
//! - **fields**: List every registered field with its group and description
//! - **extract**: Resolve the configured columns for a file of readings
//! - **init**: Generate a default configuration file
//! - **validate**: Check a configuration file and report warnings
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. All output goes through a [`Host`], which lets tests
//! capture what a command prints and observe how it exits.

mod common;
mod extract;
mod fields;
mod host;
mod init;
mod run;
mod validate;

pub use common::LogLevel;
pub use extract::{ExtractArgs, extract_fields};
pub use fields::{FieldsArgs, list_fields};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use validate::{ValidateArgs, validate_config};

#[cfg(test)]
pub(crate) use host::TestHost;
