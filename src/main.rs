//! Command-line front end for the usage-fields crate.
//!
//! # Overview
//!
//! `usage-fields` resolves the columns of a billing report for a batch of metered usage
//! readings. The columns, the report definition and the per-meter items come from a
//! configuration file; the readings come from a JSON file.
//!
//! # Quick Start
//!
//! Generate a configuration file, then resolve the configured columns for some readings:
//!
//! ```bash
//! usage-fields init usage.yml
//! usage-fields extract --readings readings.json --meter instance
//! ```
//!
//! # Commands
//!
//! - `fields` lists every field a column can name
//! - `extract` prints `column: value` lines for each reading, absent values are left empty
//! - `init [PATH]` writes the default configuration (YAML, TOML or JSON by extension)
//! - `validate` loads a configuration file and reports problems
//!
//! When `--config` is not given, the current directory is searched for `usage.toml`,
//! `usage.yml`, `usage.yaml` and `usage.json`, in that order. Without any of them the
//! built-in default configuration is used.
//!
//! # Readings
//!
//! ```json
//! [
//!   {
//!     "resource_id": "5c1d...",
//!     "project_id": "a3f0...",
//!     "start": "2024-01-01T00:00:00Z",
//!     "stop": "2024-01-01T01:00:00Z",
//!     "value": 1,
//!     "metadata": { "display_name": "web-1", "metadata.owner": "finance" }
//!   }
//! ]
//! ```
//!
//! # Logging
//!
//! Diagnostics are off by default. `--log-level warn` reports fields that failed to resolve.
//! Once a level is given, `RUST_LOG` overrides it when set.

use std::io::{Write, stderr, stdout};
use usage_fields::commands::{Host, run};

/// Host backed by the real process streams.
#[derive(Debug, Clone, Default)]
struct RealHost;

impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args())
}
