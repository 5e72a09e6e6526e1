use super::Host;
use super::common::print_warnings;
use crate::Result;
use crate::config::Config;
use crate::fields::FieldError;
use crate::usage::{Item, Reading};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ohno::{IntoAppError, bail};
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "   extract";

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Path to configuration file [default: one of usage.[toml|yml|yaml|json] ]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// JSON file holding an array of readings
    #[arg(long, short = 'r', value_name = "PATH")]
    pub readings: Utf8PathBuf,

    /// Meter the readings were taken from, used to pick the configured item
    #[arg(long, short = 'm', value_name = "NAME")]
    pub meter: Option<String>,
}

fn load_readings(path: &Utf8Path) -> Result<Vec<Reading>> {
    let text = fs::read_to_string(path).into_app_err_with(|| format!("reading usage readings from {path}"))?;
    let readings: Vec<Reading> = serde_json::from_str(&text).into_app_err_with(|| format!("parsing usage readings from {path}"))?;

    for reading in &readings {
        if reading.stop < reading.start {
            let e = FieldError::InvalidTimeRange {
                start: reading.start,
                stop: reading.stop,
            };
            bail!("reading of resource '{}' in {path}: {e}", reading.resource_id);
        }
    }

    Ok(readings)
}

pub fn extract_fields<H: Host>(host: &mut H, args: &ExtractArgs) -> Result<()> {
    let (config, warnings) = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    print_warnings(host, &warnings);

    let empty = Item::new();
    let item = match &args.meter {
        Some(meter) => match config.item_for_meter(meter) {
            Some(item) => item,
            None => bail!("no configured item prices meter '{meter}'"),
        },
        None => &empty,
    };

    let readings = load_readings(&args.readings)?;
    log::info!(target: LOG_TARGET, "Resolving {} column(s) for {} reading(s)", config.columns.len(), readings.len());

    let registry = config.registry();
    let mut out = host.output();
    for (index, reading) in readings.iter().enumerate() {
        let row = registry
            .row(&config.columns, &config.definition, item, reading)
            .into_app_err("resolving report columns")?;

        if index > 0 {
            let _ = writeln!(out);
        }

        for (column, value) in config.columns.iter().zip(row) {
            match value {
                Some(value) => {
                    let _ = writeln!(out, "{column}: {value}");
                }
                None => {
                    let _ = writeln!(out, "{column}:");
                }
            }
        }
    }

    Ok(())
}
