//! Command dispatch logic for usage-fields

use super::common::{LogLevel, init_logging};
use super::{ExtractArgs, FieldsArgs, Host, InitArgs, ValidateArgs, extract_fields, init_config, list_fields, validate_config};
use crate::Result;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "usage-fields", version, author, long_about = None)]
#[command(about = "Extract billing report fields from cloud usage readings")]
#[command(styles = CLAP_STYLES)]
struct Args {
    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: UsageSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsageSubcommand {
    /// List the fields a report column can name
    Fields(FieldsArgs),
    /// Resolve the configured report columns for a file of readings
    Extract(ExtractArgs),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let args = Args::parse_from(args);
    init_logging(args.log_level);

    match &args.command {
        UsageSubcommand::Fields(fields_args) => list_fields(host, fields_args),
        UsageSubcommand::Extract(extract_args) => extract_fields(host, extract_args),
        UsageSubcommand::Init(init_args) => init_config(host, init_args),
        UsageSubcommand::Validate(validate_args) => validate_config(host, validate_args),
    }
}
