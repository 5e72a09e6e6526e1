use super::Host;
use super::common::print_warnings;
use crate::Result;
use crate::config::Config;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file [default: one of usage.[toml|yml|yaml|json] ]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    let workspace_root = Utf8PathBuf::from(".");
    let config_path = args.config.as_ref();

    match Config::load(&workspace_root, config_path) {
        Ok((_, warnings)) => {
            let _ = writeln!(host.output(), "Configuration file is valid");
            if let Some(path) = config_path {
                let _ = writeln!(host.output(), "Config file: {path}");
            } else {
                let _ = writeln!(host.output(), "Using default configuration (no config file found)");
            }

            print_warnings(host, &warnings);
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Configuration validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}
