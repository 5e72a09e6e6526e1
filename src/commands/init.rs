use super::Host;
use crate::Result;
use crate::config::Config;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output configuration file path, the extension picks the format
    #[arg(value_name = "PATH", default_value = "usage.yml")]
    pub output: Utf8PathBuf,
}

pub fn init_config<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    Config::save_default(&args.output)?;
    let _ = writeln!(host.output(), "Generated default configuration file: {}", args.output);
    Ok(())
}
