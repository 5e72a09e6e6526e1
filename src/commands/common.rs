//! Pieces shared by the subcommands

use super::Host;
use clap::ValueEnum;
use std::io::Write;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above messages
    Debug,
    /// All messages including trace
    Trace,
}

impl LogLevel {
    /// Default `RUST_LOG` filter, or `None` when logging stays off
    const fn filter(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Error => Some("error"),
            Self::Warn => Some("warn"),
            Self::Info => Some("info"),
            Self::Debug => Some("debug"),
            Self::Trace => Some("trace"),
        }
    }
}

/// Initialize logger based on log level
///
/// `LogLevel::None` installs no logger at all, so `RUST_LOG` only takes effect once a level
/// has been chosen. It then overrides that level.
pub fn init_logging(log_level: LogLevel) {
    let Some(level) = log_level.filter() else {
        return;
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .init();
}

pub fn print_warnings<H: Host>(host: &mut H, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }

    let mut err = host.error();
    let _ = writeln!(err, "\n⚠️  Configuration validation warnings:");
    for warning in warnings {
        let _ = writeln!(err, "   {warning}");
    }
    let _ = writeln!(err);
}
