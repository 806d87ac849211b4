//! Command-line configuration for the dump tool.
//!
//! Every option can also be supplied through a `DEXTERITY_DUMP_*`
//! environment variable; the dictionary path falls back to
//! `DEXTERITY_DICT`.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Dump tool configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dexterity-dump",
    about = "Print the header, block table and module table of a Dexterity dictionary",
    version
)]
pub struct DumpConfig {
    /// Path to a .dic or .cnk file
    #[arg(env = "DEXTERITY_DICT")]
    pub path: PathBuf,

    /// Number of leading blocks to print
    #[arg(long, env = "DEXTERITY_DUMP_BLOCKS", default_value_t = 3)]
    pub blocks: usize,

    /// Resolve and print every module name
    #[arg(long, env = "DEXTERITY_DUMP_NAMES")]
    pub names: bool,

    /// Emit the summary as JSON instead of text
    #[arg(long, env = "DEXTERITY_DUMP_JSON")]
    pub json: bool,

    /// Logging level (overridden by `RUST_LOG` when set)
    #[arg(
        short,
        long,
        value_enum,
        env = "DEXTERITY_DUMP_LOG",
        default_value = "warn"
    )]
    pub log_level: LogLevel,
}

/// Logging verbosity
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Everything, including per-record decoding
    Trace,
    /// Decode stages
    Debug,
    /// Summaries
    Info,
    /// Suspicious but accepted input
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    /// Filter directive understood by `EnvFilter`
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl DumpConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config =
            DumpConfig::try_parse_from(["dexterity-dump", "Dynamics.dic"]).expect("parse args");
        assert_eq!(config.path, PathBuf::from("Dynamics.dic"));
        assert_eq!(config.blocks, 3);
        assert!(!config.names);
        assert!(!config.json);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_level.directive(), "warn");
    }

    #[test]
    fn test_flags() {
        let config = DumpConfig::try_parse_from([
            "dexterity-dump",
            "--blocks",
            "10",
            "--names",
            "--json",
            "-l",
            "debug",
            "sample.cnk",
        ])
        .expect("parse args");
        assert_eq!(config.blocks, 10);
        assert!(config.names);
        assert!(config.json);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_level.directive(), "debug");
    }
}
