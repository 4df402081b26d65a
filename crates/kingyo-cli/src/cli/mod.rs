use clap::{Parser, ValueEnum};

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `kingyo` binary.
#[derive(Debug, Parser)]
#[command(name = "kingyo", version, about = "Kingyo - test plans, cases and results")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw (defaults to `general.default_format`)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve global flags, falling back to the configured output format.
    ///
    /// # Errors
    ///
    /// Fails if `configured_format` is not a known output format.
    pub fn global_flags(&self, configured_format: &str) -> anyhow::Result<GlobalFlags> {
        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_str(configured_format, true)
                .map_err(|error| anyhow::anyhow!("invalid default format: {error}"))?,
        };
        Ok(GlobalFlags {
            format,
            quiet: self.quiet,
            verbose: self.verbose,
        })
    }
}
