use std::path::PathBuf;

use clap::Subcommand;

/// Step commands, scoped to one case.
#[derive(Clone, Debug, Subcommand)]
pub enum StepCommands {
    /// List the steps of a case in order.
    List { plan: u64, case: u64 },
    /// List the files attached to a case's steps.
    Attachments { plan: u64, case: u64 },
    /// Download one step attachment.
    Download {
        plan: u64,
        case: u64,
        id: u64,
        /// Destination file.
        #[arg(long, short = 'o')]
        output: PathBuf,
    },
}
