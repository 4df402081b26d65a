use clap::Subcommand;

use crate::cli::subcommands::{
    AuthCommands, CaseCommands, PlanCommands, ResultCommands, StepCommands, UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Sign in, sign out and inspect the stored session.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Test plans.
    Plan {
        #[command(subcommand)]
        action: PlanCommands,
    },
    /// Test cases of a plan.
    Case {
        #[command(subcommand)]
        action: CaseCommands,
    },
    /// Steps of a test case and their attachments.
    Step {
        #[command(subcommand)]
        action: StepCommands,
    },
    /// Recorded executions.
    #[command(name = "result")]
    Results {
        #[command(subcommand)]
        action: ResultCommands,
    },
    /// Users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
}
