use clap::{Args, Subcommand};
use kingyo_core::enums::{Outcome, TestCaseStatus};

/// Test case commands. Every case lives in a plan.
#[derive(Clone, Debug, Subcommand)]
pub enum CaseCommands {
    /// List one page of cases in a plan.
    List {
        plan: u64,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        status: Option<TestCaseStatus>,
        #[arg(long)]
        latest_result: Option<Outcome>,
    },
    /// Get a case by ID.
    Get { plan: u64, id: u64 },
    /// Create a case with its steps and step attachments.
    Create(CaseCreateArgs),
    /// Update a case's title, description or status.
    Update {
        plan: u64,
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TestCaseStatus>,
    },
    /// Delete a case with its steps and results.
    Delete { plan: u64, id: u64 },
}

#[derive(Clone, Debug, Args)]
pub struct CaseCreateArgs {
    pub plan: u64,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<TestCaseStatus>,
    /// Step as `ACTION` or `ACTION::EXPECTED`, in order. Repeatable.
    #[arg(long = "step")]
    pub steps: Vec<String>,
    /// File for a step as `N=PATH`, N counting from 1. Repeatable.
    #[arg(long = "attach")]
    pub attachments: Vec<String>,
}
