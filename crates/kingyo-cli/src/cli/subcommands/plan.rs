use clap::Subcommand;
use kingyo_core::enums::TestPlanStatus;

/// Test plan commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PlanCommands {
    /// List one page of plans.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Title search.
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        status: Option<TestPlanStatus>,
    },
    /// Get a plan by ID.
    Get { id: u64 },
    /// Create a plan.
    Create {
        #[arg(long)]
        title: String,
    },
    /// Update a plan.
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TestPlanStatus>,
    },
    /// Delete a plan with its cases and results.
    Delete { id: u64 },
}
