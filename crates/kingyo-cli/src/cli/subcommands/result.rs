use clap::{Args, Subcommand};
use kingyo_core::enums::{Browser, Configuration, Os, Outcome};

/// Test result commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ResultCommands {
    /// List one page of results across a plan.
    List {
        plan: u64,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Case title search.
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        result: Option<Outcome>,
        /// Tester user ID.
        #[arg(long)]
        tester: Option<u64>,
        /// e.g. "chrome on windows10".
        #[arg(long)]
        configuration: Option<Configuration>,
    },
    /// Get a result with its recorded steps.
    Get { plan: u64, case: u64, id: u64 },
    /// Execution history of one case.
    History {
        plan: u64,
        case: u64,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Record an execution of a case as the signed-in user.
    Record(ResultRecordArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ResultRecordArgs {
    pub plan: u64,
    pub case: u64,
    #[arg(long)]
    pub result: Outcome,
    #[arg(long)]
    pub browser: Browser,
    #[arg(long)]
    pub os: Os,
    /// Step outcome as `N=STATUS` or `N=STATUS:COMMENT`, N being the step
    /// order. Steps not named are recorded as in progress. Repeatable.
    #[arg(long = "step")]
    pub steps: Vec<String>,
    /// Evidence file as `N=PATH`. Repeatable.
    #[arg(long = "evidence")]
    pub evidence: Vec<String>,
}
