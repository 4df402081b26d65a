use anyhow::Context;
use kingyo_client::{Kingyo, TestPlanFilters, TestPlanListParams};
use kingyo_core::payloads::{NewTestPlan, TestPlanPatch};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PlanCommands;
use crate::commands::shared::listing::print_page;
use crate::output::output;

#[derive(Serialize)]
struct Deleted {
    deleted: u64,
}

/// Handle `kingyo plan`.
pub async fn handle(action: &PlanCommands, client: &Kingyo, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        PlanCommands::List {
            page,
            title,
            status,
        } => {
            let mut params = TestPlanListParams::new()
                .page(*page)
                .filters(TestPlanFilters { status: *status });
            if let Some(title) = title {
                params = params.title(title.as_str());
            }
            print_page(*page, client.list_test_plans(&params), flags).await
        }
        PlanCommands::Get { id } => {
            let plan = client
                .get_test_plan(*id)
                .await?
                .with_context(|| format!("no test plan with id {id}"))?;
            output(&plan, flags.format)
        }
        PlanCommands::Create { title } => {
            let plan = client.create_test_plan(&NewTestPlan::new(title.as_str())).await?;
            output(&plan, flags.format)
        }
        PlanCommands::Update {
            id,
            title,
            description,
            status,
        } => {
            let patch = TestPlanPatch {
                title: title.clone(),
                description: description.clone(),
                status: *status,
            };
            if patch.is_empty() {
                anyhow::bail!("plan update: nothing to change");
            }
            let plan = client.update_test_plan(*id, &patch).await?;
            output(&plan, flags.format)
        }
        PlanCommands::Delete { id } => {
            client.delete_test_plan(*id).await?;
            output(&Deleted { deleted: *id }, flags.format)
        }
    }
}
