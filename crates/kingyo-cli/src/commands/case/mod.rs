mod create;

use anyhow::Context;
use kingyo_client::{Kingyo, TestCaseFilters, TestCaseListParams};
use kingyo_core::payloads::TestCasePatch;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CaseCommands;
use crate::commands::shared::listing::print_page;
use crate::output::output;

#[derive(Serialize)]
struct Deleted {
    plan: u64,
    deleted: u64,
}

/// Handle `kingyo case`.
pub async fn handle(action: &CaseCommands, client: &Kingyo, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        CaseCommands::List {
            plan,
            page,
            title,
            status,
            latest_result,
        } => {
            let mut params = TestCaseListParams::new().page(*page).filters(TestCaseFilters {
                status: *status,
                latest_result: *latest_result,
            });
            if let Some(title) = title {
                params = params.title(title.as_str());
            }
            print_page(*page, client.list_test_cases(*plan, &params), flags).await
        }
        CaseCommands::Get { plan, id } => {
            let case = client
                .get_test_case(*plan, *id)
                .await?
                .with_context(|| format!("no test case {id} in plan {plan}"))?;
            output(&case, flags.format)
        }
        CaseCommands::Create(args) => create::handle(args, client, flags).await,
        CaseCommands::Update {
            plan,
            id,
            title,
            description,
            status,
        } => {
            let patch = TestCasePatch {
                title: title.clone(),
                description: description.clone(),
                status: *status,
            };
            if patch.is_empty() {
                anyhow::bail!("case update: nothing to change");
            }
            let case = client.update_test_case(*plan, *id, &patch).await?;
            output(&case, flags.format)
        }
        CaseCommands::Delete { plan, id } => {
            client.delete_test_case(*plan, *id).await?;
            output(
                &Deleted {
                    plan: *plan,
                    deleted: *id,
                },
                flags.format,
            )
        }
    }
}
