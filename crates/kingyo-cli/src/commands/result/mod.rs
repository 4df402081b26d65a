mod record;

use anyhow::Context;
use kingyo_client::{Kingyo, TestResultFilters, TestResultListParams};
use kingyo_core::entities::{TestResult, TestResultStep, TestResultStepAttachment};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ResultCommands;
use crate::commands::shared::listing::print_page;
use crate::output::output;

#[derive(Serialize)]
struct ResultDetail {
    #[serde(flatten)]
    result: TestResult,
    steps: Vec<TestResultStep>,
    attachments: Vec<TestResultStepAttachment>,
}

/// Handle `kingyo result`.
pub async fn handle(action: &ResultCommands, client: &Kingyo, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ResultCommands::List {
            plan,
            page,
            title,
            result,
            tester,
            configuration,
        } => {
            let mut params = TestResultListParams::new().page(*page).filters(TestResultFilters {
                result: *result,
                tester: *tester,
                configuration: *configuration,
            });
            if let Some(title) = title {
                params = params.title(title.as_str());
            }
            print_page(*page, client.list_test_results(*plan, &params), flags).await
        }
        ResultCommands::Get { plan, case, id } => {
            let result = client
                .get_test_result(*plan, *case, *id)
                .await?
                .with_context(|| format!("no test result {id} for case {case} in plan {plan}"))?;
            let steps = client.list_test_result_steps(*plan, *case, *id).await?;
            let attachments = client
                .list_test_result_step_attachments(*plan, *case, *id)
                .await?;
            output(
                &ResultDetail {
                    result,
                    steps,
                    attachments,
                },
                flags.format,
            )
        }
        ResultCommands::History { plan, case, page } => {
            print_page(*page, client.list_case_results(*plan, *case, *page), flags).await
        }
        ResultCommands::Record(args) => record::handle(args, client, flags).await,
    }
}
