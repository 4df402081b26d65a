use anyhow::Context;
use kingyo_client::Kingyo;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StepCommands;
use crate::output::output;

#[derive(Serialize)]
struct Downloaded {
    id: u64,
    path: String,
    bytes: usize,
}

/// Handle `kingyo step`.
pub async fn handle(action: &StepCommands, client: &Kingyo, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        StepCommands::List { plan, case } => {
            let steps = client.list_test_steps(*plan, *case).await?;
            output(&steps, flags.format)
        }
        StepCommands::Attachments { plan, case } => {
            let attachments = client.list_test_step_attachments(*plan, *case).await?;
            output(&attachments, flags.format)
        }
        StepCommands::Download {
            plan,
            case,
            id,
            output: path,
        } => {
            let bytes = client
                .download_test_step_attachment(*plan, *case, *id)
                .await?;
            std::fs::write(path, &bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            output(
                &Downloaded {
                    id: *id,
                    path: path.display().to_string(),
                    bytes: bytes.len(),
                },
                flags.format,
            )
        }
    }
}
