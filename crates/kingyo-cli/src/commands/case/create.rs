use anyhow::Context;
use kingyo_client::Kingyo;
use kingyo_core::AttachmentFile;
use kingyo_core::entities::{TestCase, TestStep, TestStepAttachment};
use kingyo_editor::StepEditor;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::case::CaseCreateArgs;
use crate::commands::shared::parse::{numbered_paths, step_text};
use crate::output::output;

#[derive(Serialize)]
struct CaseCreateResponse {
    case: TestCase,
    steps: Vec<TestStep>,
    attachments: Vec<TestStepAttachment>,
}

pub async fn handle(args: &CaseCreateArgs, client: &Kingyo, flags: &GlobalFlags) -> anyhow::Result<()> {
    let editor = build_editor(args)?;
    let saved = client
        .save_case_draft(args.plan, &editor)
        .await
        .context("case create")?;
    output(
        &CaseCreateResponse {
            case: saved.case,
            steps: saved.steps,
            attachments: saved.attachments,
        },
        flags.format,
    )
}

/// Drive a [`StepEditor`] the way an interactive form would: one row per
/// `--step`, then each `--attach` file queued on its row.
fn build_editor(args: &CaseCreateArgs) -> anyhow::Result<StepEditor> {
    let mut editor = StepEditor::new();
    editor.set_title(args.title.as_str());
    if let Some(description) = &args.description {
        editor.set_description(description.as_str());
    }
    if let Some(status) = args.status {
        editor.set_status(status);
    }

    for (index, raw) in args.steps.iter().enumerate() {
        if index > 0 {
            editor.insert_step(index - 1);
        }
        let (action, expected) = step_text(raw);
        editor.set_action(index, action);
        editor.set_expected_result(index, expected);
    }

    for (number, path) in numbered_paths(&args.attachments, "attach")? {
        let index = usize::try_from(number - 1)?;
        if index >= editor.len() {
            anyhow::bail!(
                "attach: step {number} does not exist (the case has {} steps)",
                editor.len()
            );
        }
        let file = AttachmentFile::from_path(&path)?;
        editor.open_file_upload_dialog(index);
        editor.upload_files(vec![file]);
    }

    tracing::debug!(
        steps = editor.len(),
        files = editor.pending_attachment_count(),
        "case draft built"
    );
    Ok(editor)
}
