use std::collections::HashMap;

use anyhow::Context;
use kingyo_client::{Execution, Kingyo, StepOutcome};
use kingyo_core::AttachmentFile;
use kingyo_core::entities::{TestResult, TestResultStep, TestResultStepAttachment, TestStep};
use kingyo_core::enums::ResultStepStatus;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::result::ResultRecordArgs;
use crate::commands::shared::parse::{numbered, numbered_paths, status_with_comment};
use crate::output::output;

#[derive(Serialize)]
struct RecordResponse {
    result: TestResult,
    steps: Vec<TestResultStep>,
    attachments: Vec<TestResultStepAttachment>,
}

pub async fn handle(args: &ResultRecordArgs, client: &Kingyo, flags: &GlobalFlags) -> anyhow::Result<()> {
    let definition = client.list_test_steps(args.plan, args.case).await?;
    let evidence = numbered_paths(&args.evidence, "evidence")?
        .into_iter()
        .map(|(order, path)| AttachmentFile::from_path(&path).map(|file| (order, file)))
        .collect::<Result<Vec<_>, _>>()?;
    let execution = build_execution(args, &definition, evidence)?;

    let recorded = client
        .record_execution(args.plan, args.case, &execution)
        .await
        .context("result record")?;
    output(
        &RecordResponse {
            result: recorded.result,
            steps: recorded.steps,
            attachments: recorded.attachments,
        },
        flags.format,
    )
}

/// One outcome per definition step. Steps without a `--step` argument are
/// recorded as in progress.
fn build_execution(
    args: &ResultRecordArgs,
    definition: &[TestStep],
    evidence: Vec<(u32, AttachmentFile)>,
) -> anyhow::Result<Execution> {
    let known = |order: u32, field: &str| {
        if definition.iter().any(|s| s.order == order) {
            Ok(())
        } else {
            Err(anyhow::anyhow!("{field}: case {} has no step {order}", args.case))
        }
    };

    let mut marks: HashMap<u32, (ResultStepStatus, String)> = HashMap::new();
    for raw in &args.steps {
        let (order, value) = numbered(raw, "step")?;
        known(order, "step")?;
        marks.insert(order, status_with_comment(value, "step")?);
    }

    let mut files: HashMap<u32, Vec<AttachmentFile>> = HashMap::new();
    for (order, file) in evidence {
        known(order, "evidence")?;
        files.entry(order).or_default().push(file);
    }

    let steps = definition
        .iter()
        .map(|step| {
            let (status, comment) = marks
                .remove(&step.order)
                .unwrap_or((ResultStepStatus::InProgress, String::new()));
            let mut outcome = StepOutcome::new(step.clone(), status).comment(comment);
            for file in files.remove(&step.order).unwrap_or_default() {
                outcome = outcome.evidence(file);
            }
            outcome
        })
        .collect();

    Ok(Execution {
        result: args.result,
        browser: args.browser,
        os: args.os,
        steps,
    })
}
