//! Multi-call flows: saving an editor draft and recording an execution.
//!
//! Both create parent rows first, then upload files that must reference the
//! ids the server just assigned. Files are matched to created rows through
//! each row's `order`, never through its position in the response, and the
//! whole batch is checked before anything is uploaded.

use std::collections::HashMap;

use kingyo_core::AttachmentFile;
use kingyo_core::entities::{
    TestCase, TestResult, TestResultStep, TestResultStepAttachment, TestStep, TestStepAttachment,
};
use kingyo_core::enums::{Browser, Os, Outcome, ResultStepStatus};
use kingyo_core::payloads::{NewTestResult, NewTestResultStep, TestCasePatch};
use kingyo_editor::{DraftSubmission, StepEditor, StepKey};

use crate::error::ClientError;
use crate::repos::attachments::AttachmentUpload;
use crate::service::Kingyo;

/// A saved draft: the case, its steps as created, and uploaded files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCase {
    pub case: TestCase,
    pub steps: Vec<TestStep>,
    pub attachments: Vec<TestStepAttachment>,
}

/// The recorded outcome of one definition step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: TestStep,
    pub status: ResultStepStatus,
    pub comment: String,
    pub evidence: Vec<AttachmentFile>,
}

impl StepOutcome {
    #[must_use]
    pub const fn new(step: TestStep, status: ResultStepStatus) -> Self {
        Self {
            step,
            status,
            comment: String::new(),
            evidence: Vec::new(),
        }
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[must_use]
    pub fn evidence(mut self, file: AttachmentFile) -> Self {
        self.evidence.push(file);
        self
    }
}

/// One run of a test case under a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub result: Outcome,
    pub browser: Browser,
    pub os: Os,
    pub steps: Vec<StepOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedExecution {
    pub result: TestResult,
    pub steps: Vec<TestResultStep>,
    pub attachments: Vec<TestResultStepAttachment>,
}

/// Map each pending file of `submission` to the id of its created step.
///
/// # Errors
///
/// `ClientError::Correlation` if a file's step key is not part of the
/// submission or no created step carries the submitted order.
pub fn correlate_draft_attachments(
    submission: &DraftSubmission,
    created: &[TestStep],
) -> Result<Vec<AttachmentUpload>, ClientError> {
    let order_by_key: HashMap<StepKey, u32> = submission
        .steps
        .iter()
        .map(|s| (s.key, s.step.order))
        .collect();
    let id_by_order: HashMap<u32, u64> = created.iter().map(|s| (s.order, s.id)).collect();

    submission
        .attachments
        .iter()
        .map(|pending| {
            let order = order_by_key.get(&pending.step_key).ok_or_else(|| {
                ClientError::Correlation(format!("{} is not part of the draft", pending.step_key))
            })?;
            let id = id_by_order.get(order).ok_or_else(|| {
                ClientError::Correlation(format!(
                    "no created step with order {order} for {}",
                    pending.step_key
                ))
            })?;
            Ok(AttachmentUpload::new(*id, pending.file.clone()))
        })
        .collect()
}

fn correlate_evidence(
    outcomes: &[(u32, &StepOutcome)],
    created: &[TestResultStep],
) -> Result<Vec<AttachmentUpload>, ClientError> {
    let id_by_order: HashMap<u32, u64> = created.iter().map(|s| (s.order, s.id)).collect();
    let mut uploads = Vec::new();
    for (order, outcome) in outcomes {
        if outcome.evidence.is_empty() {
            continue;
        }
        let id = id_by_order.get(order).ok_or_else(|| {
            ClientError::Correlation(format!("no recorded step with order {order}"))
        })?;
        uploads.extend(
            outcome
                .evidence
                .iter()
                .map(|file| AttachmentUpload::new(*id, file.clone())),
        );
    }
    Ok(uploads)
}

impl Kingyo {
    /// Create a case from `editor` in `plan`, then its steps, then upload
    /// the queued files against the created step ids.
    ///
    /// # Errors
    ///
    /// Fails at the first failing call. A `ClientError::Correlation` is
    /// raised before any upload.
    pub async fn save_case_draft(
        &self,
        plan: u64,
        editor: &StepEditor,
    ) -> Result<SavedCase, ClientError> {
        let submission = editor.to_submission();
        let case = self.create_test_case(plan, submission.case.clone()).await?;
        self.save_steps(plan, case, &submission).await
    }

    /// Write `editor` back over an existing case: patch its fields, replace
    /// its steps and upload newly queued files.
    ///
    /// # Errors
    ///
    /// As [`Self::save_case_draft`].
    pub async fn save_case_edits(
        &self,
        plan: u64,
        case: u64,
        editor: &StepEditor,
    ) -> Result<SavedCase, ClientError> {
        let submission = editor.to_submission();
        let patch = TestCasePatch::default()
            .title(editor.title())
            .description(editor.description())
            .status(editor.status());
        let case = self.update_test_case(plan, case, &patch).await?;
        self.save_steps(plan, case, &submission).await
    }

    async fn save_steps(
        &self,
        plan: u64,
        case: TestCase,
        submission: &DraftSubmission,
    ) -> Result<SavedCase, ClientError> {
        let steps = self
            .replace_test_steps(plan, case.id, &submission.step_payloads())
            .await?;
        let uploads = correlate_draft_attachments(submission, &steps)?;
        let attachments = self
            .upload_test_step_attachments(plan, case.id, uploads)
            .await?;
        tracing::info!(
            plan,
            case = case.id,
            steps = steps.len(),
            files = attachments.len(),
            "test case saved"
        );
        Ok(SavedCase {
            case,
            steps,
            attachments,
        })
    }

    /// Record an execution of `case` by the signed-in user: the result row,
    /// one snapshot row per step, then the evidence files.
    ///
    /// Steps are recorded in their definition order and renumbered from 1.
    ///
    /// # Errors
    ///
    /// Fails at the first failing call. A `ClientError::Correlation` is
    /// raised before any upload.
    pub async fn record_execution(
        &self,
        plan: u64,
        case: u64,
        execution: &Execution,
    ) -> Result<RecordedExecution, ClientError> {
        let tester = self.current_user().await?.id;
        let result = self
            .create_test_result(
                plan,
                &NewTestResult {
                    case,
                    tester,
                    result: execution.result,
                    browser: execution.browser,
                    os: execution.os,
                },
            )
            .await?;

        let mut ordered: Vec<&StepOutcome> = execution.steps.iter().collect();
        ordered.sort_by_key(|o| o.step.order);
        let numbered: Vec<(u32, &StepOutcome)> = (1..).zip(ordered).collect();

        let payloads: Vec<NewTestResultStep> = numbered
            .iter()
            .map(|(order, outcome)| NewTestResultStep {
                order: *order,
                step: Some(outcome.step.id),
                action: outcome.step.action.clone(),
                expected_result: outcome.step.expected_result.clone(),
                status: outcome.status,
                comment: outcome.comment.clone(),
            })
            .collect();
        let steps = self
            .create_test_result_steps(plan, case, result.id, &payloads)
            .await?;

        let uploads = correlate_evidence(&numbered, &steps)?;
        let attachments = self
            .upload_test_result_step_attachments(plan, case, result.id, uploads)
            .await?;
        tracing::info!(
            plan,
            case,
            result = result.id,
            outcome = %execution.result,
            "execution recorded"
        );
        Ok(RecordedExecution {
            result,
            steps,
            attachments,
        })
    }
}
