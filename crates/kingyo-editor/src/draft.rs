use std::fmt;

use kingyo_core::AttachmentFile;
use kingyo_core::payloads::{NewTestCase, NewTestStep};
use serde::Serialize;

/// Client-side identity of a draft step, stable across reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StepKey(pub u64);

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDraft {
    pub key: StepKey,
    pub action: String,
    pub expected_result: String,
}

impl StepDraft {
    pub(crate) const fn blank(key: StepKey) -> Self {
        Self {
            key,
            action: String::new(),
            expected_result: String::new(),
        }
    }
}

/// Files queued for the step at the same index. `step` is that step's
/// 1-based number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentBucket {
    pub step: u32,
    pub files: Vec<AttachmentFile>,
}

impl AttachmentBucket {
    pub(crate) const fn empty(step: u32) -> Self {
        Self {
            step,
            files: Vec::new(),
        }
    }
}

/// A step payload tagged with the draft it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedStep {
    pub key: StepKey,
    pub step: NewTestStep,
}

/// A file waiting for its step to exist on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub step_key: StepKey,
    pub file: AttachmentFile,
}

/// Everything needed to persist the editor's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftSubmission {
    /// `plan` is left at 0 for the saving module to fill in.
    pub case: NewTestCase,
    pub steps: Vec<KeyedStep>,
    pub attachments: Vec<PendingAttachment>,
}

impl DraftSubmission {
    /// Bare step payloads in submission order.
    #[must_use]
    pub fn step_payloads(&self) -> Vec<NewTestStep> {
        self.steps.iter().map(|s| s.step.clone()).collect()
    }
}
