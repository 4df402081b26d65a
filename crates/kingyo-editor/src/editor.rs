use kingyo_core::AttachmentFile;
use kingyo_core::entities::{TestCase, TestStep};
use kingyo_core::enums::TestCaseStatus;
use kingyo_core::payloads::{NewTestCase, NewTestStep};

use crate::draft::{
    AttachmentBucket, DraftSubmission, KeyedStep, PendingAttachment, StepDraft, StepKey,
};

const DEFAULT_TITLE: &str = "New Test Case";

/// Editable field of a step row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepField {
    Action,
    ExpectedResult,
}

/// Where the host should move keyboard focus after a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRequest {
    pub step_index: usize,
    pub field: StepField,
}

/// Where focus went when it left a step row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDestination {
    /// Focus left the document or went to no element.
    Nowhere,
    /// Another element of the same row.
    WithinRow,
    /// Anything outside the row.
    OutsideRow,
}

fn step_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// Editing state for one test case and its steps.
///
/// Structural operations return `false` when they refuse (out-of-range index,
/// boundary move, deleting the last step) and leave the state untouched.
#[derive(Debug, Clone)]
pub struct StepEditor {
    title: String,
    description: String,
    status: TestCaseStatus,
    steps: Vec<StepDraft>,
    buckets: Vec<AttachmentBucket>,
    selected: Option<usize>,
    upload_dialog_open: bool,
    next_key: u64,
}

impl Default for StepEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl StepEditor {
    /// A new case: default title, `design` status, one blank step.
    #[must_use]
    pub fn new() -> Self {
        let mut editor = Self {
            title: DEFAULT_TITLE.to_string(),
            description: String::new(),
            status: TestCaseStatus::Design,
            steps: Vec::new(),
            buckets: Vec::new(),
            selected: None,
            upload_dialog_open: false,
            next_key: 0,
        };
        let key = editor.allocate_key();
        editor.steps.push(StepDraft::blank(key));
        editor.buckets.push(AttachmentBucket::empty(1));
        editor
    }

    /// Editor for an existing case. Steps are ordered by their `order`; a
    /// case without steps starts with one blank step.
    #[must_use]
    pub fn from_existing(case: &TestCase, steps: &[TestStep]) -> Self {
        let mut editor = Self::new();
        editor.title.clone_from(&case.title);
        editor.description.clone_from(&case.description);
        editor.status = case.status;

        if steps.is_empty() {
            return editor;
        }

        let mut ordered: Vec<&TestStep> = steps.iter().collect();
        ordered.sort_by_key(|s| s.order);
        editor.steps.clear();
        editor.buckets.clear();
        for (index, step) in ordered.into_iter().enumerate() {
            let key = editor.allocate_key();
            editor.steps.push(StepDraft {
                key,
                action: step.action.clone(),
                expected_result: step.expected_result.clone(),
            });
            editor.buckets.push(AttachmentBucket::empty(step_number(index)));
        }
        editor
    }

    fn allocate_key(&mut self) -> StepKey {
        self.next_key += 1;
        StepKey(self.next_key)
    }

    fn renumber_from(&mut self, start: usize) {
        for (index, bucket) in self.buckets.iter_mut().enumerate().skip(start) {
            bucket.step = step_number(index);
        }
    }

    // --- Case fields ---

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    #[must_use]
    pub const fn status(&self) -> TestCaseStatus {
        self.status
    }

    pub const fn set_status(&mut self, status: TestCaseStatus) {
        self.status = status;
    }

    // --- Read access ---

    #[must_use]
    pub fn steps(&self) -> &[StepDraft] {
        &self.steps
    }

    #[must_use]
    pub fn buckets(&self) -> &[AttachmentBucket] {
        &self.buckets
    }

    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub const fn is_upload_dialog_open(&self) -> bool {
        self.upload_dialog_open
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; an editor holds at least one step.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps and buckets are parallel, numbered `1..=N`, and non-empty.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        !self.steps.is_empty()
            && self.steps.len() == self.buckets.len()
            && self
                .buckets
                .iter()
                .enumerate()
                .all(|(i, b)| b.step == step_number(i))
            && self.selected.is_none_or(|s| s < self.steps.len())
    }

    // --- Step text ---

    pub fn set_action(&mut self, index: usize, action: impl Into<String>) -> bool {
        self.steps
            .get_mut(index)
            .map(|step| step.action = action.into())
            .is_some()
    }

    pub fn set_expected_result(&mut self, index: usize, expected: impl Into<String>) -> bool {
        self.steps
            .get_mut(index)
            .map(|step| step.expected_result = expected.into())
            .is_some()
    }

    // --- Selection and focus ---

    /// Select a step; the host should focus the returned field.
    pub fn select_step(&mut self, index: usize) -> Option<FocusRequest> {
        if index >= self.steps.len() {
            return None;
        }
        self.selected = Some(index);
        Some(FocusRequest {
            step_index: index,
            field: StepField::Action,
        })
    }

    /// Focus left the selected row. Selection is cleared when focus went
    /// nowhere, or outside the row while no upload dialog is open.
    pub fn focus_out(&mut self, destination: FocusDestination) {
        let clear = match destination {
            FocusDestination::Nowhere => true,
            FocusDestination::OutsideRow => !self.upload_dialog_open,
            FocusDestination::WithinRow => false,
        };
        if clear {
            self.selected = None;
        }
    }

    // --- Structure ---

    /// Insert a blank step after `at`, with an empty bucket at the same
    /// position. A selected step below the insertion point stays selected.
    pub fn insert_step(&mut self, at: usize) -> bool {
        if at >= self.steps.len() {
            return false;
        }
        let position = at + 1;
        let key = self.allocate_key();
        self.steps.insert(position, StepDraft::blank(key));
        self.buckets
            .insert(position, AttachmentBucket::empty(step_number(position)));
        self.renumber_from(position + 1);
        if let Some(selected) = self.selected {
            if selected >= position {
                self.selected = Some(selected + 1);
            }
        }
        true
    }

    pub fn move_step_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.steps.len() {
            return false;
        }
        self.swap_with_next(index - 1);
        true
    }

    pub fn move_step_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.steps.len() {
            return false;
        }
        self.swap_with_next(index);
        true
    }

    /// Swap rows `upper` and `upper + 1`, renumber both buckets and keep the
    /// selection on the step it was on.
    fn swap_with_next(&mut self, upper: usize) {
        let lower = upper + 1;
        self.steps.swap(upper, lower);
        self.buckets.swap(upper, lower);
        self.buckets[upper].step = step_number(upper);
        self.buckets[lower].step = step_number(lower);
        self.selected = match self.selected {
            Some(s) if s == upper => Some(lower),
            Some(s) if s == lower => Some(upper),
            other => other,
        };
    }

    /// Remove a step and its bucket. Refused when only one step remains.
    pub fn delete_step(&mut self, index: usize) -> bool {
        if self.steps.len() <= 1 {
            tracing::debug!(index, "refusing to delete the last remaining step");
            return false;
        }
        if index >= self.steps.len() {
            return false;
        }
        self.steps.remove(index);
        self.buckets.remove(index);
        self.renumber_from(index);
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        true
    }

    // --- Attachments ---

    /// Select `index` and open the upload dialog for it.
    pub fn open_file_upload_dialog(&mut self, index: usize) -> bool {
        if index >= self.steps.len() {
            return false;
        }
        self.selected = Some(index);
        self.upload_dialog_open = true;
        true
    }

    pub const fn close_file_upload_dialog(&mut self) {
        self.upload_dialog_open = false;
    }

    /// Append `files` to the selected step's bucket. Without a selection the
    /// files are dropped. Selection is cleared and the dialog closed either
    /// way. Returns whether the files were queued.
    pub fn upload_files(&mut self, files: Vec<AttachmentFile>) -> bool {
        let queued = self.selected.is_some_and(|selected| {
            let step = step_number(selected);
            self.buckets
                .iter_mut()
                .find(|b| b.step == step)
                .map(|bucket| bucket.files.extend(files))
                .is_some()
        });
        self.selected = None;
        self.upload_dialog_open = false;
        queued
    }

    /// Remove one queued file by position.
    pub fn remove_attachment(
        &mut self,
        step_index: usize,
        attachment_index: usize,
    ) -> Option<AttachmentFile> {
        let bucket = self.buckets.get_mut(step_index)?;
        (attachment_index < bucket.files.len()).then(|| bucket.files.remove(attachment_index))
    }

    /// Number of files queued across all steps.
    #[must_use]
    pub fn pending_attachment_count(&self) -> usize {
        self.buckets.iter().map(|b| b.files.len()).sum()
    }

    // --- Output ---

    /// Payloads for saving: the case (plan left at 0), steps numbered by
    /// position, and every queued file tagged with its step's key.
    #[must_use]
    pub fn to_submission(&self) -> DraftSubmission {
        let mut case = NewTestCase::new(self.title.clone()).status(self.status);
        if !self.description.is_empty() {
            case = case.description(self.description.clone());
        }

        let steps = self
            .steps
            .iter()
            .enumerate()
            .map(|(index, draft)| KeyedStep {
                key: draft.key,
                step: NewTestStep {
                    order: step_number(index),
                    action: draft.action.clone(),
                    expected_result: draft.expected_result.clone(),
                },
            })
            .collect();

        let attachments = self
            .steps
            .iter()
            .zip(&self.buckets)
            .flat_map(|(draft, bucket)| {
                bucket.files.iter().map(|file| PendingAttachment {
                    step_key: draft.key,
                    file: file.clone(),
                })
            })
            .collect();

        DraftSubmission {
            case,
            steps,
            attachments,
        }
    }
}
