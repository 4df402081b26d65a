//! # kingyo-editor
//!
//! Editing state for a test case's steps before they are saved.
//!
//! Steps and their pending attachment buckets are kept index-parallel: bucket
//! `i` belongs to step `i` and carries the 1-based step number `i + 1`. Every
//! structural edit renumbers the buckets it moves. Each draft step also has a
//! [`StepKey`] that survives reordering, so attachments can be matched to the
//! steps the server creates without relying on positions.

mod draft;
mod editor;

pub use draft::{AttachmentBucket, DraftSubmission, KeyedStep, PendingAttachment, StepDraft, StepKey};
pub use editor::{FocusDestination, FocusRequest, StepEditor, StepField};
