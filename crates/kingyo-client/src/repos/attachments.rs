//! Step and result-step attachments: list, batch upload, download.
//!
//! Uploads carry every file of a batch in one multipart body with an indexed
//! field pair per file (`{i}_step` or `{i}_result_step`, and `{i}_file`). The
//! server accepts or rejects the batch as a whole.

use kingyo_core::AttachmentFile;
use kingyo_core::entities::{TestResultStepAttachment, TestStepAttachment};
use kingyo_http::{ApiRequest, FormPart};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::keys;
use crate::service::Kingyo;

/// One file to upload and the id of the row it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    pub owner: u64,
    pub file: AttachmentFile,
}

impl AttachmentUpload {
    #[must_use]
    pub const fn new(owner: u64, file: AttachmentFile) -> Self {
        Self { owner, file }
    }
}

/// Indexed multipart fields for a batch, `owner_field` naming the id field.
#[must_use]
pub fn attachment_form(owner_field: &str, uploads: Vec<AttachmentUpload>) -> Vec<FormPart> {
    uploads
        .into_iter()
        .enumerate()
        .flat_map(|(i, upload)| {
            [
                FormPart::text(format!("{i}_{owner_field}"), upload.owner),
                FormPart::file(format!("{i}_file"), upload.file),
            ]
        })
        .collect()
}

fn step_attachments_path(plan: u64, case: u64) -> String {
    format!("testplans/{plan}/testcases/{case}/teststepattachments/")
}

fn result_step_attachments_path(plan: u64, case: u64, result: u64) -> String {
    format!("testplans/{plan}/testcases/{case}/testresults/{result}/testresultstepattachments/")
}

impl Kingyo {
    async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        owner_field: &str,
        uploads: Vec<AttachmentUpload>,
    ) -> Result<Vec<T>, ClientError> {
        let count = uploads.len();
        let request = ApiRequest::post(self.url(path)).multipart(attachment_form(owner_field, uploads));
        let created: Vec<T> = self.transport().send_json(request).await?;
        tracing::debug!(path, files = count, "attachments uploaded");
        Ok(created)
    }

    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn list_test_step_attachments(
        &self,
        plan: u64,
        case: u64,
    ) -> Result<Vec<TestStepAttachment>, ClientError> {
        if plan == 0 || case == 0 {
            return Ok(Vec::new());
        }
        self.cached_get(
            &keys::test_step_attachments(plan, case),
            &step_attachments_path(plan, case),
        )
        .await
    }

    /// Upload files for definition steps. `owner` is the step id. An empty
    /// batch sends nothing.
    ///
    /// # Errors
    ///
    /// Propagates transport failures.
    pub async fn upload_test_step_attachments(
        &self,
        plan: u64,
        case: u64,
        uploads: Vec<AttachmentUpload>,
    ) -> Result<Vec<TestStepAttachment>, ClientError> {
        if uploads.is_empty() {
            return Ok(Vec::new());
        }
        let created = self
            .upload(&step_attachments_path(plan, case), "step", uploads)
            .await?;
        self.invalidate_entry(keys::test_step_attachments(plan, case));
        Ok(created)
    }

    /// Raw bytes of a stored step attachment.
    ///
    /// # Errors
    ///
    /// Propagates transport failures.
    pub async fn download_test_step_attachment(
        &self,
        plan: u64,
        case: u64,
        id: u64,
    ) -> Result<Vec<u8>, ClientError> {
        self.get_bytes(&format!("{}{id}/download/", step_attachments_path(plan, case)))
            .await
    }

    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn list_test_result_step_attachments(
        &self,
        plan: u64,
        case: u64,
        result: u64,
    ) -> Result<Vec<TestResultStepAttachment>, ClientError> {
        if plan == 0 || case == 0 || result == 0 {
            return Ok(Vec::new());
        }
        self.cached_get(
            &keys::test_result_step_attachments(plan, case, result),
            &result_step_attachments_path(plan, case, result),
        )
        .await
    }

    /// Upload evidence for recorded steps. `owner` is the result-step id.
    ///
    /// # Errors
    ///
    /// Propagates transport failures.
    pub async fn upload_test_result_step_attachments(
        &self,
        plan: u64,
        case: u64,
        result: u64,
        uploads: Vec<AttachmentUpload>,
    ) -> Result<Vec<TestResultStepAttachment>, ClientError> {
        if uploads.is_empty() {
            return Ok(Vec::new());
        }
        let created = self
            .upload(
                &result_step_attachments_path(plan, case, result),
                "result_step",
                uploads,
            )
            .await?;
        self.invalidate_entry(keys::test_result_step_attachments(plan, case, result));
        Ok(created)
    }

    /// # Errors
    ///
    /// Propagates transport failures.
    pub async fn download_test_result_step_attachment(
        &self,
        plan: u64,
        case: u64,
        result: u64,
        id: u64,
    ) -> Result<Vec<u8>, ClientError> {
        self.get_bytes(&format!(
            "{}{id}/download/",
            result_step_attachments_path(plan, case, result)
        ))
        .await
    }
}
