use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::display::attachment_file_name;

/// A file attached to a persisted test step.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestStepAttachment {
    pub id: u64,
    pub step: u64,
    /// Storage URL of the uploaded file.
    pub file: String,
}

impl TestStepAttachment {
    #[must_use]
    pub fn file_name(&self) -> String {
        attachment_file_name(&self.file)
    }
}

/// Evidence attached to a test result step.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestResultStepAttachment {
    pub id: u64,
    pub result_step: u64,
    pub file: String,
}

impl TestResultStepAttachment {
    #[must_use]
    pub fn file_name(&self) -> String {
        attachment_file_name(&self.file)
    }
}
