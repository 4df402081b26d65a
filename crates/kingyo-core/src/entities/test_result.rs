use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Browser, Configuration, Os, Outcome, ResultStepStatus};

/// One execution record of a test case.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestResult {
    pub id: u64,
    pub case: u64,
    pub tester: u64,
    pub result: Outcome,
    pub browser: Browser,
    pub os: Os,
    /// Server-derived `"{browser} on {os}"`.
    #[serde(default)]
    pub configuration: String,
    #[serde(default)]
    pub comment: String,
    pub executed_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TestResult {
    #[must_use]
    pub const fn configuration(&self) -> Configuration {
        Configuration::new(self.browser, self.os)
    }
}

/// Per-step outcome of one execution.
///
/// `order`, `action` and `expected_result` snapshot the definition step at
/// execution time and never change afterwards; only `status` and `comment`
/// are mutable (see `TestResultStepPatch`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestResultStep {
    pub id: u64,
    pub result: u64,
    /// Definition step this row snapshots, when known.
    #[serde(default)]
    pub step: Option<u64>,
    pub order: u32,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub expected_result: String,
    pub status: ResultStepStatus,
    #[serde(default)]
    pub comment: String,
}
