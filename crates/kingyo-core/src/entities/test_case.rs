use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Outcome, TestCaseStatus};

/// A definition of steps that verify one behavior, independent of any execution.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestCase {
    pub id: u64,
    /// Owning test plan.
    pub plan: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TestCaseStatus,
    /// Outcome of the most recent execution. Derived server-side.
    pub latest_result: Outcome,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub executed_at: Option<DateTime<Utc>>,
}
