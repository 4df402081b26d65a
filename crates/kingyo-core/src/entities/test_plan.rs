use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TestPlanStatus;

/// A named collection of test cases with an overall status.
///
/// Deleting a plan cascades server-side to its test cases.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestPlan {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TestPlanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
