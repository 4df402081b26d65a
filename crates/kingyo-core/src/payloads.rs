//! Create and partial-update payloads accepted by the server.
//!
//! Create payloads carry a `validate()` that checks the fields the server
//! requires before any request is issued. Patch payloads serialize only the
//! fields that are set, so a patch with one field touches one column.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Browser, Os, Outcome, ResultStepStatus, TestCaseStatus, TestPlanStatus};
use crate::errors::CoreError;

fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_id(field: &str, value: u64) -> Result<(), CoreError> {
    if value == 0 {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Test plans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewTestPlan {
    pub title: String,
}

impl NewTestPlan {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the title is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("title", &self.title)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestPlanPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TestPlanStatus>,
}

impl TestPlanPatch {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn status(mut self, status: TestPlanStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

// ---------------------------------------------------------------------------
// Test cases
// ---------------------------------------------------------------------------

/// Payload for creating a test case. `plan` is overwritten with the scope of
/// the query module that sends it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewTestCase {
    pub plan: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TestCaseStatus>,
}

impl NewTestCase {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            plan: 0,
            title: title.into(),
            description: None,
            status: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn status(mut self, status: TestCaseStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the plan id or title is missing.
    pub fn validate(&self) -> Result<(), CoreError> {
        require_id("plan", self.plan)?;
        require_text("title", &self.title)
    }
}

/// Partial update for a test case. `latest_result` is derived server-side
/// and deliberately not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestCasePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TestCaseStatus>,
}

impl TestCasePatch {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn status(mut self, status: TestCaseStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

// ---------------------------------------------------------------------------
// Test steps
// ---------------------------------------------------------------------------

/// One entry of a bulk step replacement.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewTestStep {
    pub order: u32,
    pub action: String,
    pub expected_result: String,
}

/// Check that a bulk step payload is ordered `1..=N` without gaps.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming the first out-of-place order.
pub fn validate_step_orders<'a, I>(orders: I) -> Result<(), CoreError>
where
    I: IntoIterator<Item = &'a u32>,
{
    for (index, order) in orders.into_iter().enumerate() {
        let expected = u32::try_from(index + 1).unwrap_or(u32::MAX);
        if *order != expected {
            return Err(CoreError::Validation(format!(
                "step order must be contiguous from 1: expected {expected}, found {order}"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Test results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewTestResult {
    pub case: u64,
    pub tester: u64,
    pub result: Outcome,
    pub browser: Browser,
    pub os: Os,
}

impl NewTestResult {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the case or tester id is missing.
    pub fn validate(&self) -> Result<(), CoreError> {
        require_id("case", self.case)?;
        require_id("tester", self.tester)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestResultPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TestResultPatch {
    #[must_use]
    pub const fn result(mut self, result: Outcome) -> Self {
        self.result = Some(result);
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// One entry of a bulk result-step creation: the definition snapshot plus the
/// recorded outcome.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewTestResultStep {
    pub order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u64>,
    pub action: String,
    pub expected_result: String,
    pub status: ResultStepStatus,
    #[serde(default)]
    pub comment: String,
}

/// Grading / annotation of a recorded step. The snapshot fields cannot be
/// expressed here, which keeps executed steps immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestResultStepPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ResultStepStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plan_patch_serializes_only_set_fields() {
        let patch = TestPlanPatch::default().status(TestPlanStatus::Completed);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"status": "completed"}));
        assert!(!patch.is_empty());
        assert!(TestPlanPatch::default().is_empty());
    }

    #[test]
    fn new_test_plan_rejects_blank_title() {
        let err = NewTestPlan::new("   ").validate().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: title is required");
    }

    #[test]
    fn new_test_case_requires_plan_scope() {
        let mut payload = NewTestCase::new("Login works");
        assert!(payload.validate().is_err());
        payload.plan = 3;
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn new_test_case_omits_unset_optionals() {
        let mut payload = NewTestCase::new("Checkout").status(TestCaseStatus::Ready);
        payload.plan = 9;
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"plan": 9, "title": "Checkout", "status": "ready"})
        );
    }

    #[test]
    fn step_orders_must_be_contiguous() {
        assert!(validate_step_orders(&[1, 2, 3]).is_ok());
        assert!(validate_step_orders(&[]).is_ok());
        let err = validate_step_orders(&[1, 3]).unwrap_err();
        assert!(err.to_string().contains("expected 2, found 3"));
    }

    #[test]
    fn new_test_result_requires_ids() {
        let payload = NewTestResult {
            case: 7,
            tester: 0,
            result: Outcome::Pass,
            browser: Browser::Firefox,
            os: Os::Linux,
        };
        assert!(payload.validate().unwrap_err().to_string().contains("tester"));
    }

    #[test]
    fn result_step_patch_has_no_snapshot_fields() {
        let patch = TestResultStepPatch {
            status: Some(ResultStepStatus::Fail),
            comment: Some("button missing".into()),
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "fail", "comment": "button missing"})
        );
    }
}
