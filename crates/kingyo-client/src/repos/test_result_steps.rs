//! Recorded step outcomes of one test result.

use kingyo_core::entities::TestResultStep;
use kingyo_core::payloads::{NewTestResultStep, TestResultStepPatch};

use crate::error::ClientError;
use crate::keys;
use crate::service::Kingyo;

fn list_path(plan: u64, case: u64, result: u64) -> String {
    format!("testplans/{plan}/testcases/{case}/testresults/{result}/testresultsteps/")
}

impl Kingyo {
    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn list_test_result_steps(
        &self,
        plan: u64,
        case: u64,
        result: u64,
    ) -> Result<Vec<TestResultStep>, ClientError> {
        if plan == 0 || case == 0 || result == 0 {
            return Ok(Vec::new());
        }
        let mut steps: Vec<TestResultStep> = self
            .cached_get(
                &keys::test_result_steps(plan, case, result),
                &list_path(plan, case, result),
            )
            .await?;
        steps.sort_by_key(|s| s.order);
        Ok(steps)
    }

    /// Record every step of an execution in one call.
    ///
    /// # Errors
    ///
    /// Propagates transport failures.
    pub async fn create_test_result_steps(
        &self,
        plan: u64,
        case: u64,
        result: u64,
        steps: &[NewTestResultStep],
    ) -> Result<Vec<TestResultStep>, ClientError> {
        let created: Vec<TestResultStep> = self
            .post_json(&list_path(plan, case, result), steps)
            .await?;
        self.invalidate_entry(keys::test_result_steps(plan, case, result));
        Ok(created)
    }

    /// Regrade or annotate one recorded step. The returned row replaces its
    /// copy in the cached list.
    ///
    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn update_test_result_step(
        &self,
        plan: u64,
        case: u64,
        result: u64,
        id: u64,
        patch: &TestResultStepPatch,
    ) -> Result<TestResultStep, ClientError> {
        let path = format!("{}{id}/", list_path(plan, case, result));
        let updated: TestResultStep = self.patch_json(&path, patch).await?;
        self.cache().update(
            &keys::test_result_steps(plan, case, result),
            |steps: Option<Vec<TestResultStep>>| {
                let mut steps = steps?;
                let row = steps.iter_mut().find(|s| s.id == updated.id)?;
                row.clone_from(&updated);
                Some(steps)
            },
        )?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{result_step_json, test_client};
    use kingyo_core::enums::ResultStepStatus;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn update_replaces_the_cached_row_in_place() {
        let (client, backend) = test_client();
        backend.push_json(
            200,
            &json!([result_step_json(40, 90, 1, "pass"), result_step_json(40, 91, 2, "in_progress")]),
        );
        client.list_test_result_steps(3, 7, 40).await.unwrap();

        let mut patched = result_step_json(40, 91, 2, "fail");
        patched["comment"] = json!("button missing");
        backend.push_json(200, &patched);

        let patch = TestResultStepPatch {
            status: Some(ResultStepStatus::Fail),
            comment: Some("button missing".into()),
        };
        client
            .update_test_result_step(3, 7, 40, 91, &patch)
            .await
            .unwrap();

        let steps = client.list_test_result_steps(3, 7, 40).await.unwrap();
        assert_eq!(backend.request_count(), 2);
        assert_eq!(steps[0].status, ResultStepStatus::Pass);
        assert_eq!(steps[1].status, ResultStepStatus::Fail);
        assert_eq!(steps[1].comment, "button missing");
        assert_eq!(
            backend.request_lines()[1],
            "PATCH http://localhost:8000/api/v1/testplans/3/testcases/7/testresults/40/testresultsteps/91/"
        );
    }

    #[tokio::test]
    async fn update_without_a_cached_list_writes_nothing() {
        let (client, backend) = test_client();
        backend.push_json(200, &result_step_json(40, 91, 2, "skip"));

        let patch = TestResultStepPatch {
            status: Some(ResultStepStatus::Skip),
            comment: None,
        };
        client
            .update_test_result_step(3, 7, 40, 91, &patch)
            .await
            .unwrap();

        assert!(client.cache().is_empty());
    }
}
