//! Test result repository: plan-wide list, per-case history and CRUD.
//!
//! A case's `latest_result` is derived from its results, so every result
//! mutation also invalidates the plan's test case lists and the case detail.

use kingyo_cache::KeyPart;
use kingyo_core::Page;
use kingyo_core::entities::TestResult;
use kingyo_core::enums::{Configuration, Outcome};
use kingyo_core::payloads::{NewTestResult, TestResultPatch};
use kingyo_http::QueryString;

use crate::error::ClientError;
use crate::keys;
use crate::list::{ListFilters, ListParams};
use crate::service::Kingyo;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestResultFilters {
    pub result: Option<Outcome>,
    /// User id of the tester.
    pub tester: Option<u64>,
    pub configuration: Option<Configuration>,
}

impl ListFilters for TestResultFilters {
    fn key_parts(&self) -> Vec<KeyPart> {
        vec![
            self.result.map(Outcome::as_str).into(),
            self.tester.into(),
            self.configuration.map(|c| c.to_string()).into(),
        ]
    }

    fn apply(&self, query: QueryString) -> QueryString {
        query
            .opt("result", self.result.map(Outcome::as_str))
            .opt("tester", self.tester)
            .opt("configuration", self.configuration)
    }
}

/// The title filter matches the owning case's title and is sent as `case`.
pub type TestResultListParams = ListParams<TestResultFilters>;

fn plan_list_path(plan: u64) -> String {
    format!("testplans/{plan}/testresults/")
}

fn case_list_path(plan: u64, case: u64) -> String {
    format!("testplans/{plan}/testcases/{case}/testresults/")
}

fn detail_path(plan: u64, case: u64, id: u64) -> String {
    format!("testplans/{plan}/testcases/{case}/testresults/{id}/")
}

impl Kingyo {
    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn list_test_results(
        &self,
        plan: u64,
        params: &TestResultListParams,
    ) -> Result<Page<TestResult>, ClientError> {
        let path = format!("{}{}", plan_list_path(plan), params.query("case").to_suffix());
        self.cached_get(&params.key(keys::test_results(plan)), &path).await
    }

    /// Execution history of one case, newest first as served.
    ///
    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn list_case_results(
        &self,
        plan: u64,
        case: u64,
        page: u32,
    ) -> Result<Page<TestResult>, ClientError> {
        let params = ListParams::<()>::new().page(page);
        let path = format!("{}{}", case_list_path(plan, case), params.query("case").to_suffix());
        self.cached_get(&params.key(keys::test_result_history(plan, case)), &path)
            .await
    }

    /// A single result, or `None` without any request when any id is 0.
    ///
    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn get_test_result(
        &self,
        plan: u64,
        case: u64,
        id: u64,
    ) -> Result<Option<TestResult>, ClientError> {
        if plan == 0 || case == 0 || id == 0 {
            return Ok(None);
        }
        self.cached_get(&keys::test_result(plan, case, id), &detail_path(plan, case, id))
            .await
            .map(Some)
    }

    /// # Errors
    ///
    /// `ClientError::Validation` for a missing case or tester id, otherwise
    /// transport failures.
    pub async fn create_test_result(
        &self,
        plan: u64,
        payload: &NewTestResult,
    ) -> Result<TestResult, ClientError> {
        payload.validate()?;
        let result: TestResult = self
            .post_json(&case_list_path(plan, payload.case), payload)
            .await?;
        tracing::debug!(plan, case = payload.case, result = result.id, "test result created");
        self.invalidate_after_result_change(plan, payload.case);
        Ok(result)
    }

    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn update_test_result(
        &self,
        plan: u64,
        case: u64,
        id: u64,
        patch: &TestResultPatch,
    ) -> Result<TestResult, ClientError> {
        let result: TestResult = self.patch_json(&detail_path(plan, case, id), patch).await?;
        self.invalidate_after_result_change(plan, case);
        self.cache().set(&keys::test_result(plan, case, id), &result)?;
        Ok(result)
    }

    /// # Errors
    ///
    /// Propagates transport failures.
    pub async fn delete_test_result(&self, plan: u64, case: u64, id: u64) -> Result<(), ClientError> {
        self.delete_path(&detail_path(plan, case, id)).await?;
        self.invalidate_after_result_change(plan, case);
        self.remove_entry(keys::test_result(plan, case, id));
        self.remove_entry(keys::test_result_steps(plan, case, id));
        self.remove_entry(keys::test_result_step_attachments(plan, case, id));
        Ok(())
    }

    fn invalidate_after_result_change(&self, plan: u64, case: u64) {
        self.invalidate_scope(keys::test_results(plan));
        self.invalidate_scope(keys::test_cases(plan));
        self.invalidate_entry(keys::test_case(plan, case));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{result_json, test_client};
    use kingyo_core::enums::{Browser, Os};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn filters_render_wire_values() {
        let params = TestResultListParams::new().title("Login").filters(TestResultFilters {
            result: Some(Outcome::Pass),
            tester: Some(2),
            configuration: Some(Configuration::new(Browser::Chrome, Os::Windows10)),
        });
        assert_eq!(
            params.query("case").to_suffix(),
            "?page=1&case=Login&result=pass&tester=2&configuration=chrome%20on%20windows10"
        );
        assert_eq!(
            params.key(keys::test_results(3)).to_string(),
            r#"["testresults", 3, 1, "Login", "pass", 2, "chrome on windows10"]"#
        );
    }

    #[tokio::test]
    async fn history_lives_under_the_plan_scope() {
        let (client, backend) = test_client();
        backend.push_json(200, &json!({"count": 1, "results": [result_json(7, 40, "pass")]}));

        client.list_case_results(3, 7, 1).await.unwrap();
        let key = ListParams::<()>::new().page(1).key(keys::test_result_history(3, 7));
        assert_eq!(key.to_string(), r#"["testresults", 3, "case", 7, 1, ""]"#);
        assert!(client.cache().contains(&key));
        assert_eq!(
            backend.request_lines(),
            vec!["GET http://localhost:8000/api/v1/testplans/3/testcases/7/testresults/?page=1"]
        );

        backend.push_status(204);
        client.delete_test_result(3, 7, 40).await.unwrap();
        assert_eq!(client.cache().is_stale(&key), Some(true));
    }

    #[tokio::test]
    async fn update_refreshes_the_case_detail() {
        let (client, backend) = test_client();
        client.cache().set(&keys::test_case(3, 7), &json!({})).unwrap();
        backend.push_json(200, &result_json(7, 40, "fail"));

        let patch = TestResultPatch::default().result(Outcome::Fail);
        let updated = client.update_test_result(3, 7, 40, &patch).await.unwrap();

        assert_eq!(updated.result, Outcome::Fail);
        assert_eq!(client.cache().is_stale(&keys::test_case(3, 7)), Some(true));
        assert_eq!(client.cache().is_stale(&keys::test_result(3, 7, 40)), Some(false));
    }

    #[tokio::test]
    async fn detail_is_disabled_without_every_id() {
        let (client, backend) = test_client();
        assert_eq!(client.get_test_result(3, 0, 40).await.unwrap(), None);
        assert_eq!(backend.request_count(), 0);
    }
}
