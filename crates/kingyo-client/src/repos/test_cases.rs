//! Test case repository, scoped to one plan.

use kingyo_cache::KeyPart;
use kingyo_core::Page;
use kingyo_core::entities::TestCase;
use kingyo_core::enums::{Outcome, TestCaseStatus};
use kingyo_core::payloads::{NewTestCase, TestCasePatch};
use kingyo_http::QueryString;

use crate::error::ClientError;
use crate::keys;
use crate::list::{ListFilters, ListParams};
use crate::service::Kingyo;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestCaseFilters {
    pub status: Option<TestCaseStatus>,
    pub latest_result: Option<Outcome>,
}

impl ListFilters for TestCaseFilters {
    fn key_parts(&self) -> Vec<KeyPart> {
        vec![
            self.status.map(TestCaseStatus::as_str).into(),
            self.latest_result.map(Outcome::as_str).into(),
        ]
    }

    fn apply(&self, query: QueryString) -> QueryString {
        query
            .opt("status", self.status.map(TestCaseStatus::as_str))
            .opt("latest_result", self.latest_result.map(Outcome::as_str))
    }
}

pub type TestCaseListParams = ListParams<TestCaseFilters>;

fn list_path(plan: u64) -> String {
    format!("testplans/{plan}/testcases/")
}

fn detail_path(plan: u64, id: u64) -> String {
    format!("testplans/{plan}/testcases/{id}/")
}

impl Kingyo {
    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn list_test_cases(
        &self,
        plan: u64,
        params: &TestCaseListParams,
    ) -> Result<Page<TestCase>, ClientError> {
        let path = format!("{}{}", list_path(plan), params.query("title").to_suffix());
        self.cached_get(&params.key(keys::test_cases(plan)), &path).await
    }

    /// A single case, or `None` without any request when either id is 0.
    ///
    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn get_test_case(&self, plan: u64, id: u64) -> Result<Option<TestCase>, ClientError> {
        if plan == 0 || id == 0 {
            return Ok(None);
        }
        self.cached_get(&keys::test_case(plan, id), &detail_path(plan, id))
            .await
            .map(Some)
    }

    /// Create a case in `plan`. The payload's `plan` is overwritten.
    ///
    /// # Errors
    ///
    /// `ClientError::Validation` for a blank title or a zero plan id,
    /// otherwise transport failures.
    pub async fn create_test_case(
        &self,
        plan: u64,
        payload: NewTestCase,
    ) -> Result<TestCase, ClientError> {
        let payload = NewTestCase { plan, ..payload };
        payload.validate()?;
        let case: TestCase = self.post_json(&list_path(plan), &payload).await?;
        tracing::debug!(plan, case = case.id, "test case created");
        self.invalidate_scope(keys::test_cases(plan));
        Ok(case)
    }

    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn update_test_case(
        &self,
        plan: u64,
        id: u64,
        patch: &TestCasePatch,
    ) -> Result<TestCase, ClientError> {
        let case: TestCase = self.patch_json(&detail_path(plan, id), patch).await?;
        self.invalidate_scope(keys::test_cases(plan));
        self.cache().set(&keys::test_case(plan, id), &case)?;
        Ok(case)
    }

    /// Delete a case. Its steps, attachments and results go with it on the
    /// server, so their cached entries are dropped and the plan's result
    /// lists refetch.
    ///
    /// # Errors
    ///
    /// Propagates transport failures.
    pub async fn delete_test_case(&self, plan: u64, id: u64) -> Result<(), ClientError> {
        self.delete_path(&detail_path(plan, id)).await?;
        self.invalidate_scope(keys::test_cases(plan));
        self.remove_entry(keys::test_case(plan, id));
        for scope in keys::case_scopes(plan, id) {
            self.remove_scope(scope);
        }
        self.invalidate_scope(keys::test_results(plan));
        tracing::debug!(plan, case = id, "test case deleted");
        Ok(())
    }
}
