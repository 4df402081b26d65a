//! Test plan repository: paginated list, detail, create / update / delete.

use kingyo_cache::KeyPart;
use kingyo_core::Page;
use kingyo_core::entities::TestPlan;
use kingyo_core::enums::TestPlanStatus;
use kingyo_core::payloads::{NewTestPlan, TestPlanPatch};
use kingyo_http::QueryString;

use crate::error::ClientError;
use crate::keys;
use crate::list::{ListFilters, ListParams};
use crate::service::Kingyo;

/// Enum filters of the plan list. `None` lists every status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestPlanFilters {
    pub status: Option<TestPlanStatus>,
}

impl ListFilters for TestPlanFilters {
    fn key_parts(&self) -> Vec<KeyPart> {
        vec![self.status.map(TestPlanStatus::as_str).into()]
    }

    fn apply(&self, query: QueryString) -> QueryString {
        query.opt("status", self.status.map(TestPlanStatus::as_str))
    }
}

pub type TestPlanListParams = ListParams<TestPlanFilters>;

fn detail_path(id: u64) -> String {
    format!("testplans/{id}/")
}

impl Kingyo {
    /// One page of plans. The title filter is sent as `name`.
    ///
    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn list_test_plans(
        &self,
        params: &TestPlanListParams,
    ) -> Result<Page<TestPlan>, ClientError> {
        let path = format!("testplans/{}", params.query("name").to_suffix());
        self.cached_get(&params.key(keys::test_plans()), &path).await
    }

    /// A single plan, or `None` without any request when `id` is 0.
    ///
    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn get_test_plan(&self, id: u64) -> Result<Option<TestPlan>, ClientError> {
        if id == 0 {
            return Ok(None);
        }
        self.cached_get(&keys::test_plan(id), &detail_path(id))
            .await
            .map(Some)
    }

    /// # Errors
    ///
    /// `ClientError::Validation` for a blank title, otherwise transport
    /// failures.
    pub async fn create_test_plan(&self, payload: &NewTestPlan) -> Result<TestPlan, ClientError> {
        payload.validate()?;
        let plan: TestPlan = self.post_json("testplans/", payload).await?;
        tracing::debug!(plan = plan.id, "test plan created");
        self.invalidate_scope(keys::test_plans());
        Ok(plan)
    }

    /// Apply a partial update and store the server's copy as the detail entry.
    ///
    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn update_test_plan(
        &self,
        id: u64,
        patch: &TestPlanPatch,
    ) -> Result<TestPlan, ClientError> {
        let plan: TestPlan = self.patch_json(&detail_path(id), patch).await?;
        self.invalidate_scope(keys::test_plans());
        self.cache().set(&keys::test_plan(id), &plan)?;
        Ok(plan)
    }

    /// Delete a plan and forget everything cached below it.
    ///
    /// # Errors
    ///
    /// Propagates transport failures; the cache is untouched on failure.
    pub async fn delete_test_plan(&self, id: u64) -> Result<(), ClientError> {
        self.delete_path(&detail_path(id)).await?;
        self.invalidate_scope(keys::test_plans());
        self.remove_entry(keys::test_plan(id));
        for scope in keys::plan_scopes(id) {
            self.remove_scope(scope);
        }
        tracing::debug!(plan = id, "test plan deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{plan_json, test_client};
    use kingyo_cache::QueryKey;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn list_sends_name_and_status_filters() {
        let (client, backend) = test_client();
        backend.push_json(200, &json!({"count": 1, "results": [plan_json(3, "Release")]}));

        let params = TestPlanListParams::new()
            .title("Rel")
            .filters(TestPlanFilters {
                status: Some(TestPlanStatus::InProgress),
            });
        let page = client.list_test_plans(&params).await.unwrap();

        assert_eq!(page.results[0].title, "Release");
        assert_eq!(
            backend.request_lines(),
            vec!["GET http://localhost:8000/api/v1/testplans/?page=1&name=Rel&status=in_progress"]
        );
        assert!(client.cache().contains(&params.key(keys::test_plans())));
    }

    #[tokio::test]
    async fn detail_is_disabled_for_id_zero() {
        let (client, backend) = test_client();
        assert_eq!(client.get_test_plan(0).await.unwrap(), None);
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn create_rejects_blank_title_without_a_request() {
        let (client, backend) = test_client();
        let err = client
            .create_test_plan(&NewTestPlan::new(" "))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn update_overwrites_detail_and_invalidates_lists() {
        let (client, backend) = test_client();
        let list_key = TestPlanListParams::new().key(keys::test_plans());
        client.cache().set(&list_key, &json!({"count": 0, "results": []})).unwrap();
        client.cache().set(&keys::test_plan(3), &plan_json(3, "Old")).unwrap();

        backend.push_json(200, &plan_json(3, "New"));
        let patch = TestPlanPatch::default().title("New");
        client.update_test_plan(3, &patch).await.unwrap();

        assert_eq!(client.cache().is_stale(&list_key), Some(true));
        assert_eq!(client.cache().is_stale(&keys::test_plan(3)), Some(false));
        let cached: TestPlan = client.cache().get(&keys::test_plan(3)).unwrap().unwrap();
        assert_eq!(cached.title, "New");
        assert_eq!(backend.requests()[0].method, kingyo_http::Method::PATCH);
    }

    #[tokio::test]
    async fn delete_removes_plan_scoped_entries_only() {
        let (client, backend) = test_client();
        let other_plan = QueryKey::new(keys::TEST_CASES).with(4_u64).with(1_u32);
        for key in [
            keys::test_plan(3),
            keys::test_case(3, 7),
            keys::test_steps(3, 7),
            keys::test_result(3, 7, 40),
            other_plan.clone(),
        ] {
            client.cache().set(&key, &json!(null)).unwrap();
        }

        backend.push_status(204);
        client.delete_test_plan(3).await.unwrap();

        assert_eq!(client.cache().keys(), vec![other_plan]);
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_cache() {
        let (client, backend) = test_client();
        client.cache().set(&keys::test_plan(3), &plan_json(3, "Keep")).unwrap();
        backend.push_json(404, &json!({"detail": "Not found."}));

        let err = client.delete_test_plan(3).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(client.cache().contains(&keys::test_plan(3)));
    }
}
