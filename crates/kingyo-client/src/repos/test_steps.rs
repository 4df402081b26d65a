//! Test step repository: the ordered step list of one case, replaced in bulk.

use kingyo_core::entities::TestStep;
use kingyo_core::payloads::{NewTestStep, validate_step_orders};

use crate::error::ClientError;
use crate::keys;
use crate::service::Kingyo;

fn list_path(plan: u64, case: u64) -> String {
    format!("testplans/{plan}/testcases/{case}/teststeps/")
}

impl Kingyo {
    /// Steps of a case in `order`. Empty without any request when either id
    /// is 0.
    ///
    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn list_test_steps(&self, plan: u64, case: u64) -> Result<Vec<TestStep>, ClientError> {
        if plan == 0 || case == 0 {
            return Ok(Vec::new());
        }
        let mut steps: Vec<TestStep> = self
            .cached_get(&keys::test_steps(plan, case), &list_path(plan, case))
            .await?;
        steps.sort_by_key(|s| s.order);
        Ok(steps)
    }

    /// Replace the steps of a case with `steps`, which must be ordered
    /// `1..=N`. Returns the created rows.
    ///
    /// # Errors
    ///
    /// `ClientError::Validation` for a gap in the order sequence, otherwise
    /// transport failures.
    pub async fn replace_test_steps(
        &self,
        plan: u64,
        case: u64,
        steps: &[NewTestStep],
    ) -> Result<Vec<TestStep>, ClientError> {
        validate_step_orders(steps.iter().map(|s| &s.order))?;
        let created: Vec<TestStep> = self.post_json(&list_path(plan, case), steps).await?;
        tracing::debug!(plan, case, steps = created.len(), "test steps replaced");
        self.invalidate_entry(keys::test_steps(plan, case));
        self.invalidate_entry(keys::test_step_attachments(plan, case));
        Ok(created)
    }
}
