//! # kingyo-client
//!
//! Cached queries and mutations over the Kingyo test-management REST API.
//!
//! [`Kingyo`] bundles the authenticated transport, an injected
//! [`QueryCache`](kingyo_cache::QueryCache) and the session's
//! [`TokenManager`](kingyo_auth::TokenManager). Reads go through the cache
//! under the keys in [`keys`]; mutations invalidate the list scopes they
//! affect and write single-entity responses straight into the cache.
//!
//! Workflows that span several calls (saving an editor draft, recording an
//! execution) live in [`workflows`].

pub mod error;
pub mod keys;
pub mod list;
pub mod repos;
pub mod service;
#[cfg(test)]
mod test_support;
pub mod workflows;

pub use error::ClientError;
pub use list::{ListFilters, ListParams, ListState, ListView, PAGE_SIZE};
pub use repos::attachments::{AttachmentUpload, attachment_form};
pub use repos::test_cases::{TestCaseFilters, TestCaseListParams};
pub use repos::test_plans::{TestPlanFilters, TestPlanListParams};
pub use repos::test_results::{TestResultFilters, TestResultListParams};
pub use service::Kingyo;
pub use workflows::{Execution, RecordedExecution, SavedCase, StepOutcome, correlate_draft_attachments};
