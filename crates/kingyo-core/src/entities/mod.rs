//! Entity structs for the Kingyo domain, in the server's wire shape.
//!
//! Field names follow the REST API (`snake_case`, back-references named after
//! the parent resource). All structs derive `Serialize`, `Deserialize` and
//! `JsonSchema` so they can be cached as JSON and validated against a schema.

mod attachment;
mod test_case;
mod test_plan;
mod test_result;
mod test_step;
mod user;

pub use attachment::{TestResultStepAttachment, TestStepAttachment};
pub use test_case::TestCase;
pub use test_plan::TestPlan;
pub use test_result::{TestResult, TestResultStep};
pub use test_step::TestStep;
pub use user::User;
