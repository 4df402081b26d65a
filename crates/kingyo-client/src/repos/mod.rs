//! Resource repositories. Each module adds its operations to [`Kingyo`].
//!
//! [`Kingyo`]: crate::Kingyo

pub mod attachments;
pub mod test_cases;
pub mod test_plans;
pub mod test_result_steps;
pub mod test_results;
pub mod test_steps;
pub mod users;
