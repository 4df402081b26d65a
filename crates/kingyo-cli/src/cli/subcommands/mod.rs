pub mod auth;
pub mod case;
pub mod plan;
pub mod result;
pub mod step;
pub mod user;

pub use auth::AuthCommands;
pub use case::CaseCommands;
pub use plan::PlanCommands;
pub use result::ResultCommands;
pub use step::StepCommands;
pub use user::UserCommands;
