pub mod auth;
pub mod case;
pub mod dispatch;
pub mod plan;
pub mod result;
pub mod shared;
pub mod step;
pub mod user;
