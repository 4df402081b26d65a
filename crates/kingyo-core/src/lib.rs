//! # kingyo-core
//!
//! Core types shared by every Kingyo crate.
//!
//! - Entity structs for the test-management domain (plans, cases, steps,
//!   results, attachments, users) in their server wire shape
//! - Status, outcome and configuration enums
//! - Create and partial-update payloads accepted by the server
//! - The paginated list envelope
//! - In-memory attachment files
//! - Display helpers used for labels and option lists
//! - Cross-cutting error types

pub mod display;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod files;
pub mod payloads;
pub mod responses;

pub use errors::CoreError;
pub use files::AttachmentFile;
pub use responses::Page;
