use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A user account. Read-only from the client; the current user's id stamps
/// `TestResult.tester`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}
